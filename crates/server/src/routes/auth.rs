use crate::{
    auth::{
        CurrentUser,
        redirect::{LOGIN_PATH, sanitize_redirect},
        session::{begin_session, expired_session_cookie, session_id},
    },
    dtos::auth::{
        ConfirmParams, LoginParams, LoginRequest, LoginResponse, SignUpRequest, SignUpResponse,
        UserResponse,
    },
    error::{ApiError, ErrorBody},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
};
use axum_extra::extract::PrivateCookieJar;
use database::services::auth::{AuthService, SignUpInput};
use log::{info, warn};
use url::form_urlencoded;

/// Register with email and password. The account stays unconfirmed until
/// the emailed link is followed.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created, confirmation pending", body = SignUpResponse),
        (status = 400, description = "Invalid email, password or name", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), ApiError> {
    let pending = AuthService::sign_up(
        &state.db,
        SignUpInput {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        },
        state.config.otp_ttl,
    )
    .await?;

    // Email delivery is out of scope, the link goes to the log instead
    let token: String = form_urlencoded::byte_serialize(pending.token.as_bytes()).collect();
    info!(
        "Confirmation link for {}: /auth/confirm?token_hash={token}&type=email",
        pending.user.email
    );

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            id: pending.user.id,
            email: pending.user.email,
            message: "Check your email to confirm your account".to_string(),
        }),
    ))
}

/// Follow an email confirmation link
#[utoipa::path(
    get,
    path = "/auth/confirm",
    params(ConfirmParams),
    responses(
        (status = 303, description = "Redirects to `next` once confirmed, or to the login page when the link is invalid")
    ),
    tag = "Authentication"
)]
pub async fn confirm(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<ConfirmParams>,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let failed = || Redirect::to(&format!("{LOGIN_PATH}?error=confirmation"));

    if params.otp_type != "email" {
        warn!("Unsupported confirmation type {:?}", params.otp_type);
        return Ok((jar, failed()));
    }

    let user = match AuthService::confirm_email(&state.db, &params.token_hash).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Email confirmation failed: {e}");
            return Ok((jar, failed()));
        }
    };

    let jar = begin_session(&state, jar, &user).await?;
    Ok((jar, Redirect::to(&sanitize_redirect(params.next.as_deref()))))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    params(LoginParams),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in, session cookie set", body = LoginResponse),
        (status = 401, description = "Wrong email or password", body = ErrorBody),
        (status = 403, description = "Email not confirmed yet", body = ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
    jar: PrivateCookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<LoginResponse>), ApiError> {
    let user = AuthService::sign_in(&state.db, &req.email, &req.password)
        .await
        .inspect_err(|e| warn!("Failed sign-in for {}: {e}", req.email))?;

    let jar = begin_session(&state, jar, &user).await?;
    let identity = AuthService::identity(&state.db, user.id).await?;
    info!("User {} signed in", user.id);

    Ok((
        jar,
        Json(LoginResponse {
            user: identity.into(),
            redirect_to: sanitize_redirect(params.redirect_to.as_deref()),
        }),
    ))
}

/// Sign out of the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Session ended, cookie cleared")),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, StatusCode), ApiError> {
    if let Some(id) = session_id(&jar) {
        AuthService::end_session(&state.db, id).await?;
        info!("Session {id} ended");
    }

    Ok((jar.remove(expired_session_cookie()), StatusCode::NO_CONTENT))
}

/// The signed-in user and their profile
#[utoipa::path(
    get,
    path = "/auth/user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn current_user(CurrentUser(identity): CurrentUser) -> Json<UserResponse> {
    Json(identity.into())
}
