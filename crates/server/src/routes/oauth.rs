use crate::{
    auth::session::begin_session,
    config::OAuthConfig,
    dtos::auth::CallbackParams,
    error::{ApiError, ErrorBody},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use database::services::auth::{AuthService, generate_token};
use log::{info, warn};
use serde::Deserialize;

const STATE_COOKIE: &str = "fimenet_oauth_state";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: String,
    name: Option<String>,
}

fn oauth_config(state: &AppState) -> Result<&OAuthConfig, ApiError> {
    state
        .config
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("OAuth sign-in is not configured".to_string()))
}

/// Start signing in with the configured OAuth provider
#[utoipa::path(
    get,
    path = "/auth/oauth",
    responses(
        (status = 303, description = "Redirect to the provider's authorization page"),
        (status = 404, description = "No provider configured", body = ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn authorize(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let oauth = oauth_config(&state)?;
    let csrf = generate_token();

    let mut url = oauth.authorize_url.clone();
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &oauth.client_id)
        .append_pair("redirect_uri", oauth.redirect_url.as_str())
        .append_pair("scope", "openid email profile")
        .append_pair("state", &csrf);

    let cookie = Cookie::build((STATE_COOKIE, csrf))
        .path("/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies)
        .build();

    Ok((jar.add(cookie), Redirect::to(url.as_str())))
}

/// Provider redirect target: exchanges the code and signs the user in
#[utoipa::path(
    get,
    path = "/auth/callback",
    params(CallbackParams),
    responses(
        (status = 303, description = "Signed in, redirects to the home page"),
        (status = 401, description = "State mismatch", body = ErrorBody),
        (status = 404, description = "No provider configured", body = ErrorBody),
        (status = 502, description = "Provider request failed", body = ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn callback(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> (PrivateCookieJar, Result<Redirect, ApiError>) {
    // The state cookie is single use, whatever the outcome
    let expected = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/auth").build());

    if let Err(e) = oauth_config(&state) {
        return (jar, Err(e));
    }
    if expected.as_deref() != Some(params.state.as_str()) {
        warn!("OAuth callback with mismatched state");
        let err = ApiError::Unauthorized("Sign-in request expired, try again".to_string());
        return (jar, Err(err));
    }

    match complete_sign_in(&state, jar.clone(), &params.code).await {
        Ok(jar) => (jar, Ok(Redirect::to("/"))),
        Err(e) => (jar, Err(e)),
    }
}

async fn complete_sign_in(
    state: &AppState,
    jar: PrivateCookieJar,
    code: &str,
) -> Result<PrivateCookieJar, ApiError> {
    let oauth = oauth_config(state)?;
    let info = fetch_user_info(&state.http, oauth, code).await?;
    let user = AuthService::oauth_sign_in(&state.db, &info.email, info.name.as_deref()).await?;
    let jar = begin_session(state, jar, &user).await?;
    info!("User {} signed in through OAuth", user.id);
    Ok(jar)
}

async fn fetch_user_info(
    http: &reqwest::Client,
    oauth: &OAuthConfig,
    code: &str,
) -> Result<UserInfo, ApiError> {
    let provider = |e: reqwest::Error| ApiError::BadGateway(e.to_string());

    let token: TokenResponse = http
        .post(oauth.token_url.clone())
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", oauth.redirect_url.as_str()),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
        ])
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(provider)?
        .json()
        .await
        .map_err(provider)?;

    http.get(oauth.userinfo_url.clone())
        .bearer_auth(token.access_token)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(provider)?
        .json()
        .await
        .map_err(provider)
}
