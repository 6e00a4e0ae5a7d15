use crate::{auth::CurrentUser, error::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use database::{
    entities::users,
    services::{auth::AuthService, profile::ProfileService},
};
use log::{debug, error};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "fimenet_session";

/// Encrypted cookie carrying the session id
pub fn session_cookie(session_id: Uuid, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie template that clears the session cookie when passed to `remove`
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

pub fn session_id(jar: &PrivateCookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Opens a session for a freshly authenticated user and adds its cookie.
/// Emails listed in `ADMIN_EMAILS` are promoted first.
pub async fn begin_session(
    state: &AppState,
    jar: PrivateCookieJar,
    user: &users::Model,
) -> Result<PrivateCookieJar, ApiError> {
    ProfileService::promote_if_listed(&state.db, user, &state.config.admin_emails).await?;
    let session = AuthService::start_session(&state.db, user.id, &state.config.session).await?;
    Ok(jar.add(session_cookie(session.id, state.config.secure_cookies)))
}

/// Resolves the session cookie on every request.
///
/// A live session puts a [`CurrentUser`] into the request extensions and is
/// extended once its refresh interval has passed. A stale cookie is cleared
/// unless the handler already wrote a new one.
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = session_id(&jar) else {
        return next.run(request).await;
    };

    match AuthService::resolve_session(&state.db, session_id, &state.config.session).await {
        Ok(Some(resolved)) => {
            if resolved.refreshed {
                debug!("Extended session of user {}", resolved.identity.user_id);
            }
            request
                .extensions_mut()
                .insert(CurrentUser(resolved.identity));
            next.run(request).await
        }
        Ok(None) => {
            let response = next.run(request).await;
            if sets_session_cookie(&response) {
                response
            } else {
                (jar.remove(expired_session_cookie()), response).into_response()
            }
        }
        Err(e) => {
            // The request goes on anonymously
            error!("Failed to resolve session {session_id}: {e}");
            next.run(request).await
        }
    }
}

fn sets_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&format!("{SESSION_COOKIE}=")))
}
