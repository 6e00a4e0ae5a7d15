use crate::auth::{
    CurrentUser,
    redirect::{UNAUTHORIZED_PATH, login_redirect},
};
use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use log::warn;

/// The one authorization decision for everything under `/admin`.
///
/// Anonymous visitors go to the login page with their original path in
/// `redirectTo`; signed-in users without the admin role go to
/// `/unauthorized`.
pub async fn require_admin(
    OriginalUri(uri): OriginalUri,
    user: Option<CurrentUser>,
    request: Request,
    next: Next,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    match user {
        None => {
            warn!("Anonymous request to {target}, redirecting to login");
            Redirect::to(&login_redirect(target)).into_response()
        }
        Some(CurrentUser(identity)) if !identity.is_admin() => {
            warn!("User {} is not an admin, denied {target}", identity.user_id);
            Redirect::to(UNAUTHORIZED_PATH).into_response()
        }
        Some(_) => next.run(request).await,
    }
}
