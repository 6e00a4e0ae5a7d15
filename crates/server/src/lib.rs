pub mod auth;
pub mod config;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use crate::{
    auth::session::refresh_session,
    doc::ApiDoc,
    routes::{admin, auth as auth_routes, health, oauth, pages, teachers_list},
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/community", get(pages::community))
        .route("/faq", get(pages::faq))
        .route("/terms", get(pages::terms))
        .route("/unauthorized", get(pages::unauthorized))
        .route("/health", get(health::health))
        .route("/auth/signup", post(auth_routes::sign_up))
        .route("/auth/confirm", get(auth_routes::confirm))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/logout", post(auth_routes::logout))
        .route("/auth/user", get(auth_routes::current_user))
        .route("/auth/oauth", get(oauth::authorize))
        .route("/auth/callback", get(oauth::callback))
        .route("/teachers-list", get(teachers_list::list))
        .route("/teachers-list/{id}", get(teachers_list::profile))
        .route(
            "/teachers-list/{id}/reviews",
            post(teachers_list::submit_review),
        )
        .nest("/admin", admin::router())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), refresh_session))
        .layer(CompressionLayer::new())
        .with_state(state)
}
