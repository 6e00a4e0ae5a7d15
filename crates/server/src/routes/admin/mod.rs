pub mod assignments;
pub mod subjects;
pub mod teachers;

use crate::{
    auth::gate::require_admin,
    dtos::{DeleteParams, admin::DashboardResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, patch, put},
};
use database::services::stats::StatsService;

/// Everything under `/admin`, behind the admin gate. Unknown admin paths
/// pass through the gate too before they 404.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/subjects", get(subjects::list).post(subjects::create))
        .route(
            "/subjects/{id}",
            put(subjects::update).delete(subjects::delete),
        )
        .route("/subjects/{id}/toggle-active", patch(subjects::toggle_active))
        .route("/teachers", get(teachers::list).post(teachers::create))
        .route("/teachers/create", get(teachers::create_form))
        .route(
            "/teachers/{id}",
            put(teachers::update).delete(teachers::delete),
        )
        .route("/teachers/{id}/edit", get(teachers::edit_form))
        .route("/teachers/{id}/toggle-active", patch(teachers::toggle_active))
        .route(
            "/teachers/assignments",
            get(assignments::list).post(assignments::create),
        )
        .route(
            "/teachers/assignments/{id}",
            put(assignments::update).delete(assignments::delete),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(require_admin))
}

/// Counters for the admin dashboard
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardResponse),
        (status = 303, description = "Not signed in or not an admin")
    ),
    tag = "Admin"
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let stats = StatsService::dashboard(&state.db).await?;
    Ok(Json(stats.into()))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such admin page".to_string())
}

pub(crate) fn ensure_confirmed(params: &DeleteParams) -> Result<(), ApiError> {
    if params.confirm {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "Deleting is permanent, repeat the request with confirm=true".to_string(),
        ))
    }
}
