use super::ensure_confirmed;
use crate::{
    dtos::{
        DeleteParams,
        assignment::{
            AssignmentQueryParams, AssignmentRequest, AssignmentResponse, AssignmentRowResponse,
        },
    },
    error::{ApiError, ErrorBody},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::assignment::{AssignmentFilter, AssignmentService};
use uuid::Uuid;

/// Assignments joined with teacher and subject names, ordered by teacher,
/// semester and subject code
#[utoipa::path(
    get,
    path = "/admin/teachers/assignments",
    params(AssignmentQueryParams),
    responses((status = 200, description = "Matching assignments", body = Vec<AssignmentRowResponse>)),
    tag = "Admin"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AssignmentQueryParams>,
) -> Result<Json<Vec<AssignmentRowResponse>>, ApiError> {
    let rows = AssignmentService::list(&state.db, &AssignmentFilter::from(params)).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/teachers/assignments",
    request_body = AssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 400, description = "Invalid semester", body = ErrorBody),
        (status = 404, description = "Teacher or subject not found", body = ErrorBody),
        (status = 409, description = "Already assigned in that semester", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<AssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    let assignment = AssignmentService::create(&state.db, req.into()).await?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

#[utoipa::path(
    put,
    path = "/admin/teachers/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentResponse),
        (status = 400, description = "Invalid semester", body = ErrorBody),
        (status = 404, description = "Assignment, teacher or subject not found", body = ErrorBody),
        (status = 409, description = "Already assigned in that semester", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignmentRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = AssignmentService::update(&state.db, id, req.into()).await?;
    Ok(Json(assignment.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/teachers/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID"), DeleteParams),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 400, description = "Missing confirm=true", body = ErrorBody),
        (status = 404, description = "Assignment not found", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    ensure_confirmed(&params)?;
    AssignmentService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
