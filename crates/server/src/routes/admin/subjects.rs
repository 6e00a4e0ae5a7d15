use super::ensure_confirmed;
use crate::{
    dtos::{
        DeleteParams,
        subject::{SubjectListResponse, SubjectQueryParams, SubjectRequest, SubjectResponse},
    },
    error::{ApiError, ErrorBody},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::subject::{SubjectFilter, SubjectService};
use log::info;
use models::subject_type::SubjectType;
use uuid::Uuid;

/// All subjects, filtered and sorted in memory
#[utoipa::path(
    get,
    path = "/admin/subjects",
    params(SubjectQueryParams),
    responses(
        (status = 200, description = "Matching subjects and the subject type choices", body = SubjectListResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Admin"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SubjectQueryParams>,
) -> Result<Json<SubjectListResponse>, ApiError> {
    let filter = SubjectFilter::from(params);
    let subjects = SubjectService::list(&state.db, &filter).await?;

    Ok(Json(SubjectListResponse {
        subjects: subjects.into_iter().map(Into::into).collect(),
        subject_types: SubjectType::all().into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/admin/subjects",
    request_body = SubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 409, description = "Code already in use", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<SubjectRequest>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    let subject = SubjectService::create(&state.db, req.into()).await?;
    info!("Created subject {} ({})", subject.code, subject.id);
    Ok((StatusCode::CREATED, Json(subject.into())))
}

#[utoipa::path(
    put,
    path = "/admin/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 404, description = "Subject not found", body = ErrorBody),
        (status = 409, description = "Code already in use", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject = SubjectService::update(&state.db, id, req.into()).await?;
    Ok(Json(subject.into()))
}

/// Flips `is_active`; nothing else changes
#[utoipa::path(
    patch,
    path = "/admin/subjects/{id}/toggle-active",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Updated subject", body = SubjectResponse),
        (status = 404, description = "Subject not found", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject = SubjectService::toggle_active(&state.db, id).await?;
    Ok(Json(subject.into()))
}

/// Hard delete; assignments of the subject go with it
#[utoipa::path(
    delete,
    path = "/admin/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID"), DeleteParams),
    responses(
        (status = 204, description = "Subject deleted"),
        (status = 400, description = "Missing confirm=true", body = ErrorBody),
        (status = 404, description = "Subject not found", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    ensure_confirmed(&params)?;
    SubjectService::delete(&state.db, id).await?;
    info!("Deleted subject {id}");
    Ok(StatusCode::NO_CONTENT)
}
