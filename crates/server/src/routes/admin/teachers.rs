use super::ensure_confirmed;
use crate::{
    dtos::{
        DeleteParams,
        teacher::{
            CreatedTeacherResponse, TeacherEditResponse, TeacherFormOptions, TeacherQueryParams,
            TeacherRequest, TeacherResponse, TeacherUpdateRequest,
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
use database::services::{
    subject::SubjectService,
    teacher::{TeacherFilter, TeacherService},
};
use log::info;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/admin/teachers",
    params(TeacherQueryParams),
    responses((status = 200, description = "Matching teachers", body = Vec<TeacherResponse>)),
    tag = "Admin"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TeacherQueryParams>,
) -> Result<Json<Vec<TeacherResponse>>, ApiError> {
    let teachers = TeacherService::list(&state.db, &TeacherFilter::from(params)).await?;
    Ok(Json(teachers.into_iter().map(Into::into).collect()))
}

/// Choices for the new teacher form
#[utoipa::path(
    get,
    path = "/admin/teachers/create",
    responses((status = 200, description = "Active subjects and semesters", body = TeacherFormOptions)),
    tag = "Admin"
)]
pub async fn create_form(State(state): State<AppState>) -> Result<Json<TeacherFormOptions>, ApiError> {
    let subjects = SubjectService::list_active(&state.db).await?;
    Ok(Json(TeacherFormOptions::new(subjects)))
}

/// Creates a teacher, optionally with its first assignments, in one
/// transaction
#[utoipa::path(
    post,
    path = "/admin/teachers",
    request_body = TeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = CreatedTeacherResponse),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 404, description = "An assigned subject does not exist", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<TeacherRequest>,
) -> Result<(StatusCode, Json<CreatedTeacherResponse>), ApiError> {
    let (input, assignments) = req.into_parts();
    let (teacher, assignments) = TeacherService::create(&state.db, input, assignments).await?;
    info!(
        "Created teacher {} with {} assignments",
        teacher.id,
        assignments.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedTeacherResponse {
            teacher: teacher.into(),
            assignments: assignments.into_iter().map(Into::into).collect(),
        }),
    ))
}

/// Teacher, its assignments and the form choices
#[utoipa::path(
    get,
    path = "/admin/teachers/{id}/edit",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Edit form data", body = TeacherEditResponse),
        (status = 404, description = "Teacher not found", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherEditResponse>, ApiError> {
    let teacher = TeacherService::get(&state.db, id).await?;
    let assignments = TeacherService::assignments(&state.db, id).await?;
    let subjects = SubjectService::list_active(&state.db).await?;

    Ok(Json(TeacherEditResponse {
        teacher: teacher.into(),
        assignments: assignments.into_iter().map(Into::into).collect(),
        options: TeacherFormOptions::new(subjects),
    }))
}

#[utoipa::path(
    put,
    path = "/admin/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = TeacherUpdateRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 422, description = "Unknown field in the body, such as `assignments`"),
        (status = 404, description = "Teacher not found", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TeacherUpdateRequest>,
) -> Result<Json<TeacherResponse>, ApiError> {
    let teacher = TeacherService::update(&state.db, id, req.into()).await?;
    Ok(Json(teacher.into()))
}

#[utoipa::path(
    patch,
    path = "/admin/teachers/{id}/toggle-active",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Updated teacher", body = TeacherResponse),
        (status = 404, description = "Teacher not found", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherResponse>, ApiError> {
    let teacher = TeacherService::toggle_active(&state.db, id).await?;
    Ok(Json(teacher.into()))
}

/// Hard delete; assignments and reviews of the teacher go with it
#[utoipa::path(
    delete,
    path = "/admin/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID"), DeleteParams),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 400, description = "Missing confirm=true", body = ErrorBody),
        (status = 404, description = "Teacher not found", body = ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    ensure_confirmed(&params)?;
    TeacherService::delete(&state.db, id).await?;
    info!("Deleted teacher {id}");
    Ok(StatusCode::NO_CONTENT)
}
