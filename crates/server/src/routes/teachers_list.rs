use crate::{
    auth::CurrentUser,
    dtos::directory::{
        PaginatedTeachersResponse, ReviewRequest, SubmittedReviewResponse, TeacherListParams,
        TeacherProfileResponse,
    },
    error::{ApiError, ErrorBody},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::{directory::DirectoryService, review::ReviewService};
use log::info;
use uuid::Uuid;

/// Active teachers, twelve per page, with their rating and subjects
#[utoipa::path(
    get,
    path = "/teachers-list",
    params(TeacherListParams),
    responses(
        (status = 200, description = "One page of teachers", body = PaginatedTeachersResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Teachers"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TeacherListParams>,
) -> Result<Json<PaginatedTeachersResponse>, ApiError> {
    let page =
        DirectoryService::list_teachers(&state.db, params.page, params.search.as_deref()).await?;
    Ok(Json(page.into()))
}

/// Public profile: subjects with semesters, reviews and rating summary
#[utoipa::path(
    get,
    path = "/teachers-list/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher profile", body = TeacherProfileResponse),
        (status = 404, description = "Teacher not found or inactive", body = ErrorBody)
    ),
    tag = "Teachers"
)]
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherProfileResponse>, ApiError> {
    let profile = DirectoryService::teacher_profile(&state.db, id).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    post,
    path = "/teachers-list/{id}/reviews",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = SubmittedReviewResponse),
        (status = 400, description = "Invalid rating, comment or semester", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "Teacher not found or inactive", body = ErrorBody),
        (status = 409, description = "Already reviewed for that subject and semester", body = ErrorBody)
    ),
    tag = "Teachers"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<SubmittedReviewResponse>), ApiError> {
    let review = ReviewService::submit(&state.db, id, identity.user_id, req.into()).await?;
    info!("User {} reviewed teacher {id}", identity.user_id);
    Ok((StatusCode::CREATED, Json(review.into())))
}
