use crate::dtos::{PaginationMeta, teacher::TeacherResponse};
use chrono::NaiveDateTime;
use database::{
    entities::teacher_reviews,
    services::{
        directory::{
            ReviewView, SubjectSummary, SubjectTeaching, TEACHERS_PAGE_SIZE, TeacherCard,
            TeacherPage, TeacherProfile,
        },
        review::ReviewInput,
    },
};
use models::rating::RatingSummary;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TeacherListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    /// Case-insensitive match on the teacher's name
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

impl From<SubjectSummary> for SubjectSummaryResponse {
    fn from(subject: SubjectSummary) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            code: subject.code,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherCardResponse {
    #[serde(flatten)]
    pub teacher: TeacherResponse,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub subjects: Vec<SubjectSummaryResponse>,
}

impl From<TeacherCard> for TeacherCardResponse {
    fn from(card: TeacherCard) -> Self {
        Self {
            teacher: card.teacher.into(),
            average_rating: card.average_rating,
            total_reviews: card.total_reviews,
            subjects: card.subjects.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub teachers: Vec<TeacherCardResponse>,
    pub pagination: PaginationMeta,
}

impl From<TeacherPage> for PaginatedTeachersResponse {
    fn from(page: TeacherPage) -> Self {
        Self {
            pagination: PaginationMeta::new(page.page, TEACHERS_PAGE_SIZE, page.total_items),
            teachers: page.teachers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectTeachingResponse {
    #[serde(flatten)]
    pub subject: SubjectSummaryResponse,
    pub semesters: Vec<String>,
}

impl From<SubjectTeaching> for SubjectTeachingResponse {
    fn from(teaching: SubjectTeaching) -> Self {
        Self {
            subject: teaching.subject.into(),
            semesters: teaching.semesters,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub subject_name: String,
    pub semester: String,
    pub is_anonymous: bool,
    pub created_at: NaiveDateTime,
    /// Absent on anonymous reviews
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl From<ReviewView> for ReviewResponse {
    fn from(review: ReviewView) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            comment: review.comment,
            subject_name: review.subject_name,
            semester: review.semester,
            is_anonymous: review.is_anonymous,
            created_at: review.created_at,
            user_id: review.user_id,
            author_name: review.author_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingSummaryResponse {
    pub average_rating: f64,
    pub total_reviews: u64,
    /// Reviews per star value, first entry is one star
    pub distribution: Vec<u64>,
}

impl From<RatingSummary> for RatingSummaryResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            average_rating: summary.average_rating,
            total_reviews: summary.total_reviews,
            distribution: summary.distribution.to_vec(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherProfileResponse {
    pub teacher: TeacherResponse,
    pub subjects: Vec<SubjectTeachingResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub summary: RatingSummaryResponse,
}

impl From<TeacherProfile> for TeacherProfileResponse {
    fn from(profile: TeacherProfile) -> Self {
        Self {
            teacher: profile.teacher.into(),
            subjects: profile.subjects.into_iter().map(Into::into).collect(),
            reviews: profile.reviews.into_iter().map(Into::into).collect(),
            summary: profile.summary.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// 1 through 5
    pub rating: i32,
    /// Up to 500 characters
    pub comment: String,
    pub subject_name: String,
    pub semester: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(req: ReviewRequest) -> Self {
        Self {
            rating: req.rating,
            comment: req.comment,
            subject_name: req.subject_name,
            semester: req.semester,
            is_anonymous: req.is_anonymous,
        }
    }
}

/// A review as stored, returned to its author
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmittedReviewResponse {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub subject_name: String,
    pub semester: String,
    pub is_anonymous: bool,
    pub created_at: NaiveDateTime,
}

impl From<teacher_reviews::Model> for SubmittedReviewResponse {
    fn from(review: teacher_reviews::Model) -> Self {
        Self {
            id: review.id,
            teacher_id: review.teacher_id,
            rating: review.rating,
            comment: review.comment,
            subject_name: review.subject_name,
            semester: review.semester,
            is_anonymous: review.is_anonymous,
            created_at: review.created_at,
        }
    }
}
