use chrono::NaiveDateTime;
use database::{
    entities::teacher_subjects,
    services::assignment::{AssignmentFilter, AssignmentInput, AssignmentRow},
};
use models::semester::Semester;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentRequest {
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    /// "1" through "10"
    pub semester: String,
}

impl From<AssignmentRequest> for AssignmentInput {
    fn from(req: AssignmentRequest) -> Self {
        Self {
            teacher_id: req.teacher_id,
            subject_id: req.subject_id,
            semester: req.semester,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub semester: String,
    pub created_at: NaiveDateTime,
}

impl From<teacher_subjects::Model> for AssignmentResponse {
    fn from(assignment: teacher_subjects::Model) -> Self {
        Self {
            id: assignment.id,
            teacher_id: assignment.teacher_id,
            subject_id: assignment.subject_id,
            semester: assignment.semester,
            created_at: assignment.created_at,
        }
    }
}

/// Assignment row of the admin table, joined with display names
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentRowResponse {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub teacher_name: String,
    pub subject_name: String,
    pub subject_code: String,
}

impl From<AssignmentRow> for AssignmentRowResponse {
    fn from(row: AssignmentRow) -> Self {
        Self {
            assignment: row.assignment.into(),
            teacher_name: row.teacher_name,
            subject_name: row.subject_name,
            subject_code: row.subject_code,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AssignmentQueryParams {
    pub search: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub semester: Option<Semester>,
}

impl From<AssignmentQueryParams> for AssignmentFilter {
    fn from(params: AssignmentQueryParams) -> Self {
        Self {
            search: params.search,
            teacher_id: params.teacher_id,
            subject_id: params.subject_id,
            semester: params.semester,
        }
    }
}
