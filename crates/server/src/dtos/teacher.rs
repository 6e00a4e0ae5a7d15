use crate::dtos::{
    assignment::AssignmentResponse,
    subject::default_true,
};
use chrono::NaiveDateTime;
use database::{
    entities::{subjects, teacher_subjects, teachers},
    filters::SortOrder,
    services::teacher::{InitialAssignment, TeacherFilter, TeacherInput, TeacherSort},
};
use models::semester::Semester;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TeacherRequest {
    pub name: String,
    pub email: String,
    pub degree: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub assignments: Vec<AssignmentSeed>,
}

/// Edits a teacher's own fields. Assignments are managed separately, so an
/// `assignments` key is rejected instead of ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TeacherUpdateRequest {
    pub name: String,
    pub email: String,
    pub degree: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<TeacherUpdateRequest> for TeacherInput {
    fn from(req: TeacherUpdateRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            degree: req.degree,
            avatar_url: req.avatar_url,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentSeed {
    pub subject_id: Uuid,
    pub semester: String,
}

impl TeacherRequest {
    pub fn into_parts(self) -> (TeacherInput, Vec<InitialAssignment>) {
        let input = TeacherInput {
            name: self.name,
            email: self.email,
            degree: self.degree,
            avatar_url: self.avatar_url,
            is_active: self.is_active,
        };
        let assignments = self
            .assignments
            .into_iter()
            .map(|seed| InitialAssignment {
                subject_id: seed.subject_id,
                semester: seed.semester,
            })
            .collect();
        (input, assignments)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub degree: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<teachers::Model> for TeacherResponse {
    fn from(teacher: teachers::Model) -> Self {
        Self {
            id: teacher.id,
            name: teacher.name,
            email: teacher.email,
            degree: teacher.degree,
            avatar_url: teacher.avatar_url,
            is_active: teacher.is_active,
            created_at: teacher.created_at,
            updated_at: teacher.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedTeacherResponse {
    pub teacher: TeacherResponse,
    pub assignments: Vec<AssignmentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectOption {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

impl From<subjects::Model> for SubjectOption {
    fn from(subject: subjects::Model) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            code: subject.code,
        }
    }
}

/// Choices offered by the teacher create and edit forms
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherFormOptions {
    pub subjects: Vec<SubjectOption>,
    pub semesters: Vec<String>,
}

impl TeacherFormOptions {
    pub fn new(active_subjects: Vec<subjects::Model>) -> Self {
        Self {
            subjects: active_subjects.into_iter().map(SubjectOption::from).collect(),
            semesters: Semester::all().iter().map(Semester::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherAssignmentResponse {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub subject_code: String,
    pub semester: String,
}

impl From<(teacher_subjects::Model, subjects::Model)> for TeacherAssignmentResponse {
    fn from((assignment, subject): (teacher_subjects::Model, subjects::Model)) -> Self {
        Self {
            id: assignment.id,
            subject_id: subject.id,
            subject_name: subject.name,
            subject_code: subject.code,
            semester: assignment.semester,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherEditResponse {
    pub teacher: TeacherResponse,
    pub assignments: Vec<TeacherAssignmentResponse>,
    pub options: TeacherFormOptions,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TeacherQueryParams {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// `name`, `email` or `created_at`
    #[param(value_type = Option<String>)]
    pub sort: Option<TeacherSort>,
    /// `asc` or `desc`
    #[param(value_type = Option<String>)]
    pub order: Option<SortOrder>,
}

impl From<TeacherQueryParams> for TeacherFilter {
    fn from(params: TeacherQueryParams) -> Self {
        Self {
            search: params.search,
            is_active: params.is_active,
            sort: params.sort.unwrap_or_default(),
            order: params.order.unwrap_or_default(),
        }
    }
}
