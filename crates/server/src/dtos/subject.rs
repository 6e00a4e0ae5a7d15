use chrono::NaiveDateTime;
use database::{
    entities::subjects,
    filters::SortOrder,
    services::subject::{SubjectFilter, SubjectInput, SubjectSort},
};
use models::subject_type::SubjectType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubjectRequest {
    pub name: String,
    pub code: String,
    /// 1 through 10
    pub credits: i32,
    /// One of the values listed by `SubjectTypeOption`
    pub subject_type: String,
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub is_laboratory: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

pub(crate) fn default_true() -> bool {
    true
}

impl From<SubjectRequest> for SubjectInput {
    fn from(req: SubjectRequest) -> Self {
        Self {
            name: req.name,
            code: req.code,
            credits: req.credits,
            subject_type: req.subject_type,
            description: req.description,
            prerequisites: req.prerequisites,
            is_laboratory: req.is_laboratory,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub credits: i16,
    pub subject_type: String,
    pub subject_type_label: String,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
    pub is_laboratory: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<subjects::Model> for SubjectResponse {
    fn from(subject: subjects::Model) -> Self {
        let prerequisites = subject.prerequisite_codes();
        Self {
            id: subject.id,
            name: subject.name,
            code: subject.code,
            credits: subject.credits,
            subject_type: subject.subject_type.as_str().to_string(),
            subject_type_label: subject.subject_type.label().to_string(),
            description: subject.description,
            prerequisites,
            is_laboratory: subject.is_laboratory,
            is_active: subject.is_active,
            created_at: subject.created_at,
            updated_at: subject.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectTypeOption {
    pub value: String,
    pub label: String,
}

impl From<SubjectType> for SubjectTypeOption {
    fn from(subject_type: SubjectType) -> Self {
        Self {
            value: subject_type.as_str().to_string(),
            label: subject_type.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectResponse>,
    pub subject_types: Vec<SubjectTypeOption>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubjectQueryParams {
    pub search: Option<String>,
    #[param(value_type = Option<String>)]
    pub subject_type: Option<SubjectType>,
    pub is_active: Option<bool>,
    pub is_laboratory: Option<bool>,
    /// `name`, `code`, `credits` or `created_at`
    #[param(value_type = Option<String>)]
    pub sort: Option<SubjectSort>,
    /// `asc` or `desc`
    #[param(value_type = Option<String>)]
    pub order: Option<SortOrder>,
}

impl From<SubjectQueryParams> for SubjectFilter {
    fn from(params: SubjectQueryParams) -> Self {
        Self {
            search: params.search,
            subject_type: params.subject_type,
            is_active: params.is_active,
            is_laboratory: params.is_laboratory,
            sort: params.sort.unwrap_or_default(),
            order: params.order.unwrap_or_default(),
        }
    }
}
