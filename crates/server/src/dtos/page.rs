use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResponse {
    pub slug: &'static str,
    pub title: &'static str,
    pub sections: Vec<SectionResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SectionResponse {
    pub heading: &'static str,
    pub body: &'static str,
}
