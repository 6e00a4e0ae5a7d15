use models::subject_type::SubjectType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String, // always upper-case, e.g. "MAT101"
    pub credits: i16,
    pub subject_type: SubjectType,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub prerequisites: Json, // array of subject codes
    pub is_laboratory: bool,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// Prerequisite codes as plain strings
    pub fn prerequisite_codes(&self) -> Vec<String> {
        self.prerequisites
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher_subject::Entity")]
    TeacherSubjects,
}

impl Related<super::teacher_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherSubjects.def()
    }
}

// Many-to-many relationship with teachers
impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        super::teacher_subject::Relation::Teacher.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::teacher_subject::Relation::Subject.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
