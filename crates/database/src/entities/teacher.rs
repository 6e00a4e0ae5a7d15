use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub degree: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher_subject::Entity")]
    TeacherSubjects,
    #[sea_orm(has_many = "super::teacher_review::Entity")]
    TeacherReviews,
}

impl Related<super::teacher_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherSubjects.def()
    }
}

impl Related<super::teacher_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherReviews.def()
    }
}

// Many-to-many relationship with subjects
impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        super::teacher_subject::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::teacher_subject::Relation::Teacher.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
