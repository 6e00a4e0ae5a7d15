use crate::{
    entities::{subjects, teacher_reviews, teacher_subjects, teachers},
    error::ServiceError,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

/// Counters shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub teachers: u64,
    pub active_teachers: u64,
    pub subjects: u64,
    pub active_subjects: u64,
    pub assignments: u64,
    pub reviews: u64,
}

pub struct StatsService;

impl StatsService {
    pub async fn dashboard(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
        let (teachers, active_teachers, subjects, active_subjects, assignments, reviews) =
            futures::try_join!(
                teachers::Entity::find().count(db),
                teachers::Entity::find()
                    .filter(teachers::Column::IsActive.eq(true))
                    .count(db),
                subjects::Entity::find().count(db),
                subjects::Entity::find()
                    .filter(subjects::Column::IsActive.eq(true))
                    .count(db),
                teacher_subjects::Entity::find().count(db),
                teacher_reviews::Entity::find().count(db),
            )?;

        Ok(DashboardStats {
            teachers,
            active_teachers,
            subjects,
            active_subjects,
            assignments,
            reviews,
        })
    }
}
