use database::services::stats::DashboardStats;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub teachers: u64,
    pub active_teachers: u64,
    pub subjects: u64,
    pub active_subjects: u64,
    pub assignments: u64,
    pub reviews: u64,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            teachers: stats.teachers,
            active_teachers: stats.active_teachers,
            subjects: stats.subjects,
            active_subjects: stats.active_subjects,
            assignments: stats.assignments,
            reviews: stats.reviews,
        }
    }
}
