use sea_orm_migration::prelude::*;

use crate::m20250901_000002_create_catalog_tables::{
    TeacherReviews, TeacherSubjects, Teachers,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Public teacher list filters and orders by name
        manager
            .create_index(
                Index::create()
                    .name("idx_teachers_name")
                    .table(Teachers::Table)
                    .col(Teachers::Name)
                    .to_owned(),
            )
            .await?;

        // One assignment per teacher, subject and semester
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_subjects_unique")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::TeacherId)
                    .col(TeacherSubjects::SubjectId)
                    .col(TeacherSubjects::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_subjects_subject_id")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_reviews_teacher_id")
                    .table(TeacherReviews::Table)
                    .col(TeacherReviews::TeacherId)
                    .to_owned(),
            )
            .await?;

        // One review per user, teacher, subject and semester
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_reviews_unique_author")
                    .table(TeacherReviews::Table)
                    .col(TeacherReviews::UserId)
                    .col(TeacherReviews::TeacherId)
                    .col(TeacherReviews::SubjectName)
                    .col(TeacherReviews::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_teacher_reviews_unique_author",
            "idx_teacher_reviews_teacher_id",
            "idx_teacher_subjects_subject_id",
            "idx_teacher_subjects_unique",
            "idx_teachers_name",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
