use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_auth_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create teachers table
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teachers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(ColumnDef::new(Teachers::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Teachers::Degree).string())
                    .col(ColumnDef::new(Teachers::AvatarUrl).string())
                    .col(
                        ColumnDef::new(Teachers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Teachers::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Teachers::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create subjects table; codes are stored upper-cased so the unique
        // key makes uniqueness case-insensitive
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Subjects::Credits).small_integer().not_null())
                    .col(ColumnDef::new(Subjects::SubjectType).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text())
                    .col(ColumnDef::new(Subjects::Prerequisites).json().not_null())
                    .col(
                        ColumnDef::new(Subjects::IsLaboratory)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Subjects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Subjects::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).date_time().not_null())
                    .check(
                        Expr::col(Subjects::Credits)
                            .gte(1)
                            .and(Expr::col(Subjects::Credits).lte(10)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create teacher_subjects junction table (many-to-many per semester)
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherSubjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeacherSubjects::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(TeacherSubjects::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(TeacherSubjects::Semester).string().not_null())
                    .col(
                        ColumnDef::new(TeacherSubjects::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-teacher_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-subject_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create teacher_reviews table
        manager
            .create_table(
                Table::create()
                    .table(TeacherReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherReviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeacherReviews::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(TeacherReviews::UserId).uuid().not_null())
                    .col(ColumnDef::new(TeacherReviews::Rating).small_integer().not_null())
                    .col(ColumnDef::new(TeacherReviews::Comment).text().not_null())
                    .col(ColumnDef::new(TeacherReviews::SubjectName).string().not_null())
                    .col(ColumnDef::new(TeacherReviews::Semester).string().not_null())
                    .col(
                        ColumnDef::new(TeacherReviews::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TeacherReviews::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .check(
                        Expr::col(TeacherReviews::Rating)
                            .gte(1)
                            .and(Expr::col(TeacherReviews::Rating).lte(5)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_reviews-teacher_id")
                            .from(TeacherReviews::Table, TeacherReviews::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_reviews-user_id")
                            .from(TeacherReviews::Table, TeacherReviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(TeacherReviews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Teachers {
    Table,
    Id,
    Name,
    Email,
    Degree,
    AvatarUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Subjects {
    Table,
    Id,
    Name,
    Code,
    Credits,
    SubjectType,
    Description,
    Prerequisites,
    IsLaboratory,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum TeacherSubjects {
    Table,
    Id,
    TeacherId,
    SubjectId,
    Semester,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum TeacherReviews {
    Table,
    Id,
    TeacherId,
    UserId,
    Rating,
    Comment,
    SubjectName,
    Semester,
    IsAnonymous,
    CreatedAt,
}
