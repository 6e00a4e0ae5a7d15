use crate::{
    entities::{subjects, teacher_subjects, teachers},
    error::ServiceError,
    filters::{SortOrder, cmp_ci, contains_ci, matches_opt, search_term},
};
use chrono::Utc;
use models::{
    semester::Semester,
    validation::{ValidationError, normalize_email, optional, require},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TeacherInput {
    pub name: String,
    pub email: String,
    pub degree: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidTeacher {
    pub name: String,
    pub email: String,
    pub degree: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
}

impl TeacherInput {
    pub fn validate(&self) -> Result<ValidTeacher, ValidationError> {
        Ok(ValidTeacher {
            name: require("name", &self.name)?,
            email: normalize_email(&self.email)?,
            degree: optional(self.degree.as_deref()),
            avatar_url: optional(self.avatar_url.as_deref()),
            is_active: self.is_active,
        })
    }
}

/// A subject to assign while creating a teacher
#[derive(Debug, Clone)]
pub struct InitialAssignment {
    pub subject_id: Uuid,
    pub semester: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherSort {
    #[default]
    Name,
    Email,
    CreatedAt,
}

/// Predicates of the admin teacher list; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct TeacherFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort: TeacherSort,
    pub order: SortOrder,
}

impl TeacherFilter {
    pub fn matches(&self, teacher: &teachers::Model) -> bool {
        let text_match = match search_term(self.search.as_deref()) {
            Some(needle) => {
                contains_ci(&teacher.name, &needle)
                    || contains_ci(&teacher.email, &needle)
                    || teacher
                        .degree
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, &needle))
            }
            None => true,
        };

        text_match && matches_opt(self.is_active, teacher.is_active)
    }

    pub fn apply(&self, teachers: Vec<teachers::Model>) -> Vec<teachers::Model> {
        let mut filtered: Vec<_> = teachers.into_iter().filter(|t| self.matches(t)).collect();

        filtered.sort_by(|a, b| {
            let ordering = match self.sort {
                TeacherSort::Name => cmp_ci(&a.name, &b.name),
                TeacherSort::Email => a.email.cmp(&b.email),
                TeacherSort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            self.order.apply(ordering.then_with(|| a.email.cmp(&b.email)))
        });

        filtered
    }
}

pub struct TeacherService;

impl TeacherService {
    /// Loads the whole teacher table and narrows it with `filter`
    pub async fn list(
        db: &DatabaseConnection,
        filter: &TeacherFilter,
    ) -> Result<Vec<teachers::Model>, ServiceError> {
        let all = teachers::Entity::find().all(db).await?;
        Ok(filter.apply(all))
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<teachers::Model, ServiceError> {
        teachers::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("teacher"))
    }

    /// Assignments of one teacher with their subjects, by semester then code
    pub async fn assignments(
        db: &DatabaseConnection,
        teacher_id: Uuid,
    ) -> Result<Vec<(teacher_subjects::Model, subjects::Model)>, ServiceError> {
        let mut rows: Vec<_> = teacher_subjects::Entity::find()
            .filter(teacher_subjects::Column::TeacherId.eq(teacher_id))
            .find_also_related(subjects::Entity)
            .order_by_asc(teacher_subjects::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(assignment, subject)| subject.map(|s| (assignment, s)))
            .collect();

        rows.sort_by(|(a, sa), (b, sb)| {
            semester_order(&a.semester)
                .cmp(&semester_order(&b.semester))
                .then_with(|| sa.code.cmp(&sb.code))
        });

        Ok(rows)
    }

    /// Creates a teacher together with its initial assignments, atomically
    pub async fn create(
        db: &DatabaseConnection,
        input: TeacherInput,
        assignments: Vec<InitialAssignment>,
    ) -> Result<(teachers::Model, Vec<teacher_subjects::Model>), ServiceError> {
        let teacher = input.validate()?;

        // Parse every semester up front and drop repeated pairs
        let mut seen = HashSet::new();
        let mut planned = Vec::new();
        for assignment in assignments {
            let semester: Semester = assignment.semester.parse()?;
            if seen.insert((assignment.subject_id, semester)) {
                planned.push((assignment.subject_id, semester));
            }
        }

        let txn = db.begin().await?;
        Self::ensure_email_available(&txn, &teacher.email, None).await?;

        let now = Utc::now().naive_utc();
        let email = teacher.email.clone();
        let model = teachers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(teacher.name),
            email: Set(teacher.email),
            degree: Set(teacher.degree),
            avatar_url: Set(teacher.avatar_url),
            is_active: Set(teacher.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, email_taken(&email)))?;

        let mut created = Vec::with_capacity(planned.len());
        for (subject_id, semester) in planned {
            if subjects::Entity::find_by_id(subject_id)
                .one(&txn)
                .await?
                .is_none()
            {
                return Err(ServiceError::NotFound("subject"));
            }

            let assignment = teacher_subjects::ActiveModel {
                id: Set(Uuid::new_v4()),
                teacher_id: Set(model.id),
                subject_id: Set(subject_id),
                semester: Set(semester.to_string()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            created.push(assignment);
        }

        txn.commit().await?;
        Ok((model, created))
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: TeacherInput,
    ) -> Result<teachers::Model, ServiceError> {
        let teacher = input.validate()?;

        let txn = db.begin().await?;
        let existing = teachers::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("teacher"))?;
        Self::ensure_email_available(&txn, &teacher.email, Some(id)).await?;

        let email = teacher.email.clone();
        let mut active: teachers::ActiveModel = existing.into();
        active.name = Set(teacher.name);
        active.email = Set(teacher.email);
        active.degree = Set(teacher.degree);
        active.avatar_url = Set(teacher.avatar_url);
        active.is_active = Set(teacher.is_active);
        active.updated_at = Set(Utc::now().naive_utc());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::from_write(e, email_taken(&email)))?;

        txn.commit().await?;
        Ok(model)
    }

    /// Flips `is_active` and bumps `updated_at`, nothing else
    pub async fn toggle_active(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<teachers::Model, ServiceError> {
        let txn = db.begin().await?;
        let result = teachers::Entity::update_many()
            .col_expr(teachers::Column::IsActive, Expr::col(teachers::Column::IsActive).not())
            .col_expr(teachers::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(teachers::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("teacher"));
        }

        let model = teachers::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("teacher"))?;
        txn.commit().await?;
        Ok(model)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = teachers::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("teacher"));
        }
        Ok(())
    }

    async fn ensure_email_available<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = teachers::Entity::find().filter(teachers::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(teachers::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(ServiceError::Conflict(email_taken(email)));
        }
        Ok(())
    }
}

fn email_taken(email: &str) -> String {
    format!("A teacher with email {email} already exists")
}

/// Numeric order for stored semesters; unparsable values sort last
pub(crate) fn semester_order(semester: &str) -> u8 {
    semester
        .parse::<Semester>()
        .map(|s| s.value())
        .unwrap_or(u8::MAX)
}
