use crate::{
    entities::{subjects, teacher_subjects, teachers},
    error::ServiceError,
    filters::{cmp_ci, contains_ci, matches_opt, search_term},
    services::teacher::semester_order,
};
use chrono::Utc;
use models::semester::Semester;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AssignmentInput {
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub semester: String,
}

/// An assignment joined with the names the admin table shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentRow {
    pub assignment: teacher_subjects::Model,
    pub teacher_name: String,
    pub subject_name: String,
    pub subject_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub search: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub semester: Option<Semester>,
}

impl AssignmentFilter {
    pub fn matches(&self, row: &AssignmentRow) -> bool {
        let text_match = match search_term(self.search.as_deref()) {
            Some(needle) => {
                contains_ci(&row.teacher_name, &needle)
                    || contains_ci(&row.subject_name, &needle)
                    || contains_ci(&row.subject_code, &needle)
            }
            None => true,
        };

        text_match
            && matches_opt(self.teacher_id, row.assignment.teacher_id)
            && matches_opt(self.subject_id, row.assignment.subject_id)
            && self
                .semester
                .is_none_or(|s| s.to_string() == row.assignment.semester)
    }

    /// Filters, then orders by teacher name, semester and subject code
    pub fn apply(&self, rows: Vec<AssignmentRow>) -> Vec<AssignmentRow> {
        let mut filtered: Vec<_> = rows.into_iter().filter(|r| self.matches(r)).collect();

        filtered.sort_by(|a, b| {
            cmp_ci(&a.teacher_name, &b.teacher_name)
                .then_with(|| {
                    semester_order(&a.assignment.semester)
                        .cmp(&semester_order(&b.assignment.semester))
                })
                .then_with(|| a.subject_code.cmp(&b.subject_code))
        });

        filtered
    }
}

pub struct AssignmentService;

impl AssignmentService {
    pub async fn list(
        db: &DatabaseConnection,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentRow>, ServiceError> {
        let (assignments, teachers, subjects) = futures::try_join!(
            teacher_subjects::Entity::find().all(db),
            teachers::Entity::find().all(db),
            subjects::Entity::find().all(db),
        )?;

        let teacher_names: HashMap<Uuid, String> =
            teachers.into_iter().map(|t| (t.id, t.name)).collect();
        let subject_names: HashMap<Uuid, (String, String)> = subjects
            .into_iter()
            .map(|s| (s.id, (s.name, s.code)))
            .collect();

        // Rows whose teacher or subject vanished mid-read are skipped
        let rows = assignments
            .into_iter()
            .filter_map(|assignment| {
                let teacher_name = teacher_names.get(&assignment.teacher_id)?.clone();
                let (subject_name, subject_code) =
                    subject_names.get(&assignment.subject_id)?.clone();
                Some(AssignmentRow {
                    assignment,
                    teacher_name,
                    subject_name,
                    subject_code,
                })
            })
            .collect();

        Ok(filter.apply(rows))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: AssignmentInput,
    ) -> Result<teacher_subjects::Model, ServiceError> {
        let semester: Semester = input.semester.parse()?;

        let txn = db.begin().await?;
        Self::ensure_refs_exist(&txn, input.teacher_id, input.subject_id).await?;
        Self::ensure_unique(&txn, input.teacher_id, input.subject_id, semester, None).await?;

        let model = teacher_subjects::ActiveModel {
            id: Set(Uuid::new_v4()),
            teacher_id: Set(input.teacher_id),
            subject_id: Set(input.subject_id),
            semester: Set(semester.to_string()),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, DUPLICATE))?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: AssignmentInput,
    ) -> Result<teacher_subjects::Model, ServiceError> {
        let semester: Semester = input.semester.parse()?;

        let txn = db.begin().await?;
        let existing = teacher_subjects::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("assignment"))?;
        Self::ensure_refs_exist(&txn, input.teacher_id, input.subject_id).await?;
        Self::ensure_unique(&txn, input.teacher_id, input.subject_id, semester, Some(id))
            .await?;

        let mut active: teacher_subjects::ActiveModel = existing.into();
        active.teacher_id = Set(input.teacher_id);
        active.subject_id = Set(input.subject_id);
        active.semester = Set(semester.to_string());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::from_write(e, DUPLICATE))?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = teacher_subjects::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("assignment"));
        }
        Ok(())
    }

    async fn ensure_refs_exist<C: ConnectionTrait>(
        conn: &C,
        teacher_id: Uuid,
        subject_id: Uuid,
    ) -> Result<(), ServiceError> {
        if teachers::Entity::find_by_id(teacher_id)
            .one(conn)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound("teacher"));
        }
        if subjects::Entity::find_by_id(subject_id)
            .one(conn)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound("subject"));
        }
        Ok(())
    }

    async fn ensure_unique<C: ConnectionTrait>(
        conn: &C,
        teacher_id: Uuid,
        subject_id: Uuid,
        semester: Semester,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = teacher_subjects::Entity::find()
            .filter(teacher_subjects::Column::TeacherId.eq(teacher_id))
            .filter(teacher_subjects::Column::SubjectId.eq(subject_id))
            .filter(teacher_subjects::Column::Semester.eq(semester.to_string()));
        if let Some(id) = except {
            query = query.filter(teacher_subjects::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(ServiceError::Conflict(DUPLICATE.to_string()));
        }
        Ok(())
    }
}

const DUPLICATE: &str = "This teacher is already assigned to that subject in that semester";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn row(teacher: &str, semester: &str, subject: &str, code: &str) -> AssignmentRow {
        AssignmentRow {
            assignment: teacher_subjects::Model {
                id: Uuid::new_v4(),
                teacher_id: Uuid::new_v4(),
                subject_id: Uuid::new_v4(),
                semester: semester.to_string(),
                created_at: NaiveDateTime::default(),
            },
            teacher_name: teacher.to_string(),
            subject_name: subject.to_string(),
            subject_code: code.to_string(),
        }
    }

    #[test]
    fn test_rows_sort_by_teacher_semester_code() {
        let rows = vec![
            row("Bruno", "1", "Química", "QUI101"),
            row("ana", "10", "Cálculo", "MAT201"),
            row("Ana", "2", "Física", "FIS101"),
            row("Ana", "2", "Álgebra", "ALG101"),
        ];

        let codes: Vec<_> = AssignmentFilter::default()
            .apply(rows)
            .into_iter()
            .map(|r| r.subject_code)
            .collect();
        assert_eq!(codes, vec!["ALG101", "FIS101", "MAT201", "QUI101"]);
    }

    #[test]
    fn test_filter_by_semester_and_search() {
        let rows = vec![
            row("Ana", "1", "Química", "QUI101"),
            row("Bruno", "1", "Física", "FIS101"),
            row("Carla", "3", "Física II", "FIS201"),
        ];

        let filter = AssignmentFilter {
            search: Some("fis".to_string()),
            semester: Some(Semester::new(1).unwrap()),
            ..Default::default()
        };
        let teachers: Vec<_> = filter.apply(rows).into_iter().map(|r| r.teacher_name).collect();
        assert_eq!(teachers, vec!["Bruno"]);
    }

    #[test]
    fn test_filter_by_teacher_id() {
        let rows = vec![row("Ana", "1", "Química", "QUI101"), row("Bruno", "1", "Física", "FIS101")];
        let wanted = rows[1].assignment.teacher_id;

        let filter = AssignmentFilter {
            teacher_id: Some(wanted),
            ..Default::default()
        };
        let result = filter.apply(rows);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].teacher_name, "Bruno");
    }
}
