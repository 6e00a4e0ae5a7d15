use crate::{
    entities::subjects,
    error::ServiceError,
    filters::{SortOrder, contains_ci, cmp_ci, matches_opt, search_term},
};
use chrono::Utc;
use models::{
    subject_type::SubjectType,
    validation::{
        ValidationError, normalize_prerequisites, normalize_subject_code, optional, require,
        validate_credits,
    },
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use serde::Deserialize;
use uuid::Uuid;

/// Raw subject form data as submitted by an admin
#[derive(Debug, Clone)]
pub struct SubjectInput {
    pub name: String,
    pub code: String,
    pub credits: i32,
    pub subject_type: String,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
    pub is_laboratory: bool,
    pub is_active: bool,
}

/// Subject form data that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubject {
    pub name: String,
    pub code: String,
    pub credits: i16,
    pub subject_type: SubjectType,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
    pub is_laboratory: bool,
    pub is_active: bool,
}

impl SubjectInput {
    pub fn validate(&self) -> Result<ValidSubject, ValidationError> {
        let subject_type = self
            .subject_type
            .trim()
            .parse::<SubjectType>()
            .map_err(|_| ValidationError::InvalidSubjectType(self.subject_type.clone()))?;

        Ok(ValidSubject {
            name: require("name", &self.name)?,
            code: normalize_subject_code(&self.code)?,
            credits: validate_credits(self.credits)?,
            subject_type,
            description: optional(self.description.as_deref()),
            prerequisites: normalize_prerequisites(&self.prerequisites)?,
            is_laboratory: self.is_laboratory,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectSort {
    #[default]
    Name,
    Code,
    Credits,
    CreatedAt,
}

/// Predicates of the admin subject list; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    pub search: Option<String>,
    pub subject_type: Option<SubjectType>,
    pub is_active: Option<bool>,
    pub is_laboratory: Option<bool>,
    pub sort: SubjectSort,
    pub order: SortOrder,
}

impl SubjectFilter {
    pub fn matches(&self, subject: &subjects::Model) -> bool {
        let text_match = match search_term(self.search.as_deref()) {
            Some(needle) => {
                contains_ci(&subject.name, &needle)
                    || contains_ci(&subject.code, &needle)
                    || subject
                        .description
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, &needle))
            }
            None => true,
        };

        text_match
            && matches_opt(self.subject_type, subject.subject_type)
            && matches_opt(self.is_active, subject.is_active)
            && matches_opt(self.is_laboratory, subject.is_laboratory)
    }

    pub fn apply(&self, subjects: Vec<subjects::Model>) -> Vec<subjects::Model> {
        let mut filtered: Vec<_> = subjects.into_iter().filter(|s| self.matches(s)).collect();

        filtered.sort_by(|a, b| {
            let ordering = match self.sort {
                SubjectSort::Name => cmp_ci(&a.name, &b.name),
                SubjectSort::Code => a.code.cmp(&b.code),
                SubjectSort::Credits => a.credits.cmp(&b.credits),
                SubjectSort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            // Codes are unique, which keeps the order stable between requests
            self.order.apply(ordering.then_with(|| a.code.cmp(&b.code)))
        });

        filtered
    }
}

pub struct SubjectService;

impl SubjectService {
    /// Loads the whole subject table and narrows it with `filter`
    pub async fn list(
        db: &DatabaseConnection,
        filter: &SubjectFilter,
    ) -> Result<Vec<subjects::Model>, ServiceError> {
        let all = subjects::Entity::find().all(db).await?;
        Ok(filter.apply(all))
    }

    /// Active subjects ordered by code, used to populate assignment forms
    pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<subjects::Model>, ServiceError> {
        Ok(subjects::Entity::find()
            .filter(subjects::Column::IsActive.eq(true))
            .order_by_asc(subjects::Column::Code)
            .all(db)
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<subjects::Model, ServiceError> {
        subjects::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("subject"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: SubjectInput,
    ) -> Result<subjects::Model, ServiceError> {
        // Validation happens before any round trip to the database
        let subject = input.validate()?;

        let txn = db.begin().await?;
        Self::ensure_code_available(&txn, &subject.code, None).await?;

        let now = Utc::now().naive_utc();
        let code = subject.code.clone();
        let model = subjects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(subject.name),
            code: Set(subject.code),
            credits: Set(subject.credits),
            subject_type: Set(subject.subject_type),
            description: Set(subject.description),
            prerequisites: Set(subject.prerequisites.into()),
            is_laboratory: Set(subject.is_laboratory),
            is_active: Set(subject.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, code_taken(&code)))?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        input: SubjectInput,
    ) -> Result<subjects::Model, ServiceError> {
        let subject = input.validate()?;

        let txn = db.begin().await?;
        let existing = subjects::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("subject"))?;
        Self::ensure_code_available(&txn, &subject.code, Some(id)).await?;

        let code = subject.code.clone();
        let mut active: subjects::ActiveModel = existing.into();
        active.name = Set(subject.name);
        active.code = Set(subject.code);
        active.credits = Set(subject.credits);
        active.subject_type = Set(subject.subject_type);
        active.description = Set(subject.description);
        active.prerequisites = Set(subject.prerequisites.into());
        active.is_laboratory = Set(subject.is_laboratory);
        active.is_active = Set(subject.is_active);
        active.updated_at = Set(Utc::now().naive_utc());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::from_write(e, code_taken(&code)))?;

        txn.commit().await?;
        Ok(model)
    }

    /// Flips `is_active` and bumps `updated_at`, nothing else
    pub async fn toggle_active(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<subjects::Model, ServiceError> {
        let txn = db.begin().await?;
        let result = subjects::Entity::update_many()
            .col_expr(subjects::Column::IsActive, Expr::col(subjects::Column::IsActive).not())
            .col_expr(subjects::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(subjects::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("subject"));
        }

        let model = subjects::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("subject"))?;
        txn.commit().await?;
        Ok(model)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = subjects::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("subject"));
        }
        Ok(())
    }

    async fn ensure_code_available<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = subjects::Entity::find().filter(subjects::Column::Code.eq(code));
        if let Some(id) = except {
            query = query.filter(subjects::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(ServiceError::Conflict(code_taken(code)));
        }
        Ok(())
    }
}

fn code_taken(code: &str) -> String {
    format!("A subject with code {code} already exists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input(code: &str, credits: i32) -> SubjectInput {
        SubjectInput {
            name: "Cálculo Diferencial".to_string(),
            code: code.to_string(),
            credits,
            subject_type: "basica".to_string(),
            description: Some("  ".to_string()),
            prerequisites: vec!["mat100".to_string()],
            is_laboratory: false,
            is_active: true,
        }
    }

    fn subject(name: &str, code: &str, credits: i16, is_active: bool, day: u32) -> subjects::Model {
        let created = NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        subjects::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            credits,
            subject_type: SubjectType::Basica,
            description: Some(format!("Curso de {name}")),
            prerequisites: serde_json::json!([]),
            is_laboratory: code.starts_with("LAB"),
            is_active,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let valid = input("mat101", 5).validate().unwrap();
        assert_eq!(valid.code, "MAT101");
        assert_eq!(valid.description, None);
        assert_eq!(valid.prerequisites, vec!["MAT100".to_string()]);
        assert_eq!(valid.subject_type, SubjectType::Basica);
    }

    #[test]
    fn test_validate_rejects_credits_out_of_range() {
        assert_eq!(
            input("MAT101", 0).validate(),
            Err(ValidationError::CreditsOutOfRange(0))
        );
        assert_eq!(
            input("MAT101", 11).validate(),
            Err(ValidationError::CreditsOutOfRange(11))
        );
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let mut bad = input("MAT101", 4);
        bad.subject_type = "electiva".to_string();
        assert_eq!(
            bad.validate(),
            Err(ValidationError::InvalidSubjectType("electiva".to_string()))
        );
    }

    #[test]
    fn test_filter_searches_name_code_and_description() {
        let subjects = vec![
            subject("Álgebra", "MAT102", 4, true, 1),
            subject("Física I", "FIS101", 5, true, 2),
            subject("Laboratorio de Física", "LABFIS1", 1, false, 3),
        ];

        let filter = SubjectFilter {
            search: Some("fís".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = filter.apply(subjects.clone()).into_iter().map(|s| s.code).collect();
        assert_eq!(names, vec!["FIS101", "LABFIS1"]);

        let filter = SubjectFilter {
            search: Some("mat1".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(subjects.clone()).len(), 1);

        let filter = SubjectFilter {
            search: Some("curso de álgebra".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(subjects).len(), 1);
    }

    #[test]
    fn test_filter_combines_equality_predicates() {
        let subjects = vec![
            subject("Física I", "FIS101", 5, true, 2),
            subject("Laboratorio de Física", "LABFIS1", 1, false, 3),
            subject("Laboratorio de Química", "LABQUI1", 1, true, 4),
        ];

        let filter = SubjectFilter {
            is_laboratory: Some(true),
            is_active: Some(true),
            ..Default::default()
        };
        let codes: Vec<_> = filter.apply(subjects).into_iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["LABQUI1"]);
    }

    #[test]
    fn test_sorting() {
        let subjects = vec![
            subject("física I", "FIS101", 5, true, 3),
            subject("Álgebra", "MAT102", 4, true, 1),
            subject("Dibujo", "DIB100", 2, true, 2),
        ];

        let by_credits = SubjectFilter {
            sort: SubjectSort::Credits,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let codes: Vec<_> = by_credits.apply(subjects.clone()).into_iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["FIS101", "MAT102", "DIB100"]);

        let by_created = SubjectFilter {
            sort: SubjectSort::CreatedAt,
            ..Default::default()
        };
        let codes: Vec<_> = by_created.apply(subjects).into_iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["MAT102", "DIB100", "FIS101"]);
    }
}
