use crate::{
    entities::{teacher_reviews, teachers},
    error::ServiceError,
};
use chrono::Utc;
use models::{
    semester::Semester,
    validation::{ValidationError, require, validate_comment, validate_rating},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub rating: i32,
    pub comment: String,
    pub subject_name: String,
    pub semester: String,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
    pub rating: i16,
    pub comment: String,
    pub subject_name: String,
    pub semester: Semester,
    pub is_anonymous: bool,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<ValidReview, ValidationError> {
        Ok(ValidReview {
            rating: validate_rating(self.rating)?,
            comment: validate_comment(&self.comment)?,
            subject_name: require("subject_name", &self.subject_name)?,
            semester: self.semester.parse()?,
            is_anonymous: self.is_anonymous,
        })
    }
}

pub struct ReviewService;

impl ReviewService {
    /// Stores a review by `user_id` for an active teacher.
    ///
    /// A user may review a teacher once per subject (compared without case)
    /// and semester.
    pub async fn submit(
        db: &DatabaseConnection,
        teacher_id: Uuid,
        user_id: Uuid,
        input: ReviewInput,
    ) -> Result<teacher_reviews::Model, ServiceError> {
        let review = input.validate()?;

        let txn = db.begin().await?;
        let teacher = teachers::Entity::find_by_id(teacher_id)
            .one(&txn)
            .await?
            .filter(|t| t.is_active)
            .ok_or(ServiceError::NotFound("teacher"))?;

        let previous = teacher_reviews::Entity::find()
            .filter(teacher_reviews::Column::TeacherId.eq(teacher.id))
            .filter(teacher_reviews::Column::UserId.eq(user_id))
            .filter(teacher_reviews::Column::Semester.eq(review.semester.to_string()))
            .all(&txn)
            .await?;

        let wanted = review.subject_name.to_lowercase();
        if previous
            .iter()
            .any(|r| r.subject_name.to_lowercase() == wanted)
        {
            return Err(ServiceError::Conflict(DUPLICATE.to_string()));
        }

        let model = teacher_reviews::ActiveModel {
            id: Set(Uuid::new_v4()),
            teacher_id: Set(teacher.id),
            user_id: Set(user_id),
            rating: Set(review.rating),
            comment: Set(review.comment),
            subject_name: Set(review.subject_name),
            semester: Set(review.semester.to_string()),
            is_anonymous: Set(review.is_anonymous),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, DUPLICATE))?;

        txn.commit().await?;
        Ok(model)
    }
}

const DUPLICATE: &str = "You already reviewed this teacher for that subject and semester";

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ReviewInput {
        ReviewInput {
            rating: 4,
            comment: "  Explica muy bien  ".to_string(),
            subject_name: "Cálculo I".to_string(),
            semester: "2".to_string(),
            is_anonymous: true,
        }
    }

    #[test]
    fn test_validate_trims_comment() {
        let valid = input().validate().unwrap();
        assert_eq!(valid.comment, "Explica muy bien");
        assert_eq!(valid.rating, 4);
        assert_eq!(valid.semester, Semester::new(2).unwrap());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let zero = ReviewInput { rating: 0, ..input() };
        assert_eq!(zero.validate(), Err(ValidationError::RatingOutOfRange(0)));

        let long = ReviewInput {
            comment: "a".repeat(501),
            ..input()
        };
        assert_eq!(long.validate(), Err(ValidationError::CommentTooLong(501)));

        let semester = ReviewInput {
            semester: "11".to_string(),
            ..input()
        };
        assert!(matches!(
            semester.validate(),
            Err(ValidationError::InvalidSemester(_))
        ));

        let subject = ReviewInput {
            subject_name: " ".to_string(),
            ..input()
        };
        assert_eq!(
            subject.validate(),
            Err(ValidationError::Required("subject_name"))
        );
    }
}
