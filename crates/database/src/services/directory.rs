//! Read side of the public teacher directory.

use crate::{
    entities::{profiles, subjects, teacher_reviews, teacher_subjects, teachers},
    error::ServiceError,
    filters::{escape_like, search_term},
    services::teacher::semester_order,
};
use chrono::NaiveDateTime;
use models::{dedup::dedup_by_key, rating::RatingSummary};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

pub const TEACHERS_PAGE_SIZE: u64 = 12;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectSummary {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

impl From<&subjects::Model> for SubjectSummary {
    fn from(subject: &subjects::Model) -> Self {
        Self {
            id: subject.id,
            name: subject.name.clone(),
            code: subject.code.clone(),
        }
    }
}

/// One entry of the public teacher list
#[derive(Debug, Clone, Serialize)]
pub struct TeacherCard {
    pub teacher: teachers::Model,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub subjects: Vec<SubjectSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherPage {
    pub teachers: Vec<TeacherCard>,
    pub page: u64,
    pub total_items: u64,
}

/// A subject on a teacher profile with every semester it is taught in
#[derive(Debug, Clone, Serialize)]
pub struct SubjectTeaching {
    pub subject: SubjectSummary,
    pub semesters: Vec<String>,
}

/// A review as the public sees it. Anonymous reviews carry neither the
/// author's name nor their id.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub subject_name: String,
    pub semester: String,
    pub is_anonymous: bool,
    pub created_at: NaiveDateTime,
    pub user_id: Option<Uuid>,
    pub author_name: Option<String>,
}

impl ReviewView {
    fn new(review: teacher_reviews::Model, author: Option<profiles::Model>) -> Self {
        let (user_id, author_name) = if review.is_anonymous {
            (None, None)
        } else {
            (Some(review.user_id), author.map(|p| p.display_name))
        };

        Self {
            id: review.id,
            rating: review.rating,
            comment: review.comment,
            subject_name: review.subject_name,
            semester: review.semester,
            is_anonymous: review.is_anonymous,
            created_at: review.created_at,
            user_id,
            author_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherProfile {
    pub teacher: teachers::Model,
    pub subjects: Vec<SubjectTeaching>,
    pub reviews: Vec<ReviewView>,
    pub summary: RatingSummary,
}

pub struct DirectoryService;

impl DirectoryService {
    /// Active teachers ordered by name, `TEACHERS_PAGE_SIZE` per page.
    /// `page` is 1-based; 0 is read as 1. Pages past the end are empty.
    pub async fn list_teachers(
        db: &DatabaseConnection,
        page: u64,
        search: Option<&str>,
    ) -> Result<TeacherPage, ServiceError> {
        let page = page.max(1);

        let mut query = teachers::Entity::find().filter(teachers::Column::IsActive.eq(true));
        if let Some(needle) = search_term(search) {
            let pattern = LikeExpr::new(format!("%{}%", escape_like(&needle))).escape('\\');
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(teachers::Column::Name))).like(pattern),
            );
        }

        let paginator = query
            .order_by_asc(teachers::Column::Name)
            .order_by_asc(teachers::Column::Id)
            .paginate(db, TEACHERS_PAGE_SIZE);

        let total_items = paginator.num_items().await?;
        let past_end = (page - 1)
            .checked_mul(TEACHERS_PAGE_SIZE)
            .is_none_or(|offset| offset >= total_items);
        if past_end {
            return Ok(TeacherPage {
                teachers: Vec::new(),
                page,
                total_items,
            });
        }

        let page_teachers = paginator.fetch_page(page - 1).await?;

        let ids: Vec<Uuid> = page_teachers.iter().map(|t| t.id).collect();
        let (assignments, ratings) = futures::try_join!(
            teacher_subjects::Entity::find()
                .filter(teacher_subjects::Column::TeacherId.is_in(ids.clone()))
                .find_also_related(subjects::Entity)
                .order_by_asc(teacher_subjects::Column::CreatedAt)
                .all(db),
            teacher_reviews::Entity::find()
                .select_only()
                .column(teacher_reviews::Column::TeacherId)
                .column(teacher_reviews::Column::Rating)
                .filter(teacher_reviews::Column::TeacherId.is_in(ids))
                .into_tuple::<(Uuid, i16)>()
                .all(db),
        )?;

        let mut subjects_by_teacher: HashMap<Uuid, Vec<subjects::Model>> = HashMap::new();
        for (assignment, subject) in assignments {
            if let Some(subject) = subject {
                subjects_by_teacher
                    .entry(assignment.teacher_id)
                    .or_default()
                    .push(subject);
            }
        }

        let mut ratings_by_teacher: HashMap<Uuid, Vec<i16>> = HashMap::new();
        for (teacher_id, rating) in ratings {
            ratings_by_teacher.entry(teacher_id).or_default().push(rating);
        }

        let teachers = page_teachers
            .into_iter()
            .map(|teacher| {
                let summary = RatingSummary::from_ratings(
                    ratings_by_teacher.remove(&teacher.id).unwrap_or_default(),
                );
                let subjects = dedup_by_key(
                    subjects_by_teacher.remove(&teacher.id).unwrap_or_default(),
                    |s| s.id,
                );

                TeacherCard {
                    teacher,
                    average_rating: summary.average_rating,
                    total_reviews: summary.total_reviews,
                    subjects: subjects.iter().map(SubjectSummary::from).collect(),
                }
            })
            .collect();

        Ok(TeacherPage {
            teachers,
            page,
            total_items,
        })
    }

    /// Public profile of an active teacher
    pub async fn teacher_profile(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<TeacherProfile, ServiceError> {
        let teacher = teachers::Entity::find_by_id(id)
            .one(db)
            .await?
            .filter(|t| t.is_active)
            .ok_or(ServiceError::NotFound("teacher"))?;

        let (assignments, reviews) = futures::try_join!(
            teacher_subjects::Entity::find()
                .filter(teacher_subjects::Column::TeacherId.eq(id))
                .find_also_related(subjects::Entity)
                .order_by_asc(teacher_subjects::Column::CreatedAt)
                .all(db),
            teacher_reviews::Entity::find()
                .filter(teacher_reviews::Column::TeacherId.eq(id))
                .find_also_related(profiles::Entity)
                .order_by_desc(teacher_reviews::Column::CreatedAt)
                .all(db),
        )?;

        let summary = RatingSummary::from_ratings(reviews.iter().map(|(r, _)| r.rating));
        let reviews = reviews
            .into_iter()
            .map(|(review, author)| ReviewView::new(review, author))
            .collect();

        Ok(TeacherProfile {
            teacher,
            subjects: group_semesters(assignments),
            reviews,
            summary,
        })
    }
}

/// Collapses assignment rows to one entry per subject, keeping first-seen
/// order and collecting the distinct semesters in numeric order
fn group_semesters(
    rows: Vec<(teacher_subjects::Model, Option<subjects::Model>)>,
) -> Vec<SubjectTeaching> {
    let mut semesters: HashMap<Uuid, Vec<String>> = HashMap::new();
    let mut subjects = Vec::new();

    for (assignment, subject) in rows {
        let Some(subject) = subject else { continue };
        let entry = semesters.entry(subject.id).or_default();
        if !entry.contains(&assignment.semester) {
            entry.push(assignment.semester);
        }
        subjects.push(subject);
    }

    dedup_by_key(subjects, |s| s.id)
        .iter()
        .map(|subject| {
            let mut taught_in = semesters.remove(&subject.id).unwrap_or_default();
            taught_in.sort_by_key(|s| semester_order(s));
            SubjectTeaching {
                subject: SubjectSummary::from(subject),
                semesters: taught_in,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::subject_type::SubjectType;

    fn subject(code: &str) -> subjects::Model {
        subjects::Model {
            id: Uuid::new_v4(),
            name: format!("Materia {code}"),
            code: code.to_string(),
            credits: 4,
            subject_type: SubjectType::Basica,
            description: None,
            prerequisites: serde_json::json!([]),
            is_laboratory: false,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn assignment(subject: &subjects::Model, semester: &str) -> teacher_subjects::Model {
        teacher_subjects::Model {
            id: Uuid::new_v4(),
            teacher_id: Uuid::nil(),
            subject_id: subject.id,
            semester: semester.to_string(),
            created_at: NaiveDateTime::default(),
        }
    }

    fn review(is_anonymous: bool) -> teacher_reviews::Model {
        teacher_reviews::Model {
            id: Uuid::new_v4(),
            teacher_id: Uuid::nil(),
            user_id: Uuid::new_v4(),
            rating: 5,
            comment: "Excelente".to_string(),
            subject_name: "Cálculo".to_string(),
            semester: "1".to_string(),
            is_anonymous,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_group_semesters_dedups_subjects() {
        let calc = subject("MAT101");
        let phys = subject("FIS101");
        let rows = vec![
            (assignment(&calc, "10"), Some(calc.clone())),
            (assignment(&phys, "1"), Some(phys.clone())),
            (assignment(&calc, "2"), Some(calc.clone())),
            (assignment(&calc, "2"), Some(calc.clone())),
        ];

        let grouped = group_semesters(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].subject.code, "MAT101");
        assert_eq!(grouped[0].semesters, vec!["2", "10"]);
        assert_eq!(grouped[1].semesters, vec!["1"]);
    }

    #[test]
    fn test_anonymous_review_hides_author() {
        let author = profiles::Model {
            id: Uuid::new_v4(),
            display_name: "Luis".to_string(),
            role: Default::default(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };

        let hidden = ReviewView::new(review(true), Some(author.clone()));
        assert_eq!(hidden.author_name, None);
        assert_eq!(hidden.user_id, None);

        let shown = ReviewView::new(review(false), Some(author));
        assert_eq!(shown.author_name.as_deref(), Some("Luis"));
        assert!(shown.user_id.is_some());
    }
}
