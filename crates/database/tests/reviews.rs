mod common;

use common::{create_teacher, create_user, setup_db};
use database::{
    error::ServiceError,
    services::{
        review::{ReviewInput, ReviewService},
        teacher::TeacherService,
    },
};
use models::validation::ValidationError;
use uuid::Uuid;

fn input(subject: &str, semester: &str) -> ReviewInput {
    ReviewInput {
        rating: 4,
        comment: "Clases muy claras".to_string(),
        subject_name: subject.to_string(),
        semester: semester.to_string(),
        is_anonymous: false,
    }
}

#[tokio::test]
async fn test_one_review_per_subject_and_semester() {
    let db = setup_db().await;
    let ana = create_teacher(&db, "Ana López", "ana@uanl.mx").await;
    let luis = create_user(&db, "luis@uanl.mx", "Luis").await;

    let stored = ReviewService::submit(&db, ana.id, luis, input("Cálculo I", "1"))
        .await
        .unwrap();
    assert_eq!(stored.rating, 4);
    assert_eq!(stored.user_id, luis);

    let duplicate = ReviewService::submit(&db, ana.id, luis, input("CÁLCULO I", "1")).await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    // Another semester or subject is a different review
    ReviewService::submit(&db, ana.id, luis, input("Cálculo I", "2"))
        .await
        .unwrap();
    ReviewService::submit(&db, ana.id, luis, input("Álgebra", "1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_review_targets_active_teachers() {
    let db = setup_db().await;
    let ana = create_teacher(&db, "Ana López", "ana@uanl.mx").await;
    let luis = create_user(&db, "luis@uanl.mx", "Luis").await;
    TeacherService::toggle_active(&db, ana.id).await.unwrap();

    let inactive = ReviewService::submit(&db, ana.id, luis, input("Cálculo I", "1")).await;
    assert!(matches!(inactive, Err(ServiceError::NotFound("teacher"))));

    let missing = ReviewService::submit(&db, Uuid::new_v4(), luis, input("Cálculo I", "1")).await;
    assert!(matches!(missing, Err(ServiceError::NotFound("teacher"))));
}

#[tokio::test]
async fn test_invalid_rating_is_rejected_before_lookup() {
    let db = setup_db().await;

    let result = ReviewService::submit(
        &db,
        Uuid::new_v4(),
        Uuid::new_v4(),
        ReviewInput {
            rating: 6,
            ..input("Cálculo I", "1")
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(ServiceError::Validation(ValidationError::RatingOutOfRange(6)))
    ));
}
