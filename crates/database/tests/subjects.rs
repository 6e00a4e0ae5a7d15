mod common;

use common::{create_subject, setup_db, subject_input};
use database::{
    entities::subjects,
    error::ServiceError,
    services::subject::{SubjectFilter, SubjectService},
};
use models::validation::ValidationError;
use uuid::Uuid;

#[tokio::test]
async fn test_code_uniqueness_ignores_case() {
    let db = setup_db().await;
    let first = create_subject(&db, "MAT101").await;
    assert_eq!(first.code, "MAT101");

    let duplicate = SubjectService::create(&db, subject_input("mat101", 4)).await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    let all = SubjectService::list(&db, &SubjectFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_credits_out_of_range_are_rejected() {
    let db = setup_db().await;

    for credits in [0, 11, -3] {
        let result = SubjectService::create(&db, subject_input("FIS101", credits)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::CreditsOutOfRange(c))) if c == credits
        ));
    }

    let all = SubjectService::list(&db, &SubjectFilter::default()).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_update_keeps_own_code_but_not_others() {
    let db = setup_db().await;
    let calc = create_subject(&db, "MAT101").await;
    create_subject(&db, "FIS101").await;

    let mut input = subject_input("mat101", 8);
    input.prerequisites = vec!["fis101".to_string()];
    let updated = SubjectService::update(&db, calc.id, input).await.unwrap();
    assert_eq!(updated.credits, 8);
    assert_eq!(updated.prerequisite_codes(), vec!["FIS101"]);

    let clash = SubjectService::update(&db, calc.id, subject_input("FIS101", 8)).await;
    assert!(matches!(clash, Err(ServiceError::Conflict(_))));

    let missing = SubjectService::update(&db, Uuid::new_v4(), subject_input("QUI101", 3)).await;
    assert!(matches!(missing, Err(ServiceError::NotFound("subject"))));
}

#[tokio::test]
async fn test_toggle_active_flips_only_the_flag() {
    let db = setup_db().await;
    let created = create_subject(&db, "DIB100").await;

    let toggled = SubjectService::toggle_active(&db, created.id).await.unwrap();
    assert!(toggled.updated_at >= created.updated_at);
    assert_eq!(
        toggled,
        subjects::Model {
            is_active: false,
            updated_at: toggled.updated_at,
            ..created.clone()
        }
    );
    assert!(SubjectService::list_active(&db).await.unwrap().is_empty());

    let back = SubjectService::toggle_active(&db, created.id).await.unwrap();
    assert!(back.updated_at >= toggled.updated_at);
    assert_eq!(
        back,
        subjects::Model {
            updated_at: back.updated_at,
            ..created.clone()
        }
    );
    assert_eq!(SubjectService::get(&db, created.id).await.unwrap(), back);

    let missing = SubjectService::toggle_active(&db, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(ServiceError::NotFound("subject"))));
}

#[tokio::test]
async fn test_delete_missing_subject() {
    let db = setup_db().await;
    let created = create_subject(&db, "MAT101").await;

    SubjectService::delete(&db, created.id).await.unwrap();
    let again = SubjectService::delete(&db, created.id).await;
    assert!(matches!(again, Err(ServiceError::NotFound("subject"))));
}
