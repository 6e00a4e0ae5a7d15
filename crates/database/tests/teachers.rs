mod common;

use common::{create_subject, create_teacher, setup_db, teacher_input};
use database::{
    entities::teachers,
    error::ServiceError,
    services::{
        assignment::{AssignmentFilter, AssignmentInput, AssignmentService},
        teacher::{InitialAssignment, TeacherFilter, TeacherService},
    },
};
use uuid::Uuid;

#[tokio::test]
async fn test_create_with_assignments() {
    let db = setup_db().await;
    let calc = create_subject(&db, "MAT101").await;
    let phys = create_subject(&db, "FIS101").await;

    let (teacher, assignments) = TeacherService::create(
        &db,
        teacher_input("Ana López", "ANA@uanl.mx"),
        vec![
            InitialAssignment {
                subject_id: phys.id,
                semester: "3".to_string(),
            },
            InitialAssignment {
                subject_id: calc.id,
                semester: "1".to_string(),
            },
            InitialAssignment {
                subject_id: calc.id,
                semester: "1".to_string(),
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(teacher.email, "ana@uanl.mx");
    assert_eq!(assignments.len(), 2);

    let listed = TeacherService::assignments(&db, teacher.id).await.unwrap();
    let codes: Vec<_> = listed.iter().map(|(_, s)| s.code.as_str()).collect();
    assert_eq!(codes, vec!["MAT101", "FIS101"]);
}

#[tokio::test]
async fn test_failed_assignment_rolls_back_teacher() {
    let db = setup_db().await;

    let result = TeacherService::create(
        &db,
        teacher_input("Ana López", "ana@uanl.mx"),
        vec![InitialAssignment {
            subject_id: Uuid::new_v4(),
            semester: "1".to_string(),
        }],
    )
    .await;
    assert!(matches!(result, Err(ServiceError::NotFound("subject"))));

    let teachers = TeacherService::list(&db, &TeacherFilter::default()).await.unwrap();
    assert!(teachers.is_empty());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let db = setup_db().await;
    create_teacher(&db, "Ana López", "ana@uanl.mx").await;
    let bruno = create_teacher(&db, "Bruno Díaz", "bruno@uanl.mx").await;

    let created = TeacherService::create(&db, teacher_input("Otra Ana", "Ana@UANL.mx"), Vec::new()).await;
    assert!(matches!(created, Err(ServiceError::Conflict(_))));

    let updated = TeacherService::update(&db, bruno.id, teacher_input("Bruno", "ana@uanl.mx")).await;
    assert!(matches!(updated, Err(ServiceError::Conflict(_))));

    let renamed = TeacherService::update(&db, bruno.id, teacher_input("Bruno D.", "bruno@uanl.mx"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Bruno D.");
}

#[tokio::test]
async fn test_toggle_teacher() {
    let db = setup_db().await;
    let ana = create_teacher(&db, "Ana López", "ana@uanl.mx").await;

    let toggled = TeacherService::toggle_active(&db, ana.id).await.unwrap();
    assert!(toggled.updated_at >= ana.updated_at);
    assert_eq!(
        toggled,
        teachers::Model {
            is_active: false,
            updated_at: toggled.updated_at,
            ..ana.clone()
        }
    );

    let back = TeacherService::toggle_active(&db, ana.id).await.unwrap();
    assert!(back.is_active);
    assert_eq!(
        back,
        teachers::Model {
            updated_at: back.updated_at,
            ..ana.clone()
        }
    );
    assert_eq!(TeacherService::get(&db, ana.id).await.unwrap(), back);

    let missing = TeacherService::toggle_active(&db, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(ServiceError::NotFound("teacher"))));
}

#[tokio::test]
async fn test_assignment_rules() {
    let db = setup_db().await;
    let ana = create_teacher(&db, "Ana López", "ana@uanl.mx").await;
    let calc = create_subject(&db, "MAT101").await;

    let input = |semester: &str| AssignmentInput {
        teacher_id: ana.id,
        subject_id: calc.id,
        semester: semester.to_string(),
    };

    let first = AssignmentService::create(&db, input("1")).await.unwrap();
    assert_eq!(first.semester, "1");

    let duplicate = AssignmentService::create(&db, input("1")).await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    let bad_semester = AssignmentService::create(&db, input("11")).await;
    assert!(matches!(bad_semester, Err(ServiceError::Validation(_))));

    let second = AssignmentService::create(&db, input("2")).await.unwrap();
    let clash = AssignmentService::update(&db, second.id, input("1")).await;
    assert!(matches!(clash, Err(ServiceError::Conflict(_))));

    let moved = AssignmentService::update(&db, second.id, input("4")).await.unwrap();
    assert_eq!(moved.semester, "4");

    let missing_teacher = AssignmentService::create(
        &db,
        AssignmentInput {
            teacher_id: Uuid::new_v4(),
            subject_id: calc.id,
            semester: "1".to_string(),
        },
    )
    .await;
    assert!(matches!(missing_teacher, Err(ServiceError::NotFound("teacher"))));

    let rows = AssignmentService::list(&db, &AssignmentFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].teacher_name, "Ana López");
    assert_eq!(rows[0].subject_code, "MAT101");
    assert_eq!(rows[0].assignment.semester, "1");

    AssignmentService::delete(&db, first.id).await.unwrap();
    let gone = AssignmentService::delete(&db, first.id).await;
    assert!(matches!(gone, Err(ServiceError::NotFound("assignment"))));
}
