#![allow(dead_code)]

use database::{
    entities::{subjects, teachers},
    services::{
        auth::{AuthService, SignUpInput},
        subject::{SubjectInput, SubjectService},
        teacher::{TeacherInput, TeacherService},
    },
};
use chrono::Duration;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Fresh in-memory database with the full schema.
///
/// Every pooled SQLite connection would open its own empty in-memory
/// database, so the pool is capped at one connection.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn subject_input(code: &str, credits: i32) -> SubjectInput {
    SubjectInput {
        name: format!("Materia {code}"),
        code: code.to_string(),
        credits,
        subject_type: "basica".to_string(),
        description: None,
        prerequisites: Vec::new(),
        is_laboratory: false,
        is_active: true,
    }
}

pub async fn create_subject(db: &DatabaseConnection, code: &str) -> subjects::Model {
    SubjectService::create(db, subject_input(code, 5)).await.unwrap()
}

pub fn teacher_input(name: &str, email: &str) -> TeacherInput {
    TeacherInput {
        name: name.to_string(),
        email: email.to_string(),
        degree: None,
        avatar_url: None,
        is_active: true,
    }
}

pub async fn create_teacher(db: &DatabaseConnection, name: &str, email: &str) -> teachers::Model {
    TeacherService::create(db, teacher_input(name, email), Vec::new())
        .await
        .unwrap()
        .0
}

/// Registers and confirms a user, returning its id
pub async fn create_user(db: &DatabaseConnection, email: &str, display_name: &str) -> Uuid {
    let pending = AuthService::sign_up(
        db,
        SignUpInput {
            email: email.to_string(),
            password: "contraseña".to_string(),
            display_name: display_name.to_string(),
        },
        Duration::minutes(60),
    )
    .await
    .unwrap();

    AuthService::confirm_email(db, &pending.token).await.unwrap();
    pending.user.id
}
