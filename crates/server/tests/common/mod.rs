#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::Duration;
use database::services::{
    auth::{AuthService, SignUpInput},
    profile::ProfileService,
};
use migration::{Migrator, MigratorTrait};
use models::role::Role;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use server::{app, config::Config, state::AppState};
use std::collections::HashMap;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "contraseña";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(&[]).await
}

/// Same as [`spawn_app`] with extra configuration variables
pub async fn spawn_app_with(extra: &[(&str, &str)]) -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let mut vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "sqlite::memory:".to_string()),
        ("SECRET_KEY", "s".repeat(64)),
    ]);
    vars.extend(extra.iter().map(|(name, value)| (*name, value.to_string())));
    let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();
    let state = AppState::new(db.clone(), config).unwrap();

    TestApp {
        router: app(state),
        db,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request("GET", uri, cookie, None)).await
    }

    /// Registers a confirmed user and returns its id
    pub async fn create_user(&self, email: &str, role: Role) -> Uuid {
        let pending = AuthService::sign_up(
            &self.db,
            SignUpInput {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                display_name: "Usuario".to_string(),
            },
            Duration::minutes(60),
        )
        .await
        .unwrap();
        AuthService::confirm_email(&self.db, &pending.token).await.unwrap();
        ProfileService::set_role(&self.db, pending.user.id, role).await.unwrap();
        pending.user.id
    }

    /// Signs in through the login endpoint and returns the session cookie
    pub async fn login(&self, email: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": PASSWORD });
        let response = self
            .send(request("POST", "/auth/login", None, Some(body)))
            .await;
        assert_eq!(response.status(), 200);
        session_cookie(&response).unwrap()
    }

    pub async fn admin_cookie(&self) -> String {
        self.create_user("admin@uanl.mx", Role::Admin).await;
        self.login("admin@uanl.mx").await
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// `name=value` of the session cookie set by `response`, if any
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    set_cookie(response, "fimenet_session")
}

/// `name=value` of the cookie called `name` set by `response`, if any
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
