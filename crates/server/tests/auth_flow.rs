mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{
    PASSWORD, json_body, location, request, session_cookie, set_cookie, spawn_app, spawn_app_with,
};
use database::services::auth::{AuthService, SignUpInput};
use models::role::Role;
use serde_json::json;

#[tokio::test]
async fn test_sign_up_then_login_requires_confirmation() {
    let app = spawn_app().await;

    let body = json!({ "email": "luis@uanl.mx", "password": PASSWORD, "display_name": "Luis" });
    let response = app.send(request("POST", "/auth/signup", None, Some(body.clone()))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let again = app.send(request("POST", "/auth/signup", None, Some(body))).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(again).await["error"], "conflict");

    let login = json!({ "email": "luis@uanl.mx", "password": PASSWORD });
    let response = app.send(request("POST", "/auth/login", None, Some(login))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_sign_up_is_rejected() {
    let app = spawn_app().await;

    let body = json!({ "email": "no-es-correo", "password": PASSWORD, "display_name": "Luis" });
    let response = app.send(request("POST", "/auth/signup", None, Some(body))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation");
}

#[tokio::test]
async fn test_confirmation_link_signs_in() {
    let app = spawn_app().await;
    let pending = AuthService::sign_up(
        &app.db,
        SignUpInput {
            email: "luis@uanl.mx".to_string(),
            password: PASSWORD.to_string(),
            display_name: "Luis".to_string(),
        },
        Duration::minutes(60),
    )
    .await
    .unwrap();

    let uri = format!(
        "/auth/confirm?token_hash={}&type=email&next=/faq",
        pending.token
    );
    let response = app.get(&uri, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/faq");
    let cookie = session_cookie(&response).unwrap();

    let me = app.get("/auth/user", Some(&cookie)).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = json_body(me).await;
    assert_eq!(me["email"], "luis@uanl.mx");
    assert_eq!(me["display_name"], "Luis");
    assert_eq!(me["role"], "user");

    // Used links fail
    let reused = app.get(&uri, None).await;
    assert_eq!(location(&reused), "/auth/login?error=confirmation");
}

#[tokio::test]
async fn test_login_redirect_stays_local() {
    let app = spawn_app().await;
    app.create_user("luis@uanl.mx", Role::User).await;
    let login = json!({ "email": "luis@uanl.mx", "password": PASSWORD });

    let local = app
        .send(request(
            "POST",
            "/auth/login?redirectTo=%2Fteachers-list%3Fpage%3D2",
            None,
            Some(login.clone()),
        ))
        .await;
    assert_eq!(json_body(local).await["redirect_to"], "/teachers-list?page=2");

    let foreign = app
        .send(request(
            "POST",
            "/auth/login?redirectTo=%2F%2Fevil.example",
            None,
            Some(login),
        ))
        .await;
    assert_eq!(json_body(foreign).await["redirect_to"], "/");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.create_user("luis@uanl.mx", Role::User).await;

    let login = json!({ "email": "luis@uanl.mx", "password": "incorrecta" });
    let response = app.send(request("POST", "/auth/login", None, Some(login))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = spawn_app().await;
    app.create_user("luis@uanl.mx", Role::User).await;
    let cookie = app.login("luis@uanl.mx").await;

    let response = app.send(request("POST", "/auth/logout", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = app.get("/auth/user", Some(&cookie)).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oauth_is_off_without_configuration() {
    let app = spawn_app().await;
    let response = app.get("/auth/oauth", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listed_admin_is_promoted_at_login() {
    let app = spawn_app_with(&[("ADMIN_EMAILS", "Coord@uanl.mx")]).await;
    app.create_user("coord@uanl.mx", Role::User).await;
    app.create_user("alumno@uanl.mx", Role::User).await;

    let login = json!({ "email": "coord@uanl.mx", "password": PASSWORD });
    let response = app.send(request("POST", "/auth/login", None, Some(login))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(json_body(response).await["user"]["role"], "admin");

    let dashboard = app.get("/admin", Some(&cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);

    let student = app.login("alumno@uanl.mx").await;
    let response = app.get("/admin", Some(&student)).await;
    assert_eq!(location(&response), "/unauthorized");
}

#[tokio::test]
async fn test_oauth_state_mismatch_clears_state_cookie() {
    let app = spawn_app_with(&[
        ("OAUTH_CLIENT_ID", "fimenet"),
        ("OAUTH_CLIENT_SECRET", "secreto"),
        ("OAUTH_AUTHORIZE_URL", "https://idp.example/authorize"),
        ("OAUTH_TOKEN_URL", "https://idp.example/token"),
        ("OAUTH_USERINFO_URL", "https://idp.example/userinfo"),
        ("OAUTH_REDIRECT_URL", "http://localhost:3000/auth/callback"),
    ])
    .await;

    let authorize = app.get("/auth/oauth", None).await;
    assert_eq!(authorize.status(), StatusCode::SEE_OTHER);
    assert!(location(&authorize).starts_with("https://idp.example/authorize?"));
    let state_cookie = set_cookie(&authorize, "fimenet_oauth_state").unwrap();

    let callback = app
        .get("/auth/callback?code=abc&state=otro", Some(&state_cookie))
        .await;
    assert_eq!(callback.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        set_cookie(&callback, "fimenet_oauth_state").as_deref(),
        Some("fimenet_oauth_state=")
    );
    assert_eq!(session_cookie(&callback), None);
}
