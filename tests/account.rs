mod common;
use adminhub::model::entity::UserEntity;
use adminhub::web::middlewares::AUTH_TOKEN;
use adminhub::web::routes::account::SESSION_TTL_DAYS;
use axum::http::StatusCode;
use serde_json::json;
use tower_cookies::cookie::{SameSite, time::Duration};

use crate::common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, Action, Flow, assert_error_body, create_user_action,
    setup_server, setup_test_db, signin_action, signin_admin_action, signin_test_user_action,
};

#[tokio::test]
async fn route_signin_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            signin_admin_action()
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
                    assert_eq!(cookie.path(), Some("/"));
                    assert_eq!(cookie.http_only(), Some(true));
                    assert_eq!(cookie.max_age(), Some(Duration::days(SESSION_TTL_DAYS)));
                })
                .assert_json(|body| {
                    assert_eq!(body["success"], json!(true));
                    let user: UserEntity =
                        serde_json::from_value(body["data"]["user"].clone()).unwrap();
                    assert_eq!(user.email(), ADMIN_EMAIL);
                    assert!(body["data"]["token"].as_str().is_some());
                    assert!(body["data"]["user"].get("password_hash").is_none());
                }),
        )
        // emails are matched case-insensitively
        .step(signin_action("ADMIN@adminhub.local", ADMIN_PASSWORD).with_clear_cookies(true))
        .step(
            signin_action(ADMIN_EMAIL, "wrong password")
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_json(|body| {
                    assert_error_body(body);
                    assert!(body["error"].as_str().unwrap().contains("Authentication error"));
                }),
        )
        .step(
            signin_action("nobody@adminhub.local", "whatever")
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_json(assert_error_body),
        )
        .step(
            signin_action("not-an-email", "")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_json(|body| {
                    assert!(body["fields"]["email"].is_string());
                    assert!(body["fields"]["password"].is_string());
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_me_and_signout_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("me_anonymous", "GET", "/api/auth/me")
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_json(assert_error_body),
        )
        .step(signin_admin_action())
        .step(
            Action::new("me", "GET", "/api/auth/me").assert_json(|body| {
                assert_eq!(body["data"]["email"], json!(ADMIN_EMAIL));
                assert_eq!(body["data"]["roles"], json!(["admin"]));
            }),
        )
        .step(Action::new("signout", "POST", "/api/auth/signout"))
        .step(
            Action::new("me_after_signout", "GET", "/api/auth/me")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_bearer_token_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            signin_admin_action()
                .with_save_cookies(false)
                .with_save_as("session"),
        )
        .step(
            Action::new("me_bearer", "GET", "/api/auth/me")
                .with_clear_cookies(true)
                .with_bearer_from("session")
                .assert_json(|body| assert_eq!(body["data"]["email"], json!(ADMIN_EMAIL))),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_garbage_token_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    let resp = server
        .get("/api/admin/brands")
        .authorization_bearer("not.a.jwt")
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn route_deactivated_account_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_user_action("support@example.com", &["support"]).with_save_as("support"))
        .step(
            signin_test_user_action("support@example.com")
                .with_save_cookies(false)
                .with_save_as("support_session"),
        )
        .step(signin_admin_action())
        .step(
            Action::new("deactivate", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/users/{}/status", ctx.id_of("support")))
                .with_body(json!({ "status": "deactivated" }))
                .assert_json(|body| assert_eq!(body["data"]["status"], json!("deactivated"))),
        )
        // a session issued before deactivation stops working right away
        .step(
            Action::new("stale_session", "GET", "/api/auth/me")
                .with_clear_cookies(true)
                .with_bearer_from("support_session")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(
            signin_test_user_action("support@example.com")
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_json(|body| {
                    assert!(body["error"].as_str().unwrap().contains("deactivated"));
                }),
        )
        .run(&mut server, db)
        .await;
}
