mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, assert_error_body, create_brand_action, create_user_action, setup_server,
    setup_test_db, signin_admin_action, signin_test_user_action,
};

const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

#[tokio::test]
async fn route_brand_ownership_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_user_action("alice@example.com", &["reseller"]).with_save_as("alice"))
        .step(create_user_action("bob@example.com", &["reseller"]).with_save_as("bob"))
        .step(signin_test_user_action("alice@example.com"))
        // reseller-created brands are always owned by the creator
        .step(
            create_brand_action("Alice Outdoor")
                .with_dyn_body(|ctx| {
                    json!({
                        "name": "Alice Outdoor",
                        "owner_user_id": ctx.id_of("bob"),
                    })
                })
                .with_save_as("alice_brand"),
        )
        .step(
            Action::new("check_owner", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand")))
                .assert_json_ctx(|ctx, body| {
                    let owner = body["data"]["owner_user_id"].as_str();
                    assert_eq!(owner, Some(ctx.id_of("alice").as_str()));
                }),
        )
        .step(signin_test_user_action("bob@example.com"))
        // bob may not read, edit or delete alice's brand
        .step(
            Action::new("bob_reads", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand")))
                .with_expect(StatusCode::FORBIDDEN)
                .assert_json(assert_error_body),
        )
        .step(
            Action::new("bob_updates", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand")))
                .with_body(json!({ "name": "Hijacked" }))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("bob_deletes", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("bob_lists", "GET", "/api/admin/brands")
                .assert_json(|body| assert_eq!(body["data"]["total"], json!(0))),
        )
        // a missing record is 404 even for someone who couldn't own it
        .step(
            Action::new("bob_reads_missing", "GET", &format!("/api/admin/brands/{MISSING_ID}"))
                .with_expect(StatusCode::NOT_FOUND),
        )
        // the admin sees and edits everything
        .step(signin_admin_action())
        .step(
            Action::new("admin_lists", "GET", "/api/admin/brands")
                .assert_json(|body| assert_eq!(body["data"]["total"], json!(1))),
        )
        .step(
            Action::new("admin_updates", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand")))
                .with_body(json!({ "name": "Alice Outdoor Co", "website": "https://alice.example" }))
                .assert_json(|body| {
                    assert_eq!(body["data"]["name"], json!("Alice Outdoor Co"));
                    assert_eq!(body["data"]["website"], json!("https://alice.example"));
                }),
        )
        .step(
            Action::new("admin_deletes", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand"))),
        )
        .step(
            Action::new("admin_reads_deleted", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("alice_brand")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_brand_owner_is_creator_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_user_action("carol@example.com", &["reseller"]).with_save_as("carol"))
        .step(signin_test_user_action("carol@example.com"))
        .step(create_brand_action("Carol Cosmetics").with_save_as("brand"))
        .step(
            Action::new("owner_check", "GET", "/api/admin/brands").assert_json(|body| {
                assert_eq!(body["data"]["total"], json!(1));
                assert_eq!(body["data"]["items"][0]["name"], json!("Carol Cosmetics"));
            }),
        )
        // handing the brand to someone else is ignored for non-admins
        .step(
            Action::new("transfer_attempt", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("brand")))
                .with_body(json!({
                    "name": "Carol Cosmetics",
                    "owner_user_id": "00000000-0000-4000-8000-000000000001",
                }))
                .assert_json_ctx(|ctx, body| {
                    let owner = body["data"]["owner_user_id"].as_str();
                    assert_eq!(owner, Some(ctx.id_of("carol").as_str()));
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_brand_capability_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        // brands the admin creates without an owner are admin-only
        .step(create_brand_action("House Brand").with_save_as("house"))
        // assigning a user that doesn't exist is the caller's mistake
        .step(
            Action::new("admin_ghost_owner", "POST", "/api/admin/brands")
                .with_body(json!({ "name": "Ghost Brand", "owner_user_id": MISSING_ID }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_json(|body| {
                    assert_error_body(body);
                    assert!(body["error"].as_str().unwrap().contains("referenced user"));
                }),
        )
        .step(create_user_action("vera@example.com", &["viewer"]))
        .step(create_user_action("rex@example.com", &["reseller"]))
        .step(signin_test_user_action("vera@example.com"))
        .step(
            create_brand_action("Viewer Brand")
                .with_expect(StatusCode::FORBIDDEN)
                .assert_json(assert_error_body),
        )
        .step(signin_test_user_action("rex@example.com"))
        .step(
            Action::new("reseller_reads_unowned", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("house")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("invalid_brand", "POST", "/api/admin/brands")
                .with_body(json!({ "name": "X", "website": "ftp://nope.example" }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_json(|body| {
                    assert!(body["fields"]["name"].is_string());
                    assert!(body["fields"]["website"].is_string());
                }),
        )
        .step(
            Action::new("anonymous_list", "GET", "/api/admin/brands")
                .with_clear_cookies(true)
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .run(&mut server, db)
        .await;
}
