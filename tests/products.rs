mod common;
use adminhub::auth::decrypt_payment_url;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    Action, Flow, assert_error_body, create_brand_action, create_user_action, setup_server,
    setup_test_db, signin_admin_action, signin_test_user_action,
};

const PAY_URL: &str = "https://pay.example.com/checkout/starter";

#[tokio::test]
async fn route_product_payment_url_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(
            Action::new("create_product", "POST", "/api/admin/products")
                .with_body(json!({
                    "name": "Starter Plan",
                    "price_cents": 900,
                    "payment_url": PAY_URL,
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("product")
                .assert_json(|body| {
                    assert_eq!(body["data"]["currency"], json!("USD"));
                    assert_eq!(body["data"]["payment_url"], json!(PAY_URL));
                    assert!(body["data"].get("payment_url_enc").is_none());
                }),
        )
        .step(
            Action::new("payment_link", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/admin/products/{}/payment-link", ctx.id_of("product"))
                })
                .with_save_as("link")
                .assert_json_ctx(|ctx, body| {
                    let product_id = body["data"]["product_id"].as_str();
                    assert_eq!(product_id, Some(ctx.id_of("product").as_str()));
                    let token = body["data"]["token"].as_str().unwrap();
                    assert!(!token.contains("pay.example.com"));
                }),
        )
        .step(
            Action::new("list_products", "GET", "/api/admin/products").assert_json(|body| {
                assert_eq!(body["data"]["total"], json!(1));
                assert_eq!(body["data"]["items"][0]["payment_url"], json!(PAY_URL));
            }),
        )
        .step(
            Action::new("remove_url", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/products/{}", ctx.id_of("product")))
                .with_body(json!({ "name": "Starter Plan", "price_cents": 1200, "currency": "EUR" }))
                .assert_json(|body| {
                    assert_eq!(body["data"]["price_cents"], json!(1200));
                    assert!(body["data"]["payment_url"].is_null());
                }),
        )
        .step(
            Action::new("payment_link_missing", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/admin/products/{}/payment-link", ctx.id_of("product"))
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_json(assert_error_body),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn stored_payment_url_is_encrypted() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    let signin = server
        .post("/api/auth/signin")
        .json(&json!({ "email": common::ADMIN_EMAIL, "password": common::ADMIN_PASSWORD }))
        .await;
    let token = signin.json::<serde_json::Value>()["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let created = server
        .post("/api/admin/products")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Pro Plan", "price_cents": 4900, "payment_url": PAY_URL }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id: Uuid = created.json::<serde_json::Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let stored: Option<String> =
        sqlx::query_scalar("SELECT payment_url_enc FROM products WHERE id = $1")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    let stored = stored.expect("payment url stored");

    assert_ne!(stored, PAY_URL);
    let key = adminhub::Config::get_or_init(true).await.app().encryption_key();
    assert_eq!(decrypt_payment_url(&stored, key).unwrap(), PAY_URL);
}

#[tokio::test]
async fn route_product_brand_reference_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_brand_action("House Brand").with_save_as("house"))
        .step(create_user_action("rosa@example.com", &["reseller"]))
        .step(signin_test_user_action("rosa@example.com"))
        .step(create_brand_action("Rosa Tea").with_save_as("rosa_brand"))
        .step(
            Action::new("own_brand", "POST", "/api/admin/products")
                .with_dyn_body(|ctx| {
                    json!({
                        "name": "Green Tea",
                        "price_cents": 450,
                        "brand_id": ctx.id_of("rosa_brand"),
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("tea"),
        )
        // a brand the reseller can't read can't be attached either
        .step(
            Action::new("foreign_brand", "POST", "/api/admin/products")
                .with_dyn_body(|ctx| {
                    json!({
                        "name": "Borrowed Goods",
                        "price_cents": 100,
                        "brand_id": ctx.id_of("house"),
                    })
                })
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("unknown_brand", "POST", "/api/admin/products")
                .with_body(json!({
                    "name": "Ghost Goods",
                    "price_cents": 100,
                    "brand_id": Uuid::new_v4(),
                }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_json(|body| {
                    assert!(body["error"].as_str().unwrap().contains("brand"));
                }),
        )
        .step(
            Action::new("invalid_product", "POST", "/api/admin/products")
                .with_body(json!({
                    "name": "Broken",
                    "price_cents": -5,
                    "currency": "dollars",
                    "payment_url": "javascript:alert(1)",
                }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_json(|body| {
                    for field in ["price_cents", "currency", "payment_url"] {
                        assert!(body["fields"][field].is_string(), "{field} not reported");
                    }
                }),
        )
        // deleting the brand keeps the product and clears the reference
        .step(
            Action::new("delete_brand", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/brands/{}", ctx.id_of("rosa_brand"))),
        )
        .step(
            Action::new("orphaned_product", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/products/{}", ctx.id_of("tea")))
                .assert_json(|body| assert!(body["data"]["brand_id"].is_null())),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_product_ownership_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_user_action("sam@example.com", &["reseller"]))
        .step(create_user_action("tia@example.com", &["reseller"]))
        .step(signin_test_user_action("sam@example.com"))
        .step(
            Action::new("sam_product", "POST", "/api/admin/products")
                .with_body(json!({ "name": "Sam Widget", "price_cents": 1000, "payment_url": PAY_URL }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("widget"),
        )
        .step(signin_test_user_action("tia@example.com"))
        .step(
            Action::new("tia_reads", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/products/{}", ctx.id_of("widget")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("tia_payment_link", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/admin/products/{}/payment-link", ctx.id_of("widget"))
                })
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("tia_deletes", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/products/{}", ctx.id_of("widget")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(signin_test_user_action("sam@example.com"))
        .step(
            Action::new("sam_deletes", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/admin/products/{}", ctx.id_of("widget"))),
        )
        .run(&mut server, db)
        .await;
}
