//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use costevida_core::db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        api_keys: vec![],
    };
    create_router(db, None, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Create a subscription through the API, returning its id
async fn create_sub(app: &Router, body: serde_json::Value) -> i64 {
    let response = post_json(app, "/api/subscriptions", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    get_body_json(response).await["id"].as_i64().unwrap()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = get(&app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

// ========== Subscription CRUD ==========

#[tokio::test]
async fn test_create_and_get_subscription() {
    let app = setup_test_app();

    let id = create_sub(
        &app,
        serde_json::json!({
            "tool_name": "Notion",
            "amount": 8.0,
            "category": "Productividad",
            "tags": ["trabajo"]
        }),
    )
    .await;

    let response = get(&app, &format!("/api/subscriptions/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["tool_name"], "Notion");
    // Defaults applied by the payload schema
    assert_eq!(json["status"], "active");
    assert_eq!(json["billing"], "monthly");
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["tags"], serde_json::json!(["trabajo"]));
}

#[tokio::test]
async fn test_create_rejects_invalid_payload() {
    let app = setup_test_app();

    // Negative amount
    let response = post_json(
        &app,
        "/api/subscriptions",
        serde_json::json!({ "tool_name": "X", "amount": -5.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Whitespace-only name
    let response = post_json(
        &app,
        "/api/subscriptions",
        serde_json::json!({ "tool_name": "   ", "amount": 5.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown billing value is rejected at deserialization
    let response = post_json(
        &app,
        "/api/subscriptions",
        serde_json::json!({ "tool_name": "X", "amount": 5.0, "billing": "biennial" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_subscriptions_with_filters() {
    let app = setup_test_app();

    create_sub(
        &app,
        serde_json::json!({
            "tool_name": "Notion", "amount": 8.0, "category": "Productividad"
        }),
    )
    .await;
    create_sub(
        &app,
        serde_json::json!({
            "tool_name": "Netflix", "amount": 120.0, "billing": "yearly", "status": "paused"
        }),
    )
    .await;

    // No filter: every status
    let json = get_body_json(get(&app, "/api/subscriptions").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let json = get_body_json(get(&app, "/api/subscriptions?status=paused").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["tool_name"], "Netflix");

    let json = get_body_json(get(&app, "/api/subscriptions?q=Not").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["tool_name"], "Notion");

    let json = get_body_json(get(&app, "/api/subscriptions?billing=yearly").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    // Unknown status filter value
    let response = get(&app, "/api/subscriptions?status=zombie").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_subscription() {
    let app = setup_test_app();

    let id = create_sub(
        &app,
        serde_json::json!({ "tool_name": "Figma", "amount": 12.0, "category": "Diseño" }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/subscriptions/{}", id))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "tool_name": "Figma",
                        "amount": 15.0,
                        "status": "canceled"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 15.0);
    assert_eq!(json["status"], "canceled");
    assert!(!json["canceled_at"].is_null());
    // PUT is a full replace: omitted category is cleared
    assert!(json["category"].is_null());
}

#[tokio::test]
async fn test_update_missing_subscription_is_404() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/subscriptions/9999")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "tool_name": "X", "amount": 1.0 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_subscription() {
    let app = setup_test_app();

    let id = create_sub(&app, serde_json::json!({ "tool_name": "Vercel", "amount": 20.0 })).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/subscriptions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["success"], true);

    let response = get(&app, &format!("/api/subscriptions/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/subscriptions/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Dashboard ==========

#[tokio::test]
async fn test_dashboard_aggregates() {
    let app = setup_test_app();

    create_sub(
        &app,
        serde_json::json!({
            "tool_name": "Notion", "amount": 12.0, "category": "Productividad"
        }),
    )
    .await;
    create_sub(
        &app,
        serde_json::json!({
            "tool_name": "Netflix", "amount": 120.0, "billing": "yearly",
            "category": "Entretenimiento"
        }),
    )
    .await;
    create_sub(
        &app,
        serde_json::json!({
            "tool_name": "ChatGPT", "amount": 5.0, "billing": "weekly",
            "status": "paused", "category": "IA"
        }),
    )
    .await;

    // status=all fetches the paused row too
    let response = get(&app, "/api/dashboard?status=all").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    // KPIs only count the two active rows: 12 + 120/12 = 22
    assert!((json["kpis"]["monthly_total"].as_f64().unwrap() - 22.0).abs() < 1e-9);
    assert!((json["kpis"]["yearly_total"].as_f64().unwrap() - 264.0).abs() < 1e-9);
    assert_eq!(json["kpis"]["active_count"], 2);

    // The paused IA row still appears in the category chart
    let categories = json["category_breakdown"].as_array().unwrap();
    let ia = categories
        .iter()
        .find(|e| e["label"] == "IA")
        .expect("paused subscription should appear in breakdown");
    assert!((ia["value"].as_f64().unwrap() - 21.7262).abs() < 1e-9);

    // Vendor fallback to tool_name, sorted descending
    let vendors = json["vendor_breakdown"].as_array().unwrap();
    assert_eq!(vendors[0]["label"], "ChatGPT");

    // Default dashboard only fetches active rows
    let json = get_body_json(get(&app, "/api/dashboard").await).await;
    assert_eq!(json["kpis"]["active_count"], 2);
    let categories = json["category_breakdown"].as_array().unwrap();
    assert!(categories.iter().all(|e| e["label"] != "IA"));
}

#[tokio::test]
async fn test_dashboard_empty() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/dashboard").await).await;
    assert_eq!(json["kpis"]["monthly_total"], 0.0);
    assert_eq!(json["kpis"]["yearly_total"], 0.0);
    assert_eq!(json["kpis"]["active_count"], 0);
    assert!(json["category_breakdown"].as_array().unwrap().is_empty());
    assert!(json["vendor_breakdown"].as_array().unwrap().is_empty());
}

// ========== Payments ==========

#[tokio::test]
async fn test_payments() {
    let app = setup_test_app();

    let id = create_sub(&app, serde_json::json!({ "tool_name": "Spotify", "amount": 10.99 })).await;

    let response = post_json(
        &app,
        &format!("/api/subscriptions/{}/payments", id),
        serde_json::json!({ "amount": 10.99, "paid_at": "2024-05-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["subscription_id"], id);
    assert_eq!(json["paid_at"], "2024-05-01");

    let json = get_body_json(get(&app, &format!("/api/subscriptions/{}/payments", id)).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    // Unknown subscription
    let response = post_json(
        &app,
        "/api/subscriptions/9999/payments",
        serde_json::json!({ "amount": 1.0, "paid_at": "2024-05-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/subscriptions/9999/payments").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Profile ==========

#[tokio::test]
async fn test_profile_roundtrip() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/profile").await).await;
    assert_eq!(json["preferred_currency"], "USD");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "full_name": "Ada",
                        "preferred_currency": "EUR",
                        "timezone": "Europe/Madrid"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(get(&app, "/api/profile").await).await;
    assert_eq!(json["full_name"], "Ada");
    assert_eq!(json["preferred_currency"], "EUR");

    // Omitting preferred_currency is rejected, not defaulted back to USD
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "full_name": "Ada B." }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = get_body_json(get(&app, "/api/profile").await).await;
    assert_eq!(json["preferred_currency"], "EUR");
}

// ========== Audit ==========

#[tokio::test]
async fn test_audit_log_records_access() {
    let app = setup_test_app();

    create_sub(&app, serde_json::json!({ "tool_name": "Notion", "amount": 8.0 })).await;
    get(&app, "/api/subscriptions").await;

    let json = get_body_json(get(&app, "/api/audit").await).await;
    let entries = json.as_array().unwrap();
    assert!(entries.len() >= 2);
    // Newest first
    assert_eq!(entries[0]["action"], "list");
}

#[tokio::test]
async fn test_audit_log_covers_reads() {
    let app = setup_test_app();

    let id = create_sub(&app, serde_json::json!({ "tool_name": "Notion", "amount": 8.0 })).await;
    let before = get_body_json(get(&app, "/api/audit").await)
        .await
        .as_array()
        .unwrap()
        .len();

    get(&app, &format!("/api/subscriptions/{}", id)).await;
    get(&app, &format!("/api/subscriptions/{}/payments", id)).await;
    get(&app, "/api/profile").await;

    let json = get_body_json(get(&app, "/api/audit").await).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), before + 3);
    // Newest first: profile get, payments list, subscription get
    assert_eq!(entries[0]["action"], "get");
    assert_eq!(entries[0]["entity_type"], "profile");
    assert_eq!(entries[1]["action"], "list");
    assert_eq!(entries[1]["entity_type"], "payment");
    assert_eq!(entries[2]["action"], "get");
    assert_eq!(entries[2]["entity_type"], "subscription");
    assert_eq!(entries[2]["entity_id"], id);
}

// ========== Auth ==========

#[tokio::test]
async fn test_auth_required() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
        api_keys: vec!["secret-key".to_string()],
    };
    let app = create_router(db, None, config);

    // No credentials
    let response = get(&app, "/api/subscriptions").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong key
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/subscriptions")
                .header("authorization", "Bearer wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid key
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/subscriptions")
                .header("authorization", "Bearer secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_validate_api_key() {
    let keys = vec!["alpha".to_string(), "beta".to_string()];
    assert!(validate_api_key("alpha", &keys));
    assert!(validate_api_key("beta", &keys));
    assert!(!validate_api_key("gamma", &keys));
    assert!(!validate_api_key("alph", &keys));
    assert!(!validate_api_key("", &keys));
    assert!(!validate_api_key("alpha", &[]));
}
