//! Integration tests for health, availability and fee quotes.

use axum::http::StatusCode;
use tablebook_core::types::TableId;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = TestApp::new();
    let path = format!(
        "/api/restaurants/{}/availability?date=2026-10-19&start=18:00&end=20:00",
        app.restaurant_id
    );

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app.request("GET", &path, None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_availability_reflects_committed_bookings() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    app.create_booking(&customer, 0, "18:00", "20:00").await;

    let overlapping = format!(
        "/api/restaurants/{}/availability?date=2026-10-19&start=19:00&end=21:00",
        app.restaurant_id
    );
    let response = app.request("GET", &overlapping, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let data = &response.body["data"];
    assert_eq!(data["occupied_tables"], serde_json::json!([app.tables[0]]));
    assert_eq!(data["tables"].as_array().unwrap().len(), 3);

    let touching = format!(
        "/api/restaurants/{}/availability?date=2026-10-19&start=20:00&end=22:00&tables={}",
        app.restaurant_id, app.tables[0]
    );
    let response = app.request("GET", &touching, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["occupied_tables"], serde_json::json!([]));
    assert_eq!(response.body["data"]["tables"][0]["available"], true);
}

#[tokio::test]
async fn test_availability_input_errors() {
    let app = TestApp::new();
    let (_, customer) = app.customer();

    let bad_date = format!(
        "/api/restaurants/{}/availability?date=19-10-2026&start=18:00&end=20:00",
        app.restaurant_id
    );
    let response = app.request("GET", &bad_date, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "date");

    let inverted = format!(
        "/api/restaurants/{}/availability?date=2026-10-19&start=20:00&end=18:00",
        app.restaurant_id
    );
    let response = app.request("GET", &inverted, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unknown_table = format!(
        "/api/restaurants/{}/availability?date=2026-10-19&start=18:00&end=20:00&tables={}",
        app.restaurant_id,
        TableId::new()
    );
    let response = app.request("GET", &unknown_table, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fee_quote() {
    let app = TestApp::new();
    let (_, customer) = app.customer();

    let path = format!(
        "/api/restaurants/{}/fee?table={}&guests=4",
        app.restaurant_id, app.tables[1]
    );
    let response = app.request("GET", &path, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["fee"], "40");
    assert_eq!(response.body["data"]["markup_applied"], false);

    // One booking makes the table the most popular one.
    app.create_booking(&customer, 1, "12:00", "13:00").await;
    let response = app.request("GET", &path, None, Some(&customer)).await;
    assert_eq!(response.body["data"]["fee"], "44");
    assert_eq!(response.body["data"]["markup_applied"], true);

    let zero = format!(
        "/api/restaurants/{}/fee?table={}&guests=0",
        app.restaurant_id, app.tables[1]
    );
    let response = app.request("GET", &zero, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "guest_count");
}
