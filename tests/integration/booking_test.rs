//! Integration tests for the booking lifecycle endpoints.

use axum::http::StatusCode;
use serde_json::json;
use tablebook_core::types::UserId;
use tablebook_entity::actor::ActorRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_then_conflict() {
    let app = TestApp::new();
    let (customer_id, customer) = app.customer();
    let path = format!("/api/restaurants/{}/bookings", app.restaurant_id);

    let response = app
        .request("POST", &path, Some(app.booking_body(0, "18:00", "20:00", 4)), Some(&customer))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["status"], "pending");
    assert_eq!(data["payment_status"], "unpaid");
    assert_eq!(data["customer_id"], json!(customer_id));
    assert!(data["reference"].as_str().unwrap().starts_with("RSV-"));
    assert!(data.get("version").is_none());

    let (_, other) = app.customer();
    let response = app
        .request("POST", &path, Some(app.booking_body(0, "19:30", "21:00", 2)), Some(&other))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
    assert_eq!(response.body["details"]["conflicts"][0]["start_time"], "18:00");
    assert_eq!(response.body["details"]["conflicts"][0]["end_time"], "20:00");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    let path = format!("/api/restaurants/{}/bookings", app.restaurant_id);

    let response = app
        .request("POST", &path, Some(app.booking_body(0, "09:00", "10:00", 2)), Some(&customer))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "start_time");

    let mut body = app.booking_body(0, "18:00", "20:00", 2);
    body["customer_email"] = json!("nobody");
    let response = app.request("POST", &path, Some(body), Some(&customer)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "customer_email");

    let response = app
        .request("POST", &path, Some(json!({ "table_id": "x" })), Some(&customer))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_status_transitions_over_http() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    let owner = app.owner_token();
    let id = app.create_booking(&customer, 0, "18:00", "20:00").await;
    let status_path = format!("/api/bookings/{id}/status");

    let response = app
        .request("PATCH", &status_path, Some(json!({ "status": "confirmed" })), Some(&customer))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("PATCH", &status_path, Some(json!({ "status": "confirmed" })), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["status"], "confirmed");
    assert_eq!(response.body["data"]["history"].as_array().unwrap().len(), 2);

    // Same status again is a no-op.
    let response = app
        .request("PATCH", &status_path, Some(json!({ "status": "confirmed" })), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["history"].as_array().unwrap().len(), 2);

    let response = app
        .request("PATCH", &status_path, Some(json!({ "status": "pending" })), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "INVALID_TRANSITION");

    let response = app
        .request("PATCH", &status_path, Some(json!({ "status": "seated" })), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "status");
}

#[tokio::test]
async fn test_delete_requires_terminal_status() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    let id = app.create_booking(&customer, 0, "18:00", "20:00").await;
    let path = format!("/api/bookings/{id}");

    let response = app.request("DELETE", &path, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(
        response.body["message"],
        "only cancelled or completed bookings can be deleted"
    );

    let response = app
        .request(
            "PATCH",
            &format!("{path}/status"),
            Some(json!({ "status": "cancelled" })),
            Some(&customer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("DELETE", &path, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &path, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookings_are_private() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    let (_, stranger) = app.customer();
    let id = app.create_booking(&customer, 0, "18:00", "20:00").await;
    let path = format!("/api/bookings/{id}");

    let response = app.request("GET", &path, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &path, None, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let other_owner = app.token_for(UserId::new(), ActorRole::RestaurantOwner);
    let response = app.request("GET", &path, None, Some(&other_owner)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let admin = app.token_for(UserId::new(), ActorRole::Admin);
    let response = app.request("GET", &path, None, Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_listings_with_filters_and_stats() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    let (_, other_customer) = app.customer();
    let owner = app.owner_token();

    app.create_booking(&customer, 0, "19:00", "21:00").await;
    let early = app.create_booking(&other_customer, 1, "12:00", "13:00").await;
    app.request(
        "PATCH",
        &format!("/api/bookings/{early}/status"),
        Some(json!({ "status": "cancelled" })),
        Some(&other_customer),
    )
    .await;

    let path = format!("/api/restaurants/{}/bookings", app.restaurant_id);
    let response = app.request("GET", &path, None, Some(&owner)).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["bookings"][0]["id"], early.as_str());
    assert_eq!(data["stats"]["total"], 2);
    assert_eq!(data["stats"]["pending"], 1);
    assert_eq!(data["stats"]["cancelled"], 1);
    assert_eq!(data["stats"]["total_guests"], 4);

    let response = app
        .request("GET", &format!("{path}?status=pending"), None, Some(&owner))
        .await;
    assert_eq!(response.body["data"]["stats"]["total"], 1);

    let response = app
        .request("GET", &format!("{path}?from=2026-10-20"), None, Some(&owner))
        .await;
    assert_eq!(response.body["data"]["stats"]["total"], 0);

    let response = app.request("GET", &path, None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("GET", "/api/bookings", None, Some(&customer)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["stats"]["total"], 1);
}

#[tokio::test]
async fn test_record_payment() {
    let app = TestApp::new();
    let (_, customer) = app.customer();
    let id = app.create_booking(&customer, 0, "18:00", "20:00").await;
    let path = format!("/api/bookings/{id}/payment");
    let body = json!({ "payment_status": "paid", "provider_reference": "pi_3Nx" });

    let response = app
        .request("PUT", &path, Some(body.clone()), Some(&customer))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let system = app.token_for(UserId::new(), ActorRole::System);
    let response = app.request("PUT", &path, Some(body), Some(&system)).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["payment_status"], "paid");
    assert_eq!(response.body["data"]["payment_reference"], "pi_3Nx");
    assert_eq!(response.body["data"]["status"], "pending");

    let response = app
        .request("PUT", &path, Some(json!({ "payment_status": "refunded" })), Some(&system))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "payment_status");
}
