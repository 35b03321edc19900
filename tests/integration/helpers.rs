//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, NaiveTime, Utc, Weekday};
use serde_json::{Value, json};
use tower::ServiceExt;

use tablebook_api::{AppState, build_router};
use tablebook_auth::JwtEncoder;
use tablebook_core::config::AppConfig;
use tablebook_core::types::{RestaurantId, TableId, UserId};
use tablebook_database::{MemoryBookingStore, MemoryRestaurantDirectory};
use tablebook_entity::actor::ActorRole;
use tablebook_entity::restaurant::{DayHours, DiningTable, OperatingHours, Restaurant};
use tablebook_service::NotificationDispatcher;

/// Test application over in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Booking store behind the router
    pub store: Arc<MemoryBookingStore>,
    /// Token minting for any actor
    pub encoder: JwtEncoder,
    /// Seeded restaurant, open Monday 11:00-23:00
    pub restaurant_id: RestaurantId,
    /// Owner of the seeded restaurant
    pub owner_id: UserId,
    /// Three tables on the seeded restaurant's floor plan
    pub tables: Vec<TableId>,
    /// A Monday
    pub date: NaiveDate,
}

/// Status and parsed JSON body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config: AppConfig = serde_json::from_value(json!({
            "database": { "url": "postgres://localhost/unused" },
            "auth": { "jwt_secret": "integration-test-secret" },
        }))
        .expect("Failed to build test config");

        let store = Arc::new(MemoryBookingStore::new());
        let directory = Arc::new(MemoryRestaurantDirectory::new());

        let restaurant_id = RestaurantId::new();
        let owner_id = UserId::new();
        let now = Utc::now();
        directory.insert_restaurant(Restaurant {
            id: restaurant_id,
            owner_id,
            name: "Chez Integration".into(),
            base_rate: None,
            operating_hours: OperatingHours(vec![DayHours {
                weekday: Weekday::Mon,
                open: t("11:00"),
                close: t("23:00"),
            }]),
            created_at: now,
            updated_at: now,
        });

        let tables: Vec<TableId> = (1..=3)
            .map(|n| {
                let id = TableId::new();
                directory.insert_table(DiningTable {
                    id,
                    restaurant_id,
                    label: format!("T{n}"),
                    capacity: 4,
                    is_active: true,
                });
                id
            })
            .collect();

        let encoder = JwtEncoder::new(&config.auth);
        let state = AppState::new(
            config,
            store.clone(),
            directory,
            NotificationDispatcher::disabled(),
        )
        .expect("Failed to wire services");

        Self {
            router: build_router(state),
            store,
            encoder,
            restaurant_id,
            owner_id,
            tables,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }
    }

    /// Mint a token for `actor_id` with `role`.
    pub fn token_for(&self, actor_id: UserId, role: ActorRole) -> String {
        self.encoder
            .generate_access_token(actor_id, role)
            .expect("Failed to mint token")
            .0
    }

    /// Token of the seeded restaurant's owner.
    pub fn owner_token(&self) -> String {
        self.token_for(self.owner_id, ActorRole::RestaurantOwner)
    }

    /// A fresh customer and their token.
    pub fn customer(&self) -> (UserId, String) {
        let id = UserId::new();
        (id, self.token_for(id, ActorRole::Customer))
    }

    /// Booking body for table `table_idx` on the fixture date.
    pub fn booking_body(&self, table_idx: usize, start: &str, end: &str, guests: u32) -> Value {
        json!({
            "table_id": self.tables[table_idx],
            "date": self.date.to_string(),
            "start_time": start,
            "end_time": end,
            "guest_count": guests,
            "customer_name": "Ada Lovelace",
            "customer_email": "ada@example.com",
        })
    }

    /// Create a booking as `token` and return its id.
    pub async fn create_booking(&self, token: &str, table_idx: usize, start: &str, end: &str) -> String {
        let path = format!("/api/restaurants/{}/bookings", self.restaurant_id);
        let response = self
            .request("POST", &path, Some(self.booking_body(table_idx, start, end, 2)), Some(token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
