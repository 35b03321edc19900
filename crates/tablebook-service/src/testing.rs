//! Shared fixtures for the service unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::watch;

use tablebook_core::config::{BookingConfig, NotificationConfig, PricingConfig};
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{BookingId, RestaurantId, TableId, TimeWindow, UserId};
use tablebook_database::store::{BookingFilter, BookingScope, BookingStore, TableUsage};
use tablebook_database::{MemoryBookingStore, MemoryRestaurantDirectory};
use tablebook_entity::actor::ActorRole;
use tablebook_entity::booking::{
    Booking, BookingHistory, BookingStatus, CustomerInfo, FeeSnapshot, PaymentStatus,
};
use tablebook_entity::restaurant::{DiningTable, OperatingHours, Restaurant};

use crate::availability::{AvailabilityChecker, AvailabilityQuery};
use crate::booking::{BookingLifecycle, CreateBookingParams};
use crate::context::ActorContext;
use crate::notification::{NotificationDispatcher, NotificationWorker, StatusChangeNotice, StatusNotifier};
use crate::pricing::FeeCalculator;

pub fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

/// A booking on `table` for 2026-10-19, outside any restaurant.
pub fn booking_at(table_id: TableId, window: TimeWindow, status: BookingStatus) -> Booking {
    let now = Utc::now();
    Booking {
        id: BookingId::new(),
        reference: format!("RSV-{}", &BookingId::new().to_string()[..8].to_uppercase()),
        restaurant_id: RestaurantId::from_uuid(uuid::Uuid::nil()),
        customer_id: UserId::new(),
        table_id,
        booking_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        start_time: window.start,
        end_time: window.end,
        guest_count: 2,
        customer: CustomerInfo {
            customer_name: "Ada Lovelace".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: None,
        },
        pricing: FeeSnapshot {
            fee: Decimal::from(20),
            base_fee: Decimal::from(20),
            markup_applied: false,
            pricing_degraded: false,
        },
        payment_status: PaymentStatus::Unpaid,
        payment_reference: None,
        status,
        history: BookingHistory::new(),
        special_requests: None,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

pub fn notice() -> StatusChangeNotice {
    let window = TimeWindow::new(t("18:00"), t("20:00")).unwrap();
    let booking = booking_at(TableId::new(), window, BookingStatus::Confirmed);
    StatusChangeNotice::from_booking(&booking, BookingStatus::Pending)
}

pub fn customer() -> ActorContext {
    ActorContext::new(UserId::new(), ActorRole::Customer)
}

pub fn admin() -> ActorContext {
    ActorContext::new(UserId::new(), ActorRole::Admin)
}

/// Notifier that keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<StatusChangeNotice>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> Vec<StatusChangeNotice> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusNotifier for RecordingNotifier {
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::service_unavailable("mail relay down"));
        }
        self.delivered.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Booking store whose every call fails.
pub struct UnavailableStore;

#[async_trait]
impl BookingStore for UnavailableStore {
    async fn find_by_id(&self, _id: BookingId) -> AppResult<Option<Booking>> {
        Err(down())
    }

    async fn find_occupying(
        &self,
        _restaurant_id: RestaurantId,
        _date: NaiveDate,
        _table_ids: Option<&[TableId]>,
    ) -> AppResult<Vec<Booking>> {
        Err(down())
    }

    async fn insert_if_available(&self, _booking: &Booking) -> AppResult<Booking> {
        Err(down())
    }

    async fn update_versioned(
        &self,
        _booking: &Booking,
        _expected_version: i64,
    ) -> AppResult<Option<Booking>> {
        Err(down())
    }

    async fn delete_terminal(&self, _id: BookingId, _expected_version: i64) -> AppResult<bool> {
        Err(down())
    }

    async fn query(
        &self,
        _scope: BookingScope,
        _filter: &BookingFilter,
    ) -> AppResult<Vec<Booking>> {
        Err(down())
    }

    async fn table_usage(
        &self,
        _restaurant_id: RestaurantId,
        _statuses: &[BookingStatus],
    ) -> AppResult<Vec<TableUsage>> {
        Err(down())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(down())
    }
}

fn down() -> AppError {
    AppError::database("connection refused")
}

/// One restaurant with five tables, plus a second restaurant with its own
/// owner and table. `date` is a Monday.
pub struct Fixture {
    pub store: Arc<MemoryBookingStore>,
    pub directory: Arc<MemoryRestaurantDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub restaurant_id: RestaurantId,
    pub owner_id: UserId,
    pub tables: Vec<TableId>,
    pub other_owner_id: UserId,
    pub other_tables: Vec<TableId>,
    pub date: NaiveDate,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(OperatingHours::default(), None, RecordingNotifier::default())
    }

    pub fn with_hours(hours: OperatingHours) -> Self {
        Self::build(hours, None, RecordingNotifier::default())
    }

    pub fn with_base_rate(rate: Decimal) -> Self {
        Self::build(OperatingHours::default(), Some(rate), RecordingNotifier::default())
    }

    pub fn with_failing_notifier() -> Self {
        Self::build(OperatingHours::default(), None, RecordingNotifier::failing())
    }

    fn build(hours: OperatingHours, base_rate: Option<Decimal>, notifier: RecordingNotifier) -> Self {
        let directory = Arc::new(MemoryRestaurantDirectory::new());
        let now = Utc::now();

        let restaurant_id = RestaurantId::new();
        let owner_id = UserId::new();
        directory.insert_restaurant(Restaurant {
            id: restaurant_id,
            owner_id,
            name: "Chez Test".into(),
            base_rate,
            operating_hours: hours,
            created_at: now,
            updated_at: now,
        });
        let tables = (1..=5)
            .map(|n| add_table(&directory, restaurant_id, n))
            .collect();

        let other_restaurant_id = RestaurantId::new();
        let other_owner_id = UserId::new();
        directory.insert_restaurant(Restaurant {
            id: other_restaurant_id,
            owner_id: other_owner_id,
            name: "Other Place".into(),
            base_rate: None,
            operating_hours: OperatingHours::default(),
            created_at: now,
            updated_at: now,
        });
        let other_tables = vec![add_table(&directory, other_restaurant_id, 1)];

        Self {
            store: Arc::new(MemoryBookingStore::new()),
            directory,
            notifier: Arc::new(notifier),
            restaurant_id,
            owner_id,
            tables,
            other_owner_id,
            other_tables,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }
    }

    pub fn owner(&self) -> ActorContext {
        ActorContext::new(self.owner_id, ActorRole::RestaurantOwner)
    }

    pub fn other_owner(&self) -> ActorContext {
        ActorContext::new(self.other_owner_id, ActorRole::RestaurantOwner)
    }

    pub fn checker(&self) -> AvailabilityChecker {
        AvailabilityChecker::new(self.store.clone(), self.directory.clone())
    }

    pub fn fee_calculator(&self) -> FeeCalculator {
        FeeCalculator::new(
            self.store.clone(),
            self.directory.clone(),
            PricingConfig::default(),
        )
        .unwrap()
    }

    pub fn query(&self, start: &str, end: &str, tables: Option<Vec<TableId>>) -> AvailabilityQuery {
        AvailabilityQuery {
            restaurant_id: self.restaurant_id,
            date: self.date,
            window: TimeWindow::new(t(start), t(end)).unwrap(),
            table_ids: tables,
        }
    }

    /// Store a booking directly, bypassing the lifecycle.
    pub async fn seed(&self, table_id: TableId, start: &str, end: &str, status: BookingStatus) -> Booking {
        let window = TimeWindow::new(t(start), t(end)).unwrap();
        let mut booking = booking_at(table_id, window, status);
        booking.restaurant_id = self.restaurant_id;
        booking.booking_date = self.date;
        self.store.insert_if_available(&booking).await.unwrap()
    }

    pub fn params(&self, table_idx: usize, start: &str, end: &str, guests: u32) -> CreateBookingParams {
        CreateBookingParams {
            restaurant_id: self.restaurant_id,
            table_id: self.tables[table_idx],
            date: self.date,
            window: TimeWindow::new(t(start), t(end)).unwrap(),
            guest_count: guests,
            customer_name: "Ada Lovelace".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: Some("+44 20 7946 0000".into()),
            special_requests: None,
        }
    }

    /// A lifecycle wired to the fixture stores and its recording notifier.
    pub fn lifecycle(&self) -> (BookingLifecycle, NotificationWorker) {
        let (dispatcher, worker) =
            NotificationDispatcher::new(self.notifier.clone(), &NotificationConfig::default());
        let availability = Arc::new(self.checker());
        let pricing = Arc::new(self.fee_calculator());
        let lifecycle = BookingLifecycle::new(
            self.store.clone(),
            self.directory.clone(),
            availability,
            pricing,
            dispatcher,
            BookingConfig::default(),
        );
        (lifecycle, worker)
    }

    /// Drop the lifecycle and deliver everything it queued.
    pub async fn flush(&self, lifecycle: BookingLifecycle, worker: NotificationWorker) {
        drop(lifecycle);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        worker.run(shutdown_rx).await;
    }
}

fn add_table(directory: &MemoryRestaurantDirectory, restaurant_id: RestaurantId, n: u32) -> TableId {
    let id = TableId::new();
    directory.insert_table(DiningTable {
        id,
        restaurant_id,
        label: format!("T{n}"),
        capacity: 4,
        is_active: true,
    });
    id
}
