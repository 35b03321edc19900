//! Customer notifications for booking status changes.

pub mod dispatcher;
pub mod notifier;

pub use dispatcher::{NotificationDispatcher, NotificationWorker};
pub use notifier::{LogNotifier, StatusChangeNotice, StatusNotifier};
