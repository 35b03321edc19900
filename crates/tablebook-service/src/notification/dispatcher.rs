//! Background notification dispatch.
//!
//! [`NotificationDispatcher::dispatch`] never waits: notices go onto a
//! bounded queue and a [`NotificationWorker`] delivers them. A full or
//! closed queue drops the notice with a warning. Delivery failures are
//! logged and swallowed.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tablebook_core::config::NotificationConfig;

use super::notifier::{StatusChangeNotice, StatusNotifier};

/// Sending half handed to the booking services.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: Option<mpsc::Sender<StatusChangeNotice>>,
}

/// Receiving half that runs as a background task.
pub struct NotificationWorker {
    receiver: mpsc::Receiver<StatusChangeNotice>,
    notifier: Arc<dyn StatusNotifier>,
}

impl std::fmt::Debug for NotificationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationWorker").finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher and its worker. When notifications are disabled
    /// the worker exits immediately and every dispatch is a no-op.
    pub fn new(
        notifier: Arc<dyn StatusNotifier>,
        config: &NotificationConfig,
    ) -> (Self, NotificationWorker) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let dispatcher = Self {
            sender: config.enabled.then_some(sender),
        };
        (dispatcher, NotificationWorker { receiver, notifier })
    }

    /// A dispatcher that drops everything.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Queue a notice without waiting for delivery.
    pub fn dispatch(&self, notice: StatusChangeNotice) {
        let Some(sender) = &self.sender else {
            return;
        };

        match sender.try_send(notice) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(notice)) => {
                warn!(
                    booking_id = %notice.booking_id,
                    new_status = %notice.new_status,
                    "Notification queue full, dropping notice"
                );
            }
            Err(mpsc::error::TrySendError::Closed(notice)) => {
                warn!(
                    booking_id = %notice.booking_id,
                    new_status = %notice.new_status,
                    "Notification worker stopped, dropping notice"
                );
            }
        }
    }
}

impl NotificationWorker {
    /// Spawn the worker on the current runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Deliver notices until every dispatcher is dropped or shutdown is
    /// signalled, then drain what is already queued.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Notification worker started");

        loop {
            tokio::select! {
                notice = self.receiver.recv() => match notice {
                    Some(notice) => self.deliver(&notice).await,
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.receiver.close();
                        while let Some(notice) = self.receiver.recv().await {
                            self.deliver(&notice).await;
                        }
                        break;
                    }
                }
            }
        }

        info!("Notification worker stopped");
    }

    async fn deliver(&self, notice: &StatusChangeNotice) {
        match self.notifier.notify_status_change(notice).await {
            Ok(()) => debug!(booking_id = %notice.booking_id, "Notification delivered"),
            Err(e) => warn!(
                booking_id = %notice.booking_id,
                error = %e,
                "Notification delivery failed"
            ),
        }
    }
}
