//! Post-commit notification events and their delivery.
//!
//! Delivery runs outside the booking transaction. Whatever happens here can only
//! change the `DeliveryStatus` reported alongside a result; it never turns a
//! committed booking into a failure.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dates::format_date;
use crate::domain::booking::BookingId;
use crate::reporting::DailyStats;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingConfirmed {
        booking_id: BookingId,
        guest_name: String,
        guest_email: String,
        room_number: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    DailyReport {
        stats: DailyStats,
        body: String,
    },
}

impl NotificationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BookingConfirmed { .. } => "booking_confirmed",
            Self::DailyReport { .. } => "daily_report",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Queued,
    Delivered,
    Degraded { reason: String },
}

impl DeliveryStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),
    #[error("notification endpoint rejected the event with status {status}")]
    Rejected { status: u16 },
    #[error("notification queue is full")]
    QueueFull,
    #[error("notification queue is closed")]
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Messages an event fans out to: guest confirmation plus manager alert for a
    /// booking, a single manager message for the daily report.
    pub fn for_event(
        event: &NotificationEvent,
        hotel_name: &str,
        manager_email: &str,
    ) -> Vec<EmailMessage> {
        match event {
            NotificationEvent::BookingConfirmed {
                guest_name,
                guest_email,
                room_number,
                check_in,
                check_out,
                ..
            } => vec![
                EmailMessage {
                    to: guest_email.clone(),
                    subject: format!("Booking Confirmation - Room {room_number}"),
                    body: format!(
                        "Dear {guest_name},\n\n\
                         We are delighted to confirm your stay at {hotel_name}.\n\n\
                         Details:\n\
                         - Room: {room_number}\n\
                         - Check-in: {check_in}\n\
                         - Check-out: {check_out}\n\n\
                         See you soon!\n\
                         {hotel_name} Concierge",
                        check_in = format_date(*check_in),
                        check_out = format_date(*check_out),
                    ),
                },
                EmailMessage {
                    to: manager_email.to_string(),
                    subject: format!("New Booking: Room {room_number}"),
                    body: format!(
                        "Guest {guest_name} has just booked Room {room_number} starting {}.",
                        format_date(*check_in)
                    ),
                },
            ],
            NotificationEvent::DailyReport { stats, body } => vec![EmailMessage {
                to: manager_email.to_string(),
                subject: format!("Daily Report - {}", format_date(stats.as_of)),
                body: body.clone(),
            }],
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError>;
}

/// Where the operation layer hands events after a commit.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: NotificationEvent) -> DeliveryStatus;
}

/// Bounded queue in front of a notifier, drained by a background task.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NotificationEvent>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    /// Must be called inside a tokio runtime. The consumer task ends once every
    /// dispatcher clone is dropped and the queue is drained.
    pub fn spawn(notifier: Arc<dyn Notifier>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(consume(Arc::clone(&notifier), receiver));
        (Self { sender, notifier }, handle)
    }

    /// Enqueues without waiting. A full or closed queue degrades instead of blocking.
    pub fn emit(&self, event: NotificationEvent) -> DeliveryStatus {
        let event_kind = event.name();
        match self.sender.try_send(event) {
            Ok(()) => DeliveryStatus::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                degraded(event_kind, self.notifier.name(), NotifyError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                degraded(event_kind, self.notifier.name(), NotifyError::Closed)
            }
        }
    }

    /// Delivers on the caller's task, bypassing the queue.
    pub async fn deliver_now(&self, event: &NotificationEvent) -> DeliveryStatus {
        deliver_inline(self.notifier.as_ref(), event).await
    }
}

#[async_trait]
impl NotificationSink for NotificationDispatcher {
    async fn publish(&self, event: NotificationEvent) -> DeliveryStatus {
        self.emit(event)
    }
}

/// Sink that awaits the notifier directly. Used by one-shot commands and tests.
pub struct ImmediateSink {
    notifier: Arc<dyn Notifier>,
}

impl ImmediateSink {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl NotificationSink for ImmediateSink {
    async fn publish(&self, event: NotificationEvent) -> DeliveryStatus {
        deliver_inline(self.notifier.as_ref(), &event).await
    }
}

/// Drops every event. For read-only tooling that never publishes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

#[async_trait]
impl NotificationSink for SilentSink {
    async fn publish(&self, event: NotificationEvent) -> DeliveryStatus {
        let reason = format!("{} dropped: notifications disabled", event.name());
        DeliveryStatus::Degraded { reason }
    }
}

async fn deliver_inline(notifier: &dyn Notifier, event: &NotificationEvent) -> DeliveryStatus {
    match notifier.deliver(event).await {
        Ok(()) => DeliveryStatus::Delivered,
        Err(error) => degraded(event.name(), notifier.name(), error),
    }
}

async fn consume(notifier: Arc<dyn Notifier>, mut receiver: mpsc::Receiver<NotificationEvent>) {
    while let Some(event) = receiver.recv().await {
        match notifier.deliver(&event).await {
            Ok(()) => info!(
                event_name = "notification.delivered",
                notification = event.name(),
                notifier = notifier.name(),
                "notification delivered"
            ),
            Err(error) => warn!(
                event_name = "notification.delivery_failed",
                notification = event.name(),
                notifier = notifier.name(),
                error = %error,
                "notification delivery failed"
            ),
        }
    }
}

fn degraded(event_kind: &'static str, notifier: &'static str, error: NotifyError) -> DeliveryStatus {
    warn!(
        event_name = "notification.delivery_failed",
        notification = event_kind,
        notifier,
        error = %error,
        "notification delivery degraded"
    );
    DeliveryStatus::Degraded { reason: error.to_string() }
}

/// Keeps every event in memory. Optionally fails each delivery after recording it.
#[derive(Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<NotificationEvent>>,
    failure: Option<String>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self { events: Mutex::new(Vec::new()), failure: Some(reason.into()) }
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        match &self.failure {
            Some(reason) => Err(NotifyError::Transport(reason.clone())),
            None => Ok(()),
        }
    }
}
