//! The operation boundary every interface (HTTP, agent tools, CLI) goes through.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use hotelier_core::booking::BookingRequest;
use hotelier_core::clock::Clock;
use hotelier_core::dates::DateRange;
use hotelier_core::domain::booking::{Booking, BookingId, StayRecord};
use hotelier_core::domain::guest::{normalize_email, Guest};
use hotelier_core::domain::room::Room;
use hotelier_core::errors::{ApplicationError, BookingError};
use hotelier_core::notify::{DeliveryStatus, NotificationEvent, NotificationSink};
use hotelier_core::receipt::Receipt;
use hotelier_core::reporting::{self, DailyStats, OccupancyRow, ScheduleRow};

use crate::repositories::HotelRepository;

#[derive(Clone, Debug, Serialize)]
pub struct AvailabilityReport {
    pub range: DateRange,
    pub rooms: Vec<Room>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub room: Room,
    pub guest: Guest,
    pub delivery: DeliveryStatus,
}

impl BookingConfirmation {
    pub fn message(&self) -> String {
        format!("Success! Room {} booked for {}.", self.room.room_number, self.guest.name)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GuestHistory {
    pub guest: Guest,
    pub stays: Vec<StayRecord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DailyReport {
    pub stats: DailyStats,
    pub body: String,
    pub delivery: DeliveryStatus,
}

pub struct FrontDesk {
    repository: Arc<dyn HotelRepository>,
    clock: Arc<dyn Clock>,
    notifications: Arc<dyn NotificationSink>,
    currency: String,
}

impl FrontDesk {
    pub fn new(
        repository: Arc<dyn HotelRepository>,
        clock: Arc<dyn Clock>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { repository, clock, notifications, currency: "Rs.".to_string() }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn check_availability(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<AvailabilityReport, ApplicationError> {
        let range = DateRange::parse(start_date, end_date)?;
        let rooms = self.repository.find_available_rooms(&range).await?;

        info!(
            event_name = "availability.checked",
            start_date = %range.start,
            end_date = %range.end,
            available = rooms.len(),
            "availability checked"
        );
        Ok(AvailabilityReport { range, rooms })
    }

    pub async fn book_room(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApplicationError> {
        let outcome = self.reserve(request).await;
        let record = match outcome {
            Ok(record) => record,
            Err(error) => {
                log_booking_failure(request, &error);
                return Err(error);
            }
        };

        info!(
            event_name = "booking.confirmed",
            booking_id = record.booking.id.0,
            room_number = %record.room.room_number,
            check_in = %record.booking.stay.check_in(),
            check_out = %record.booking.stay.check_out(),
            "booking confirmed"
        );

        let event = NotificationEvent::BookingConfirmed {
            booking_id: record.booking.id,
            guest_name: record.guest.name.clone(),
            guest_email: record.guest.email.clone(),
            room_number: record.room.room_number.clone(),
            check_in: record.booking.stay.check_in(),
            check_out: record.booking.stay.check_out(),
        };
        let delivery = self.notifications.publish(event).await;

        Ok(BookingConfirmation {
            booking: record.booking,
            room: record.room,
            guest: record.guest,
            delivery,
        })
    }

    async fn reserve(&self, request: &BookingRequest) -> Result<StayRecord, ApplicationError> {
        let stay = request.validate(self.clock.today())?;
        Ok(self.repository.reserve(&stay).await?)
    }

    pub async fn guest_history(&self, email: &str) -> Result<GuestHistory, ApplicationError> {
        let email = normalize_email(email);
        let guest = self
            .repository
            .find_guest_by_email(&email)
            .await?
            .ok_or(BookingError::GuestNotFound { email })?;
        let stays = self.repository.list_bookings_for_guest(guest.id).await?;

        Ok(GuestHistory { guest, stays })
    }

    pub async fn stats(&self, as_of: NaiveDate) -> Result<DailyStats, ApplicationError> {
        let counts = self.repository.counts().await?;
        let stays = self.repository.list_stays_from(as_of, None).await?;
        Ok(DailyStats::compute(as_of, counts, &stays))
    }

    pub async fn occupancy(&self, as_of: NaiveDate) -> Result<Vec<OccupancyRow>, ApplicationError> {
        let stays = self.repository.list_stays_from(as_of, None).await?;
        Ok(reporting::occupancy(&stays, as_of))
    }

    pub async fn check_ins(&self, as_of: NaiveDate) -> Result<Vec<OccupancyRow>, ApplicationError> {
        let stays = self.repository.list_stays_from(as_of, None).await?;
        Ok(reporting::check_ins(&stays, as_of))
    }

    pub async fn schedule(
        &self,
        as_of: NaiveDate,
        room_number: Option<&str>,
    ) -> Result<Vec<ScheduleRow>, ApplicationError> {
        let room_number = room_number.map(str::trim).filter(|value| !value.is_empty());
        let stays = self.repository.list_stays_from(as_of, room_number).await?;
        Ok(reporting::schedule(&stays, as_of))
    }

    /// Computes the day's stats and hands the manager report to the notification sink.
    pub async fn daily_report(&self, as_of: NaiveDate) -> Result<DailyReport, ApplicationError> {
        let stats = self.stats(as_of).await?;
        let body = stats.render_text(&self.currency);

        let delivery = self
            .notifications
            .publish(NotificationEvent::DailyReport { stats: stats.clone(), body: body.clone() })
            .await;

        info!(
            event_name = "report.daily_generated",
            as_of = %as_of,
            occupied_rooms = stats.occupied_rooms,
            total_rooms = stats.total_rooms,
            "daily report generated"
        );
        Ok(DailyReport { stats, body, delivery })
    }

    pub async fn receipt(&self, booking_id: i64) -> Result<Receipt, ApplicationError> {
        let record = self
            .repository
            .find_stay(BookingId(booking_id))
            .await?
            .ok_or(BookingError::BookingNotFound { booking_id })?;
        Ok(Receipt::from_stay(&record))
    }
}

fn log_booking_failure(request: &BookingRequest, error: &ApplicationError) {
    match error {
        ApplicationError::Booking(rejection) => info!(
            event_name = "booking.rejected",
            room_number = %request.room_number,
            reason = rejection.kind(),
            "booking rejected"
        ),
        other => warn!(
            event_name = "booking.failed",
            room_number = %request.room_number,
            error = %other,
            "booking failed"
        ),
    }
}
