use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use hotelier_core::booking::StayRequest;
use hotelier_core::dates::DateRange;
use hotelier_core::domain::booking::{BookingId, StayRecord};
use hotelier_core::domain::guest::{Guest, GuestId};
use hotelier_core::domain::room::Room;
use hotelier_core::errors::{ApplicationError, BookingError};
use hotelier_core::reporting::InventoryCounts;

pub mod hotel;

pub use hotel::SqlHotelRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    /// A booking rule was violated, either by the in-transaction checks or by a
    /// schema trigger.
    #[error(transparent)]
    Rejected(#[from] BookingError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Rejected(error) => ApplicationError::Booking(error),
            other => ApplicationError::Persistence(other.to_string()),
        }
    }
}

#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// All rooms in id order.
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    async fn find_room_by_number(&self, room_number: &str)
        -> Result<Option<Room>, RepositoryError>;

    /// Rooms with no confirmed booking overlapping `range`, in id order.
    async fn find_available_rooms(&self, range: &DateRange) -> Result<Vec<Room>, RepositoryError>;

    async fn find_guest_by_email(&self, email: &str) -> Result<Option<Guest>, RepositoryError>;

    async fn list_bookings_for_guest(
        &self,
        guest_id: GuestId,
    ) -> Result<Vec<StayRecord>, RepositoryError>;

    /// Stays whose check-out is on or after `as_of`, ordered by check-in.
    async fn list_stays_from(
        &self,
        as_of: NaiveDate,
        room_number: Option<&str>,
    ) -> Result<Vec<StayRecord>, RepositoryError>;

    async fn counts(&self) -> Result<InventoryCounts, RepositoryError>;

    async fn find_stay(&self, booking_id: BookingId)
        -> Result<Option<StayRecord>, RepositoryError>;

    /// Room lookup, capacity check, overlap re-check, guest get-or-create and
    /// insert, as one serialized write transaction. Nothing is written unless
    /// the booking row is.
    async fn reserve(&self, request: &StayRequest) -> Result<StayRecord, RepositoryError>;
}
