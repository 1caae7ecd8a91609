use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::StayDates;
use crate::domain::guest::{Guest, GuestId};
use crate::domain::room::{Room, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub i64);

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookings have no cancellation or amendment lifecycle; `Confirmed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub guest_id: GuestId,
    pub stay: StayDates,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub adults: u32,
    pub children: u32,
}

impl Booking {
    pub fn party_size(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }
}

/// A booking joined with the room and guest it references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRecord {
    pub booking: Booking,
    pub room: Room,
    pub guest: Guest,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus;

    #[test]
    fn status_round_trips_through_storage_label() {
        let status = BookingStatus::Confirmed;
        assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        assert_eq!(BookingStatus::parse("cancelled"), None);
    }
}
