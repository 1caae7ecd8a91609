use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::{parse_calendar_date, StayDates};
use crate::domain::guest::normalize_email;
use crate::domain::room::Room;
use crate::errors::BookingError;

/// A booking as it arrives from a caller: dates are still strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub room_number: String,
    pub guest_name: String,
    pub guest_email: String,
    pub start_date: String,
    pub end_date: String,
    pub adults: u32,
    pub children: u32,
}

/// A request that passed every check that does not need the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StayRequest {
    pub room_number: String,
    pub guest_name: String,
    pub guest_email: String,
    pub stay: StayDates,
    pub adults: u32,
    pub children: u32,
}

impl BookingRequest {
    /// Date parsing, past-date and range checks, in that order, then required fields.
    pub fn validate(&self, today: NaiveDate) -> Result<StayRequest, BookingError> {
        let check_in = parse_calendar_date("start_date", &self.start_date)?;
        let check_out = parse_calendar_date("end_date", &self.end_date)?;

        if check_in < today {
            return Err(BookingError::PastDate { check_in, today });
        }
        let stay = StayDates::new(check_in, check_out)?;

        let room_number = required("room_number", &self.room_number)?;
        let guest_name = required("name", &self.guest_name)?;
        let guest_email = normalize_email(&self.guest_email);
        if !guest_email.contains('@') {
            return Err(BookingError::InvalidArgument {
                field: "email",
                reason: "must be a valid email address".to_string(),
            });
        }
        if self.adults.saturating_add(self.children) == 0 {
            return Err(BookingError::InvalidArgument {
                field: "guest count",
                reason: "must include at least one guest".to_string(),
            });
        }

        Ok(StayRequest {
            room_number,
            guest_name,
            guest_email,
            stay,
            adults: self.adults,
            children: self.children,
        })
    }
}

impl StayRequest {
    pub fn party_size(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    pub fn ensure_fits(&self, room: &Room) -> Result<(), BookingError> {
        if self.party_size() > room.capacity {
            return Err(BookingError::CapacityExceeded {
                room_number: room.room_number.clone(),
                capacity: room.capacity,
                requested: self.party_size(),
            });
        }
        Ok(())
    }
}

fn required(field: &'static str, raw: &str) -> Result<String, BookingError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(BookingError::InvalidArgument { field, reason: "is required".to_string() });
    }
    Ok(value.to_string())
}

/// Required text field from untyped input. Numbers are accepted as their
/// decimal text, so `101` and `"101"` name the same room.
pub fn parse_text_field(
    field: &'static str,
    value: Option<&Value>,
) -> Result<String, BookingError> {
    match value {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Ok(raw.trim().to_string()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => Err(BookingError::InvalidArgument { field, reason: "is required".to_string() }),
    }
}

/// Guest counts arrive as JSON numbers or numeric strings ("2").
/// A missing value takes `default`.
pub fn parse_guest_count(
    field: &'static str,
    value: Option<&Value>,
    default: u32,
) -> Result<u32, BookingError> {
    let invalid = || BookingError::InvalidArgument {
        field,
        reason: "must be a whole number (e.g. '2')".to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(number)) => {
            number.as_u64().and_then(|count| u32::try_from(count).ok()).ok_or_else(invalid)
        }
        Some(Value::String(raw)) => raw.trim().parse::<u32>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
