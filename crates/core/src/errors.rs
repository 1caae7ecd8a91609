use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT_HINT: &str = "Please use YYYY-MM-DD format (e.g., 2025-01-20).";

/// Rejections raised while validating or executing an availability query or a booking.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("invalid {field} `{value}`: expected YYYY-MM-DD")]
    DateFormat { field: &'static str, value: String },
    #[error("check-in {check_in} is before today ({today})")]
    PastDate { check_in: NaiveDate, today: NaiveDate },
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidRange { check_in: NaiveDate, check_out: NaiveDate },
    #[error("room {room_number} does not exist")]
    RoomNotFound { room_number: String },
    #[error("room {room_number} holds {capacity} guests, {requested} requested")]
    CapacityExceeded { room_number: String, capacity: u32, requested: u32 },
    #[error("room {room_number} is already booked for these dates")]
    RoomUnavailable { room_number: String },
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error("no guest found with email {email}")]
    GuestNotFound { email: String },
    #[error("booking #{booking_id} does not exist")]
    BookingNotFound { booking_id: i64 },
}

impl BookingError {
    /// Stable machine-readable kind, shared by the HTTP API and agent tools.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DateFormat { .. } => "date_format",
            Self::PastDate { .. } => "past_date",
            Self::InvalidRange { .. } => "invalid_range",
            Self::RoomNotFound { .. } => "room_not_found",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::RoomUnavailable { .. } => "room_unavailable",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::GuestNotFound { .. } => "guest_not_found",
            Self::BookingNotFound { .. } => "booking_not_found",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomNotFound { .. } | Self::GuestNotFound { .. } | Self::BookingNotFound { .. }
        )
    }

    /// Guidance text for the person on the other end of the conversation.
    pub fn user_message(&self) -> String {
        match self {
            Self::DateFormat { .. } => format!("Date Error: {DATE_FORMAT_HINT}"),
            Self::PastDate { today, .. } => {
                format!("Error: You cannot book dates in the past. Today is {today}.")
            }
            Self::InvalidRange { .. } => {
                "Error: Check-out date must be after Check-in date.".to_string()
            }
            Self::RoomNotFound { room_number } => {
                format!("Error: Room {room_number} does not exist.")
            }
            Self::CapacityExceeded { room_number, capacity, .. } => {
                format!("Error: Room {room_number} only holds {capacity} people.")
            }
            Self::RoomUnavailable { room_number } => {
                format!("Error: Room {room_number} is already booked.")
            }
            Self::InvalidArgument { field, reason } => format!("Error: {field} {reason}."),
            Self::GuestNotFound { email } => format!("No guest found with email: {email}"),
            Self::BookingNotFound { booking_id } => {
                format!("Error: Booking #{booking_id} does not exist.")
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Booking(error) => error.kind(),
            Self::Persistence(_) => "persistence",
            Self::Integration(_) => "integration",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Message safe to show a caller. Storage details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Booking(error) => error.user_message(),
            Self::Persistence(_) | Self::Integration(_) | Self::Configuration(_) => {
                InterfaceError::from(self.clone()).user_message().to_string()
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("conflict: {message}")]
    Conflict { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested record does not exist.",
            Self::Conflict { .. } => "The room is no longer available for those dates.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Conflict { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Conflict { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Booking(error) if error.is_not_found() => {
                Self::NotFound { message: error.user_message(), correlation_id }
            }
            ApplicationError::Booking(error @ BookingError::RoomUnavailable { .. }) => {
                Self::Conflict { message: error.user_message(), correlation_id }
            }
            ApplicationError::Booking(error) => {
                Self::BadRequest { message: error.user_message(), correlation_id }
            }
            ApplicationError::Persistence(message) | ApplicationError::Integration(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::Configuration(message) => Self::Internal { message, correlation_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::errors::{ApplicationError, BookingError, InterfaceError};

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn validation_error_maps_to_bad_request_interface_error() {
        let interface = ApplicationError::from(BookingError::InvalidRange {
            check_in: day("2025-01-12"),
            check_out: day("2025-01-10"),
        })
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
    }

    #[test]
    fn overlap_maps_to_conflict_and_unknown_room_to_not_found() {
        let conflict = ApplicationError::from(BookingError::RoomUnavailable {
            room_number: "101".to_string(),
        })
        .into_interface("req-2");
        assert!(matches!(conflict, InterfaceError::Conflict { .. }));

        let missing = ApplicationError::from(BookingError::RoomNotFound {
            room_number: "999".to_string(),
        })
        .into_interface("req-3");
        assert!(matches!(missing, InterfaceError::NotFound { .. }));
        assert_eq!(missing.correlation_id(), "req-3");
    }

    #[test]
    fn persistence_error_hides_storage_detail_from_user_message() {
        let error = ApplicationError::Persistence("database is locked".to_owned());

        assert_eq!(
            error.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
        assert!(matches!(
            error.into_interface("req-4"),
            InterfaceError::ServiceUnavailable { .. }
        ));
    }

    #[test]
    fn capacity_message_names_actual_capacity() {
        let error = BookingError::CapacityExceeded {
            room_number: "101".to_string(),
            capacity: 2,
            requested: 3,
        };

        assert_eq!(error.kind(), "capacity_exceeded");
        assert_eq!(error.user_message(), "Error: Room 101 only holds 2 people.");
    }

    #[test]
    fn date_format_message_names_expected_format() {
        let error =
            BookingError::DateFormat { field: "start_date", value: "next friday".to_string() };
        assert!(error.user_message().contains("YYYY-MM-DD"));
    }
}
