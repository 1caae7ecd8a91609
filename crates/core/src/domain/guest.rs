use serde::{Deserialize, Serialize};

/// Phone number recorded for guests created through a booking.
pub const PLACEHOLDER_PHONE: &str = "N/A";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuestId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Emails are matched exactly; only surrounding whitespace is dropped.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_string()
}
