//! Calendar dates at the booking boundary.
//!
//! Stays are half-open `[check_in, check_out)` intervals of local calendar days:
//! a guest checking out on day D never conflicts with another checking in on D.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a strict `YYYY-MM-DD` date. Other formats are rejected, never guessed.
pub fn parse_calendar_date(field: &'static str, raw: &str) -> Result<NaiveDate, BookingError> {
    let trimmed = raw.trim();
    // chrono accepts unpadded fields for %m/%d; the boundary format is fixed-width.
    if trimmed.len() != 10 {
        return Err(BookingError::DateFormat { field, value: raw.to_string() });
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| BookingError::DateFormat { field, value: raw.to_string() })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The interval an availability query asks about. Only the format is validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, BookingError> {
        Ok(Self {
            start: parse_calendar_date("start_date", start)?,
            end: parse_calendar_date("end_date", end)?,
        })
    }

    /// The overlap predicate shared by availability and the booking re-check.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in < self.end && check_out > self.start
    }
}

/// A validated stay: `check_out` is strictly after `check_in`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidRange { check_in, check_out });
        }
        Ok(Self { check_in, check_out })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// True when the guest is in the room on the night of `day`.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    pub fn overlaps(&self, other: &StayDates) -> bool {
        self.as_range().overlaps(other.check_in, other.check_out)
    }

    pub fn as_range(&self) -> DateRange {
        DateRange { start: self.check_in, end: self.check_out }
    }
}
