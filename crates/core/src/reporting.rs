//! Read-only views over confirmed stays as of a reference day.
//!
//! Every function here is pure: callers fetch `StayRecord`s (typically those whose
//! check-out is on or after the reference day) and these functions filter and
//! classify them. Revenue is the nightly run rate of rooms occupied tonight, not
//! cumulative booking value.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::format_date;
use crate::domain::booking::{BookingId, StayRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    CheckingIn,
    InHouse,
}

impl OccupancyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CheckingIn => "Checking In",
            Self::InHouse => "In-House",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    InHouse,
    Upcoming,
    DepartingToday,
}

impl ScheduleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InHouse => "In-House",
            Self::Upcoming => "Upcoming",
            Self::DepartingToday => "Departing Today",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRow {
    pub booking_id: BookingId,
    pub room_number: String,
    pub guest_name: String,
    pub adults: u32,
    pub children: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: OccupancyStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub booking_id: BookingId,
    pub room_number: String,
    pub room_type: String,
    pub guest_name: String,
    pub guest_email: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: ScheduleStatus,
}

/// Stays covering the night of `today`, tagged by whether they start today.
pub fn occupancy(stays: &[StayRecord], today: NaiveDate) -> Vec<OccupancyRow> {
    stays
        .iter()
        .filter(|record| record.booking.stay.contains(today))
        .map(|record| {
            let status = if record.booking.stay.check_in() == today {
                OccupancyStatus::CheckingIn
            } else {
                OccupancyStatus::InHouse
            };
            occupancy_row(record, status)
        })
        .collect()
}

pub fn check_ins(stays: &[StayRecord], today: NaiveDate) -> Vec<OccupancyRow> {
    stays
        .iter()
        .filter(|record| record.booking.stay.check_in() == today)
        .map(|record| occupancy_row(record, OccupancyStatus::CheckingIn))
        .collect()
}

/// Active and future stays (check-out on or after `today`), ordered by check-in.
pub fn schedule(stays: &[StayRecord], today: NaiveDate) -> Vec<ScheduleRow> {
    let mut rows: Vec<ScheduleRow> = stays
        .iter()
        .filter(|record| record.booking.stay.check_out() >= today)
        .map(|record| {
            let stay = &record.booking.stay;
            let status = if stay.contains(today) {
                ScheduleStatus::InHouse
            } else if stay.check_in() > today {
                ScheduleStatus::Upcoming
            } else {
                ScheduleStatus::DepartingToday
            };
            ScheduleRow {
                booking_id: record.booking.id,
                room_number: record.room.room_number.clone(),
                room_type: record.room.room_type.clone(),
                guest_name: record.guest.name.clone(),
                guest_email: record.guest.email.clone(),
                check_in: stay.check_in(),
                check_out: stay.check_out(),
                status,
            }
        })
        .collect();

    rows.sort_by(|left, right| {
        left.check_in.cmp(&right.check_in).then(left.booking_id.cmp(&right.booking_id))
    });
    rows
}

fn occupancy_row(record: &StayRecord, status: OccupancyStatus) -> OccupancyRow {
    OccupancyRow {
        booking_id: record.booking.id,
        room_number: record.room.room_number.clone(),
        guest_name: record.guest.name.clone(),
        adults: record.booking.adults,
        children: record.booking.children,
        check_in: record.booking.stay.check_in(),
        check_out: record.booking.stay.check_out(),
        status,
    }
}

/// Store-wide totals that do not depend on the reference day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCounts {
    pub total_rooms: u32,
    pub total_bookings: u32,
    pub registered_guests: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub as_of: NaiveDate,
    pub total_rooms: u32,
    pub total_bookings: u32,
    pub registered_guests: u32,
    pub occupied_rooms: u32,
    pub guests_in_house: u32,
    /// Fraction of rooms occupied tonight, in `[0, 1]`.
    pub occupancy_rate: f64,
    pub revenue: Decimal,
}

impl DailyStats {
    pub fn compute(as_of: NaiveDate, counts: InventoryCounts, stays: &[StayRecord]) -> Self {
        let active: Vec<&StayRecord> =
            stays.iter().filter(|record| record.booking.stay.contains(as_of)).collect();

        let mut occupied = BTreeSet::new();
        let mut revenue = Decimal::ZERO;
        let mut guests_in_house = 0u32;
        for record in &active {
            if occupied.insert(record.room.id) {
                revenue += record.room.nightly_rate;
            }
            guests_in_house = guests_in_house.saturating_add(record.booking.party_size());
        }

        let occupied_rooms = u32::try_from(occupied.len()).unwrap_or(u32::MAX);
        let occupancy_rate = if counts.total_rooms == 0 {
            0.0
        } else {
            f64::from(occupied_rooms) / f64::from(counts.total_rooms)
        };

        Self {
            as_of,
            total_rooms: counts.total_rooms,
            total_bookings: counts.total_bookings,
            registered_guests: counts.registered_guests,
            occupied_rooms,
            guests_in_house,
            occupancy_rate,
            revenue,
        }
    }

    pub fn occupancy_pct(&self) -> f64 {
        self.occupancy_rate * 100.0
    }

    pub fn render_text(&self, currency: &str) -> String {
        format!(
            "Daily Hotel Pulse ({as_of})\n\
             - Occupancy: {pct:.1}% ({occupied}/{total} rooms)\n\
             - Current Revenue: {currency} {revenue:.2} (Daily Run Rate)\n\
             - Guests In-House: {in_house}\n\
             - Total Confirmed Bookings: {bookings}\n\
             - Total Registered Guests: {guests}\n",
            as_of = format_date(self.as_of),
            pct = self.occupancy_pct(),
            occupied = self.occupied_rooms,
            total = self.total_rooms,
            revenue = self.revenue,
            in_house = self.guests_in_house,
            bookings = self.total_bookings,
            guests = self.registered_guests,
        )
    }
}
