use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::booking::{BookingId, StayRecord};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Receipt {
    pub booking_id: BookingId,
    pub guest_name: String,
    pub guest_email: String,
    pub room_number: String,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nightly_rate: Decimal,
    pub nights: i64,
    pub total: Decimal,
}

impl Receipt {
    pub fn from_stay(record: &StayRecord) -> Self {
        // A stay is always at least one night; guard anyway for rows written by hand.
        let nights = record.booking.stay.nights().max(1);
        Self {
            booking_id: record.booking.id,
            guest_name: record.guest.name.clone(),
            guest_email: record.guest.email.clone(),
            room_number: record.room.room_number.clone(),
            room_type: record.room.room_type.clone(),
            check_in: record.booking.stay.check_in(),
            check_out: record.booking.stay.check_out(),
            nightly_rate: record.room.nightly_rate,
            nights,
            total: record.room.nightly_rate * Decimal::from(nights),
        }
    }

    /// File stem used for rendered receipts, e.g. `receipt_Alice_Smith_7`.
    pub fn file_stem(&self) -> String {
        let name: String = self
            .guest_name
            .trim()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        format!("receipt_{name}_{}", self.booking_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::Receipt;
    use crate::dates::StayDates;
    use crate::domain::booking::{Booking, BookingId, BookingStatus, StayRecord};
    use crate::domain::guest::{Guest, GuestId};
    use crate::domain::room::{Room, RoomId};

    #[test]
    fn total_is_rate_times_nights() {
        let check_in = NaiveDate::from_ymd_opt(2025, 1, 10).expect("date");
        let check_out = NaiveDate::from_ymd_opt(2025, 1, 13).expect("date");
        let record = StayRecord {
            booking: Booking {
                id: BookingId(7),
                room_id: RoomId(1),
                guest_id: GuestId(1),
                stay: StayDates::new(check_in, check_out).expect("stay"),
                created_at: Utc::now(),
                status: BookingStatus::Confirmed,
                adults: 2,
                children: 0,
            },
            room: Room {
                id: RoomId(1),
                room_number: "101".to_string(),
                room_type: "Standard Queen".to_string(),
                nightly_rate: Decimal::new(140_000, 2),
                capacity: 2,
                description: String::new(),
            },
            guest: Guest {
                id: GuestId(1),
                name: "Alice Smith".to_string(),
                email: "a@x.com".to_string(),
                phone: "N/A".to_string(),
            },
        };

        let receipt = Receipt::from_stay(&record);
        assert_eq!(receipt.nights, 3);
        assert_eq!(receipt.total, Decimal::new(420_000, 2));
        assert_eq!(receipt.file_stem(), "receipt_Alice_Smith_7");
    }
}
