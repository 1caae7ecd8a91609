use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub i64);

/// Bookable inventory. Rooms are seeded once and never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_number: String,
    pub room_type: String,
    pub nightly_rate: Decimal,
    pub capacity: u32,
    pub description: String,
}

impl Room {
    /// Nightly rate as stored: integer minor units.
    pub fn rate_cents(&self) -> i64 {
        let cents = (self.nightly_rate * Decimal::ONE_HUNDRED).round();
        i64::try_from(cents).unwrap_or(i64::MAX)
    }

    pub fn rate_from_cents(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Room, RoomId};

    #[test]
    fn rate_cents_round_trips_two_decimal_places() {
        let room = Room {
            id: RoomId(1),
            room_number: "101".to_string(),
            room_type: "Standard Queen".to_string(),
            nightly_rate: Decimal::new(140_050, 2),
            capacity: 2,
            description: String::new(),
        };

        assert_eq!(room.rate_cents(), 140_050);
        assert_eq!(Room::rate_from_cents(140_050), room.nightly_rate);
    }
}
