use sqlx::Row;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// One room type in the canonical inventory. Room numbers are assigned
/// sequentially from 101 in declaration order.
#[derive(Debug, Clone, Copy)]
struct RoomTypeContract {
    room_type: &'static str,
    price_cents: i64,
    capacity: i64,
    count: usize,
    description: &'static str,
}

const ROOM_TYPES: &[RoomTypeContract] = &[
    RoomTypeContract {
        room_type: "Standard Queen",
        price_cents: 140_000,
        capacity: 2,
        count: 4,
        description: "Cozy queen bed, great for couples.",
    },
    RoomTypeContract {
        room_type: "Deluxe King",
        price_cents: 260_000,
        capacity: 3,
        count: 3,
        description: "King bed with city view.",
    },
    RoomTypeContract {
        room_type: "Family Suite",
        price_cents: 420_000,
        capacity: 4,
        count: 2,
        description: "Two beds + living area.",
    },
    RoomTypeContract {
        room_type: "Penthouse",
        price_cents: 950_000,
        capacity: 6,
        count: 1,
        description: "Top floor luxury with terrace.",
    },
];

const FIRST_ROOM_NUMBER: usize = 101;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRoom {
    pub room_number: String,
    pub room_type: &'static str,
    pub price_cents: i64,
    pub capacity: i64,
    pub description: &'static str,
}

/// The hotel's canonical room inventory (rooms 101-110).
pub struct RoomInventory;

impl RoomInventory {
    pub fn rooms() -> Vec<SeedRoom> {
        ROOM_TYPES
            .iter()
            .flat_map(|contract| std::iter::repeat(contract).take(contract.count))
            .enumerate()
            .map(|(offset, contract)| SeedRoom {
                room_number: (FIRST_ROOM_NUMBER + offset).to_string(),
                room_type: contract.room_type,
                price_cents: contract.price_cents,
                capacity: contract.capacity,
                description: contract.description,
            })
            .collect()
    }

    /// Inserts any missing inventory rooms. Existing rooms are left untouched, so
    /// loading twice is a no-op.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0u64;

        for room in Self::rooms() {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO rooms (room_number, room_type, price_cents, capacity, description)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&room.room_number)
            .bind(room.room_type)
            .bind(room.price_cents)
            .bind(room.capacity)
            .bind(room.description)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(SeedResult { rooms_inserted: inserted, rooms_expected: Self::rooms().len() })
    }

    /// Checks that every inventory room exists with its contracted type, rate and capacity.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for room in Self::rooms() {
            let row = sqlx::query(
                "SELECT room_type, price_cents, capacity FROM rooms WHERE room_number = ?",
            )
            .bind(&room.room_number)
            .fetch_optional(pool)
            .await?;

            let matches = match row {
                Some(row) => {
                    let room_type: String = row
                        .try_get("room_type")
                        .map_err(|error| RepositoryError::Decode(error.to_string()))?;
                    let price_cents: i64 = row
                        .try_get("price_cents")
                        .map_err(|error| RepositoryError::Decode(error.to_string()))?;
                    let capacity: i64 = row
                        .try_get("capacity")
                        .map_err(|error| RepositoryError::Decode(error.to_string()))?;
                    room_type == room.room_type
                        && price_cents == room.price_cents
                        && capacity == room.capacity
                }
                None => false,
            };
            checks.push((format!("room-{}", room.room_number), matches));
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub rooms_inserted: u64,
    pub rooms_expected: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(String, bool)>,
}
