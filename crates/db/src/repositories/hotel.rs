use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::debug;

use hotelier_core::booking::StayRequest;
use hotelier_core::dates::{format_date, DateRange, StayDates, DATE_FORMAT};
use hotelier_core::domain::booking::{Booking, BookingId, BookingStatus, StayRecord};
use hotelier_core::domain::guest::{Guest, GuestId, PLACEHOLDER_PHONE};
use hotelier_core::domain::room::{Room, RoomId};
use hotelier_core::errors::BookingError;
use hotelier_core::reporting::InventoryCounts;

use super::{HotelRepository, RepositoryError};
use crate::DbPool;

const ROOM_COLUMNS: &str = "id, room_number, room_type, price_cents, capacity, description";

const STAY_SELECT: &str = "SELECT
        b.id AS booking_id,
        b.room_id,
        b.guest_id,
        b.check_in,
        b.check_out,
        b.created_at,
        b.status,
        b.adults,
        b.children,
        r.room_number,
        r.room_type,
        r.price_cents,
        r.capacity,
        r.description,
        g.name AS guest_name,
        g.email AS guest_email,
        g.phone AS guest_phone
     FROM bookings b
     JOIN rooms r ON r.id = b.room_id
     JOIN guests g ON g.id = b.guest_id";

#[derive(Clone)]
pub struct SqlHotelRepository {
    pool: DbPool,
}

impl SqlHotelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn decode_err(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

fn decode_u32(value: i64, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::Decode(format!("{column} out of range: {value}")))
}

fn decode_date(raw: &str, column: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|error| RepositoryError::Decode(format!("{column} `{raw}`: {error}")))
}

fn room_from_row(row: &SqliteRow) -> Result<Room, RepositoryError> {
    let price_cents: i64 = row.try_get("price_cents").map_err(decode_err)?;
    let capacity: i64 = row.try_get("capacity").map_err(decode_err)?;

    Ok(Room {
        id: RoomId(row.try_get("id").map_err(decode_err)?),
        room_number: row.try_get("room_number").map_err(decode_err)?,
        room_type: row.try_get("room_type").map_err(decode_err)?,
        nightly_rate: Room::rate_from_cents(price_cents),
        capacity: decode_u32(capacity, "capacity")?,
        description: row.try_get("description").map_err(decode_err)?,
    })
}

fn guest_from_row(row: &SqliteRow) -> Result<Guest, RepositoryError> {
    Ok(Guest {
        id: GuestId(row.try_get("id").map_err(decode_err)?),
        name: row.try_get("name").map_err(decode_err)?,
        email: row.try_get("email").map_err(decode_err)?,
        phone: row.try_get("phone").map_err(decode_err)?,
    })
}

fn stay_from_row(row: &SqliteRow) -> Result<StayRecord, RepositoryError> {
    let check_in: String = row.try_get("check_in").map_err(decode_err)?;
    let check_out: String = row.try_get("check_out").map_err(decode_err)?;
    let created_at_str: String = row.try_get("created_at").map_err(decode_err)?;
    let status_str: String = row.try_get("status").map_err(decode_err)?;
    let adults: i64 = row.try_get("adults").map_err(decode_err)?;
    let children: i64 = row.try_get("children").map_err(decode_err)?;
    let price_cents: i64 = row.try_get("price_cents").map_err(decode_err)?;
    let capacity: i64 = row.try_get("capacity").map_err(decode_err)?;

    let stay = StayDates::new(
        decode_date(&check_in, "check_in")?,
        decode_date(&check_out, "check_out")?,
    )
    .map_err(|error| RepositoryError::Decode(error.to_string()))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("created_at: {error}")))?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown booking status `{status_str}`")))?;

    let room_id = RoomId(row.try_get("room_id").map_err(decode_err)?);
    let guest_id = GuestId(row.try_get("guest_id").map_err(decode_err)?);

    Ok(StayRecord {
        booking: Booking {
            id: BookingId(row.try_get("booking_id").map_err(decode_err)?),
            room_id,
            guest_id,
            stay,
            created_at,
            status,
            adults: decode_u32(adults, "adults")?,
            children: decode_u32(children, "children")?,
        },
        room: Room {
            id: room_id,
            room_number: row.try_get("room_number").map_err(decode_err)?,
            room_type: row.try_get("room_type").map_err(decode_err)?,
            nightly_rate: Room::rate_from_cents(price_cents),
            capacity: decode_u32(capacity, "capacity")?,
            description: row.try_get("description").map_err(decode_err)?,
        },
        guest: Guest {
            id: guest_id,
            name: row.try_get("guest_name").map_err(decode_err)?,
            email: row.try_get("guest_email").map_err(decode_err)?,
            phone: row.try_get("guest_phone").map_err(decode_err)?,
        },
    })
}

#[async_trait::async_trait]
impl HotelRepository for SqlHotelRepository {
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(room_from_row).collect()
    }

    async fn find_room_by_number(
        &self,
        room_number: &str,
    ) -> Result<Option<Room>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        room_by_number(&mut conn, room_number).await
    }

    async fn find_available_rooms(&self, range: &DateRange) -> Result<Vec<Room>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms
             WHERE id NOT IN (
                 SELECT room_id FROM bookings
                 WHERE status = 'confirmed' AND check_in < ?1 AND check_out > ?2
             )
             ORDER BY id"
        ))
        .bind(format_date(range.end))
        .bind(format_date(range.start))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(room_from_row).collect()
    }

    async fn find_guest_by_email(&self, email: &str) -> Result<Option<Guest>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        guest_by_email(&mut conn, email).await
    }

    async fn list_bookings_for_guest(
        &self,
        guest_id: GuestId,
    ) -> Result<Vec<StayRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{STAY_SELECT} WHERE b.guest_id = ? ORDER BY b.id"))
            .bind(guest_id.0)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(stay_from_row).collect()
    }

    async fn list_stays_from(
        &self,
        as_of: NaiveDate,
        room_number: Option<&str>,
    ) -> Result<Vec<StayRecord>, RepositoryError> {
        let rows = if let Some(room_number) = room_number {
            sqlx::query(&format!(
                "{STAY_SELECT}
                 WHERE b.status = 'confirmed' AND b.check_out >= ? AND r.room_number = ?
                 ORDER BY b.check_in, b.id"
            ))
            .bind(format_date(as_of))
            .bind(room_number)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(&format!(
                "{STAY_SELECT}
                 WHERE b.status = 'confirmed' AND b.check_out >= ?
                 ORDER BY b.check_in, b.id"
            ))
            .bind(format_date(as_of))
            .fetch_all(&self.pool)
            .await?
        };

        rows.iter().map(stay_from_row).collect()
    }

    async fn counts(&self) -> Result<InventoryCounts, RepositoryError> {
        let (rooms, bookings, guests) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT
                (SELECT COUNT(1) FROM rooms),
                (SELECT COUNT(1) FROM bookings WHERE status = 'confirmed'),
                (SELECT COUNT(1) FROM guests)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(InventoryCounts {
            total_rooms: decode_u32(rooms, "rooms")?,
            total_bookings: decode_u32(bookings, "bookings")?,
            registered_guests: decode_u32(guests, "guests")?,
        })
    }

    async fn find_stay(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<StayRecord>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        stay_by_id(&mut conn, booking_id).await
    }

    async fn reserve(&self, request: &StayRequest) -> Result<StayRecord, RepositoryError> {
        // IMMEDIATE takes the write lock before the overlap read, so concurrent
        // bookings for the same room are checked one after another. Dropping the
        // guard on any early return rolls the transaction back.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let record = reserve_in_transaction(&mut tx, request).await?;
        tx.commit().await?;
        Ok(record)
    }
}

async fn reserve_in_transaction(
    conn: &mut SqliteConnection,
    request: &StayRequest,
) -> Result<StayRecord, RepositoryError> {
    let room = room_by_number(conn, &request.room_number)
        .await?
        .ok_or_else(|| BookingError::RoomNotFound { room_number: request.room_number.clone() })?;

    request.ensure_fits(&room)?;

    let overlapping: i64 = sqlx::query_scalar(
        "SELECT EXISTS(
            SELECT 1 FROM bookings
            WHERE room_id = ?1 AND status = 'confirmed' AND check_in < ?2 AND check_out > ?3
         )",
    )
    .bind(room.id.0)
    .bind(format_date(request.stay.check_out()))
    .bind(format_date(request.stay.check_in()))
    .fetch_one(&mut *conn)
    .await?;
    if overlapping == 1 {
        return Err(BookingError::RoomUnavailable { room_number: room.room_number.clone() }.into());
    }

    let guest = match guest_by_email(conn, &request.guest_email).await? {
        Some(existing) => existing,
        None => {
            let inserted = sqlx::query("INSERT INTO guests (name, email, phone) VALUES (?, ?, ?)")
                .bind(&request.guest_name)
                .bind(&request.guest_email)
                .bind(PLACEHOLDER_PHONE)
                .execute(&mut *conn)
                .await?;
            debug!(
                event_name = "guest.created",
                guest_id = inserted.last_insert_rowid(),
                "registered new guest"
            );
            Guest {
                id: GuestId(inserted.last_insert_rowid()),
                name: request.guest_name.clone(),
                email: request.guest_email.clone(),
                phone: PLACEHOLDER_PHONE.to_string(),
            }
        }
    };

    let created_at = Utc::now();
    let inserted = sqlx::query(
        "INSERT INTO bookings (room_id, guest_id, check_in, check_out, created_at, status, adults, children)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(room.id.0)
    .bind(guest.id.0)
    .bind(format_date(request.stay.check_in()))
    .bind(format_date(request.stay.check_out()))
    .bind(created_at.to_rfc3339())
    .bind(BookingStatus::Confirmed.as_str())
    .bind(i64::from(request.adults))
    .bind(i64::from(request.children))
    .execute(&mut *conn)
    .await
    .map_err(|error| map_insert_error(error, &room, request))?;

    Ok(StayRecord {
        booking: Booking {
            id: BookingId(inserted.last_insert_rowid()),
            room_id: room.id,
            guest_id: guest.id,
            stay: request.stay,
            created_at,
            status: BookingStatus::Confirmed,
            adults: request.adults,
            children: request.children,
        },
        room,
        guest,
    })
}

/// Trigger aborts carry the rule name as the error message.
fn map_insert_error(error: sqlx::Error, room: &Room, request: &StayRequest) -> RepositoryError {
    if let sqlx::Error::Database(database_error) = &error {
        let message = database_error.message();
        if message.contains("booking_overlap") {
            return BookingError::RoomUnavailable { room_number: room.room_number.clone() }.into();
        }
        if message.contains("booking_capacity") {
            return BookingError::CapacityExceeded {
                room_number: room.room_number.clone(),
                capacity: room.capacity,
                requested: request.party_size(),
            }
            .into();
        }
    }
    error.into()
}

async fn room_by_number(
    conn: &mut SqliteConnection,
    room_number: &str,
) -> Result<Option<Room>, RepositoryError> {
    let row = sqlx::query(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = ?"))
        .bind(room_number)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(room_from_row).transpose()
}

async fn guest_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<Guest>, RepositoryError> {
    let row = sqlx::query("SELECT id, name, email, phone FROM guests WHERE email = ?")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(guest_from_row).transpose()
}

async fn stay_by_id(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<Option<StayRecord>, RepositoryError> {
    let row = sqlx::query(&format!("{STAY_SELECT} WHERE b.id = ?"))
        .bind(booking_id.0)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(stay_from_row).transpose()
}
