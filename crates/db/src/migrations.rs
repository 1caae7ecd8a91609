use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::{connect_with_settings, migrations::MIGRATOR};

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "rooms",
        "guests",
        "bookings",
        "idx_bookings_room_dates",
        "idx_bookings_guest_id",
        "idx_bookings_check_out",
        "bookings_no_overlap",
        "bookings_within_capacity",
        "bookings_no_update",
        "bookings_no_delete",
    ];

    async fn table_count(pool: &sqlx::SqlitePool, name: &str) -> i64 {
        sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("check table")
        .get::<i64, _>("count")
    }

    #[tokio::test]
    async fn migrations_create_baseline_tables() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        assert_eq!(table_count(&pool, "rooms").await, 1);
        assert_eq!(table_count(&pool, "guests").await, 1);
        assert_eq!(table_count(&pool, "bookings").await, 1);
    }

    #[tokio::test]
    async fn schema_rejects_inverted_stays_and_duplicate_rooms() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        sqlx::query(
            "INSERT INTO rooms (room_number, room_type, price_cents, capacity) VALUES ('101', 'Standard Queen', 140000, 2)",
        )
        .execute(&pool)
        .await
        .expect("insert room");
        let duplicate = sqlx::query(
            "INSERT INTO rooms (room_number, room_type, price_cents, capacity) VALUES ('101', 'Deluxe King', 260000, 3)",
        )
        .execute(&pool)
        .await;
        assert!(duplicate.is_err(), "room_number must be unique");

        sqlx::query("INSERT INTO guests (name, email) VALUES ('Alice', 'a@x.com')")
            .execute(&pool)
            .await
            .expect("insert guest");
        let inverted = sqlx::query(
            "INSERT INTO bookings (room_id, guest_id, check_in, check_out, created_at, adults, children)
             VALUES (1, 1, '2025-01-12', '2025-01-10', '2025-01-01T00:00:00Z', 1, 0)",
        )
        .execute(&pool)
        .await;
        assert!(inverted.is_err(), "check_out must be after check_in");
    }

    #[tokio::test]
    async fn overlap_trigger_aborts_conflicting_insert() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        sqlx::query(
            "INSERT INTO rooms (room_number, room_type, price_cents, capacity) VALUES ('101', 'Standard Queen', 140000, 2)",
        )
        .execute(&pool)
        .await
        .expect("insert room");
        sqlx::query("INSERT INTO guests (name, email) VALUES ('Alice', 'a@x.com')")
            .execute(&pool)
            .await
            .expect("insert guest");

        let insert = "INSERT INTO bookings (room_id, guest_id, check_in, check_out, created_at, adults, children)
                      VALUES (1, 1, ?, ?, '2025-01-01T00:00:00Z', 1, 0)";
        sqlx::query(insert)
            .bind("2025-01-10")
            .bind("2025-01-12")
            .execute(&pool)
            .await
            .expect("first booking");

        let overlapping =
            sqlx::query(insert).bind("2025-01-11").bind("2025-01-13").execute(&pool).await;
        let message = overlapping.expect_err("overlap must abort").to_string();
        assert!(message.contains("booking_overlap"), "{message}");

        sqlx::query(insert)
            .bind("2025-01-12")
            .bind("2025-01-14")
            .execute(&pool)
            .await
            .expect("back-to-back booking is allowed");
    }

    #[tokio::test]
    async fn capacity_trigger_aborts_oversized_party() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        sqlx::query(
            "INSERT INTO rooms (room_number, room_type, price_cents, capacity) VALUES ('101', 'Standard Queen', 140000, 2)",
        )
        .execute(&pool)
        .await
        .expect("insert room");
        sqlx::query("INSERT INTO guests (name, email) VALUES ('Alice', 'a@x.com')")
            .execute(&pool)
            .await
            .expect("insert guest");

        let insert = "INSERT INTO bookings (room_id, guest_id, check_in, check_out, created_at, adults, children)
                      VALUES (1, 1, '2025-01-10', '2025-01-12', '2025-01-01T00:00:00Z', ?, ?)";
        let oversized = sqlx::query(insert).bind(2).bind(1).execute(&pool).await;
        let message = oversized.expect_err("capacity must abort").to_string();
        assert!(message.contains("booking_capacity"), "{message}");

        sqlx::query(insert).bind(1).bind(1).execute(&pool).await.expect("party at capacity");
    }

    #[tokio::test]
    async fn bookings_cannot_be_updated_or_deleted() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        sqlx::query(
            "INSERT INTO rooms (room_number, room_type, price_cents, capacity) VALUES ('101', 'Standard Queen', 140000, 2)",
        )
        .execute(&pool)
        .await
        .expect("insert room");
        sqlx::query("INSERT INTO guests (name, email) VALUES ('Alice', 'a@x.com')")
            .execute(&pool)
            .await
            .expect("insert guest");
        sqlx::query(
            "INSERT INTO bookings (room_id, guest_id, check_in, check_out, created_at, adults, children)
             VALUES (1, 1, '2025-01-10', '2025-01-12', '2025-01-01T00:00:00Z', 1, 0)",
        )
        .execute(&pool)
        .await
        .expect("insert booking");

        let update = sqlx::query("UPDATE bookings SET check_out = '2025-01-20' WHERE id = 1")
            .execute(&pool)
            .await;
        let message = update.expect_err("update must abort").to_string();
        assert!(message.contains("booking_immutable"), "{message}");

        let delete = sqlx::query("DELETE FROM bookings WHERE id = 1").execute(&pool).await;
        let message = delete.expect_err("delete must abort").to_string();
        assert!(message.contains("booking_immutable"), "{message}");

        let stored: (String, i64) =
            sqlx::query_as("SELECT check_out, (SELECT COUNT(*) FROM bookings) FROM bookings")
                .fetch_one(&pool)
                .await
                .expect("booking row");
        assert_eq!(stored, ("2025-01-12".to_string(), 1));
    }

    #[tokio::test]
    async fn migrations_up_down_up_preserves_schema_signature() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let initial_signature = managed_schema_signature(&pool).await;
        assert_eq!(
            initial_signature.len(),
            MANAGED_SCHEMA_OBJECTS.len(),
            "initial migration pass should create all managed schema objects",
        );

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");

        let after_down_signature = managed_schema_signature(&pool).await;
        assert!(
            after_down_signature.is_empty(),
            "managed schema objects should be removed after full undo",
        );

        run_pending(&pool).await.expect("re-run migrations");

        let after_second_up_signature = managed_schema_signature(&pool).await;
        assert_eq!(
            after_second_up_signature, initial_signature,
            "up/down/up should preserve migration-managed schema signature",
        );
    }

    async fn managed_schema_signature(pool: &sqlx::SqlitePool) -> Vec<(String, String, String)> {
        let mut signature: Vec<(String, String, String)> = sqlx::query(
            "SELECT type, name, IFNULL(sql, '') AS sql
             FROM sqlite_master
             WHERE type IN ('table', 'index', 'trigger')",
        )
        .fetch_all(pool)
        .await
        .expect("load schema objects")
        .into_iter()
        .filter_map(|row| {
            let name = row.get::<String, _>("name");
            if MANAGED_SCHEMA_OBJECTS.contains(&name.as_str()) {
                Some((row.get::<String, _>("type"), name, row.get::<String, _>("sql")))
            } else {
                None
            }
        })
        .collect();
        signature.sort();
        signature
    }
}
