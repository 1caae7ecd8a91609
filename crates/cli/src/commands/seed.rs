use crate::commands::{connect, load_config, runtime, CommandResult, Failure};
use hotelier_db::{migrations, RoomInventory};
use serde_json::json;

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect(&config).await?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seeded = RoomInventory::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = RoomInventory::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let run_result: Result<u64, Failure> = if verification.all_present {
            Ok(seeded.rooms_inserted)
        } else {
            let failed_checks = failed_checks(&verification.checks);
            Err(("seed_verification", verification_message(&failed_checks), 6u8))
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(rooms_inserted) => {
            let rooms = RoomInventory::rooms()
                .iter()
                .map(|room| format!("  - {} ({})", room.room_number, room.room_type))
                .collect::<Vec<_>>();
            let message =
                format!("room inventory ready ({} rooms):\n{}", rooms.len(), rooms.join("\n"));
            let data = json!({ "rooms_inserted": rooms_inserted });
            CommandResult::success_with_data("seed", message, Some(data))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn failed_checks(checks: &[(String, bool)]) -> Vec<&str> {
    checks.iter().filter_map(|(check, passed)| (!passed).then_some(check.as_str())).collect()
}

fn verification_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "some rooms failed to load".to_string()
    } else {
        format!("seed verification failed for checks: {}", failed_checks.join(", "))
    }
}
