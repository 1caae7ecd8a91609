use std::env;
use std::sync::{Mutex, OnceLock};

use hotelier_cli::commands::{availability, doctor, migrate, report, seed};
use serde_json::Value;

fn file_database(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("hotel.db").display())
}

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("HOTELIER_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_unknown_provider() {
    with_env(
        &[("HOTELIER_DATABASE_URL", "sqlite::memory:"), ("HOTELIER_LLM_PROVIDER", "anthropic")],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 2, "expected config validation failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["status"], "error");
            assert_eq!(payload["error_class"], "config_validation");
        },
    );
}

#[test]
fn seed_lists_the_inventory_and_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_database(&dir);

    with_env(&[("HOTELIER_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");
        assert_eq!(first_payload["data"]["rooms_inserted"], 10);

        let message = first_payload["message"].as_str().unwrap_or("");
        assert!(message.starts_with("room inventory ready (10 rooms):"));
        assert!(message.contains("  - 101 (Standard Queen)"));
        assert!(message.contains("  - 110 (Penthouse)"));

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["data"]["rooms_inserted"], 0);
        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

#[test]
fn availability_reads_the_seeded_inventory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_database(&dir);

    with_env(&[("HOTELIER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = availability::run("2030-01-10", "2030-01-12");
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["rooms"].as_array().map(Vec::len), Some(10));
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("- Room 101 (Standard Queen) - Rs. 1400.00 (Cap: 2)"));

        let result = availability::run("2030-1-10", "2030-01-12");
        assert_eq!(result.exit_code, 7);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "date_format");
    });
}

#[test]
fn report_renders_stats_for_the_reference_day() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_database(&dir);

    with_env(&[("HOTELIER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = report::run(Some("2030-01-10"));
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["total_rooms"], 10);
        assert_eq!(payload["data"]["occupied_rooms"], 0);
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.starts_with("Daily Hotel Pulse (2030-01-10)"));
        assert!(message.contains("Occupancy: 0.0% (0/10 rooms)"));
    });
}

#[test]
fn report_fails_against_an_unmigrated_database() {
    with_env(&[("HOTELIER_DATABASE_URL", "sqlite::memory:")], || {
        let result = report::run(None);
        assert_eq!(result.exit_code, 8);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "storage");
    });
}

#[test]
fn doctor_reports_missing_inventory_as_json() {
    with_env(&[("HOTELIER_DATABASE_URL", "sqlite::memory:")], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "fail");

        let checks = payload["checks"].as_array().cloned().unwrap_or_default();
        let status_of = |name: &str| {
            checks
                .iter()
                .find(|check| check["name"] == name)
                .map(|check| check["status"].clone())
                .unwrap_or(Value::Null)
        };
        assert_eq!(status_of("config_validation"), "pass");
        assert_eq!(status_of("llm_credentials"), "pass");
        assert_eq!(status_of("database_connectivity"), "pass");
        assert_eq!(status_of("room_inventory"), "fail");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "HOTELIER_DATABASE_URL",
        "HOTELIER_DATABASE_MAX_CONNECTIONS",
        "HOTELIER_DATABASE_TIMEOUT_SECS",
        "HOTELIER_HOTEL_NAME",
        "HOTELIER_HOTEL_CURRENCY",
        "HOTELIER_LLM_PROVIDER",
        "HOTELIER_LLM_API_KEY",
        "HOTELIER_LLM_BASE_URL",
        "HOTELIER_LLM_MODEL",
        "HOTELIER_NOTIFICATIONS_MODE",
        "HOTELIER_NOTIFICATIONS_WEBHOOK_URL",
        "HOTELIER_REPORTS_ENABLED",
        "HOTELIER_LOGGING_LEVEL",
        "HOTELIER_LOGGING_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
