use crate::commands::{
    connect, front_desk, load_config, operation_failure, runtime, to_data, CommandResult,
};

pub fn run(start_date: &str, end_date: &str) -> CommandResult {
    let config = match load_config("availability") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("availability") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect(&config).await?;
        let desk = front_desk(&config, pool.clone());
        let report = desk.check_availability(start_date, end_date).await;
        pool.close().await;
        report.map_err(operation_failure)
    });

    match result {
        Ok(report) => {
            let message = if report.rooms.is_empty() {
                "No rooms available for these dates.".to_string()
            } else {
                report
                    .rooms
                    .iter()
                    .map(|room| {
                        format!(
                            "- Room {} ({}) - {} {:.2} (Cap: {})",
                            room.room_number,
                            room.room_type,
                            config.hotel.currency,
                            room.nightly_rate,
                            room.capacity
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            CommandResult::success_with_data("availability", message, to_data(&report))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("availability", error_class, message, exit_code)
        }
    }
}
