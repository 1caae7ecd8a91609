use hotelier_core::dates::parse_calendar_date;
use hotelier_core::errors::ApplicationError;

use crate::commands::{
    connect, front_desk, load_config, operation_failure, runtime, to_data, CommandResult,
};

/// Prints the daily stats for `as_of` (default: today) without notifying anyone.
pub fn run(as_of: Option<&str>) -> CommandResult {
    let config = match load_config("report") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("report") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect(&config).await?;
        let desk = front_desk(&config, pool.clone());

        let stats = match as_of {
            Some(raw) => match parse_calendar_date("as_of", raw) {
                Ok(day) => desk.stats(day).await,
                Err(error) => Err(ApplicationError::from(error)),
            },
            None => desk.stats(desk.today()).await,
        };
        pool.close().await;
        stats.map_err(operation_failure)
    });

    match result {
        Ok(stats) => CommandResult::success_with_data(
            "report",
            stats.render_text(&config.hotel.currency),
            to_data(&stats),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("report", error_class, message, exit_code)
        }
    }
}
