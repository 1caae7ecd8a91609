pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "hotelier",
    about = "Hotelier operator CLI",
    long_about = "Prepare the hotel database, inspect availability and occupancy, and check runtime readiness.",
    after_help = "Examples:\n  hotelier seed\n  hotelier availability --start 2025-01-10 --end 2025-01-12\n  hotelier report --as-of 2025-01-10\n  hotelier doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Apply migrations and load the room inventory (idempotent)")]
    Seed,
    #[command(about = "List rooms free for every night of a stay")]
    Availability {
        #[arg(long, help = "Check-in date (YYYY-MM-DD)")]
        start: String,
        #[arg(long, help = "Check-out date (YYYY-MM-DD)")]
        end: String,
    },
    #[command(about = "Print daily occupancy and revenue stats without notifying anyone")]
    Report {
        #[arg(long, help = "Reference day (YYYY-MM-DD); defaults to today")]
        as_of: Option<String>,
    },
    #[command(about = "Validate config, LLM credentials, DB connectivity, and room inventory")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Availability { start, end } => commands::availability::run(&start, &end),
        Command::Report { as_of } => commands::report::run(as_of.as_deref()),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
