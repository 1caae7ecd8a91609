use std::process::ExitCode;

fn main() -> ExitCode {
    hotelier_cli::run()
}
