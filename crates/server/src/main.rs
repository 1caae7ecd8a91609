mod api;
mod bootstrap;
mod documents;
mod health;
mod notifier;
mod scheduler;

use std::time::Duration;

use anyhow::Result;
use hotelier_core::config::{AppConfig, LoadOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use hotelier_core::config::LogFormat::*;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging must be up before bootstrap emits its first event.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let report_task = app.config.reports.enabled.then(|| {
        scheduler::spawn(
            app.desk.clone(),
            app.renderer.clone(),
            app.config.reports.output_dir.clone(),
            app.config.reports.daily_hour,
        )
    });

    let router = api::router(app.api_state()).merge(health::router(app.db_pool.clone()));
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        bind_address = %address,
        reports_enabled = app.config.reports.enabled,
        "hotelier-server listening"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;
    info!(event_name = "system.server.stopping", "hotelier-server stopping");

    if let Some(task) = report_task {
        task.abort();
    }

    // Dropping the last dispatcher handle lets the notification consumer drain and exit.
    let bootstrap::Application { config, db_pool, desk, agent, renderer, notifier_task } = app;
    drop(agent);
    drop(desk);
    drop(renderer);

    let grace = Duration::from_secs(config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, notifier_task).await {
        Ok(_) => info!(event_name = "system.notifier.drained", "notification queue drained"),
        Err(_) => warn!(
            event_name = "system.notifier.drain_timeout",
            grace_secs = grace.as_secs(),
            "notification queue not drained before shutdown"
        ),
    }

    db_pool.close().await;
    info!(event_name = "system.server.stopped", "hotelier-server stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "ctrl-c handler unavailable; serving until killed");
        std::future::pending::<()>().await;
    }
}
