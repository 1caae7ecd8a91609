use std::sync::Arc;

use hotelier_agent::{AgentRuntime, OpenAiCompatibleClient, ToolRegistry};
use hotelier_core::clock::{Clock, SystemClock};
use hotelier_core::config::{AppConfig, ConfigError, LoadOptions};
use hotelier_core::notify::{NotificationDispatcher, NotifyError};
use hotelier_db::{
    connect_with_settings, migrations, DbPool, FrontDesk, RepositoryError, RoomInventory,
    SqlHotelRepository,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::ApiState;
use crate::documents::{DocumentRenderer, RenderError};
use crate::notifier;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub desk: Arc<FrontDesk>,
    pub agent: Arc<AgentRuntime>,
    pub renderer: Arc<DocumentRenderer>,
    /// Drains the notification queue; finishes once every dispatcher handle is dropped.
    pub notifier_task: JoinHandle<()>,
}

impl Application {
    pub fn api_state(&self) -> ApiState {
        ApiState {
            desk: Arc::clone(&self.desk),
            agent: Arc::clone(&self.agent),
            renderer: Arc::clone(&self.renderer),
            receipts_dir: self.config.reports.receipts_dir.clone(),
            output_dir: self.config.reports.output_dir.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("room inventory seed failed: {0}")]
    Seed(#[source] RepositoryError),
    #[error("notifier setup failed: {0}")]
    Notifier(#[source] NotifyError),
    #[error("llm client setup failed: {0}")]
    Llm(String),
    #[error("document templates failed to load: {0}")]
    Templates(#[source] RenderError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Must be called inside a tokio runtime; the notification consumer is spawned here.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let seeded = RoomInventory::load(&db_pool).await.map_err(BootstrapError::Seed)?;
    info!(
        event_name = "system.bootstrap.inventory_seeded",
        rooms_inserted = seeded.rooms_inserted,
        rooms_expected = seeded.rooms_expected,
        "room inventory ensured"
    );

    let notifier = notifier::from_config(&config).map_err(BootstrapError::Notifier)?;
    let notifier_name = notifier.name();
    let (dispatcher, notifier_task) =
        NotificationDispatcher::spawn(notifier, config.notifications.queue_capacity);
    info!(
        event_name = "system.bootstrap.notifier_started",
        notifier = notifier_name,
        queue_capacity = config.notifications.queue_capacity,
        "notification dispatcher started"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let desk = Arc::new(
        FrontDesk::new(
            Arc::new(SqlHotelRepository::new(db_pool.clone())),
            Arc::clone(&clock),
            Arc::new(dispatcher),
        )
        .with_currency(config.hotel.currency.clone()),
    );

    let llm = OpenAiCompatibleClient::from_config(&config.llm)
        .map_err(|error| BootstrapError::Llm(error.to_string()))?;
    let agent = AgentRuntime::new(Arc::new(llm), ToolRegistry::hotel(Arc::clone(&desk)), clock)
        .with_hotel_name(config.hotel.name.clone());
    info!(
        event_name = "system.bootstrap.agent_ready",
        provider = ?config.llm.provider,
        model = %config.llm.model,
        "assistant runtime ready"
    );

    let renderer =
        DocumentRenderer::embedded(config.hotel.name.clone(), config.hotel.currency.clone())
            .map_err(BootstrapError::Templates)?;

    Ok(Application {
        config,
        db_pool,
        desk,
        agent: Arc::new(agent),
        renderer: Arc::new(renderer),
        notifier_task,
    })
}
