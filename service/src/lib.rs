use config::Config;
use events::EventPublisher;
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sse::{Broadcaster, SseEventHandler};
use std::sync::Arc;
use tokio::time::Duration;

pub mod config;
pub mod logging;

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Database pool config: max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
        config.db_max_connections,
        config.db_min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
        config.db_idle_timeout_secs,
        config.db_max_lifetime_secs,
    );

    let mut opt = ConnectOptions::new::<&str>(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info)
        .set_schema_search_path("bookshelf"); // Setting default PostgreSQL schema

    let db = Database::connect(opt).await?;

    Ok(db)
}

// Service-level state containing infrastructure concerns.
// Needs to implement Clone to be able to be passed into Router as State.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub broadcaster: Arc<Broadcaster>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    /// Wires the SSE broadcaster into the event publisher so every book
    /// event published by the domain layer reaches connected subscribers.
    pub fn new(config: Config, db: &Arc<DatabaseConnection>) -> Self {
        let broadcaster = Arc::new(Broadcaster::new(
            config.sse_queue_capacity,
            config.sse_overflow_policy,
        ));
        let event_publisher = Arc::new(
            EventPublisher::new().with_handler(Arc::new(SseEventHandler::new(Arc::clone(
                &broadcaster,
            )))),
        );

        Self {
            database_connection: Arc::clone(db),
            config,
            broadcaster,
            event_publisher,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}
