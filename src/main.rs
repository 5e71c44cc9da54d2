use log::*;
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let database_connection = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(err) => {
            error!("Failed to connect to the database: {err}");
            std::process::exit(1);
        }
    };

    // Bring the schema up to date before accepting any traffic.
    if let Err(err) = Migrator::up(database_connection.as_ref(), None).await {
        error!("Failed to run database migrations: {err}");
        std::process::exit(1);
    }

    let app_state = AppState::new(config, &database_connection);

    if let Err(err) = web::init_server(app_state).await {
        error!("Server exited with an error: {err}");
        std::process::exit(1);
    }
}
