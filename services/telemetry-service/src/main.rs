mod app;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod state;
mod store;
mod validation;

use std::sync::Arc;

use tokio_postgres::NoTls;
use vanitygen_common::{bind_listener, init_tracing, shutdown_signal};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::PostgresTelemetryStore;

#[tokio::main]
async fn main() {
    let guards = init_tracing("telemetry-service");
    tracing::debug!(file_logging = guards.file_logging(), "tracing initialised");

    if let Err(err) = run().await {
        tracing::error!(error = %err, "telemetry-service failed");
        drop(guards);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServiceError> {
    let config = ServiceConfig::from_env()?;

    let (db, connection) = config
        .database
        .connect(NoTls)
        .await
        .map_err(ServiceError::Connect)?;
    tokio::spawn(async move {
        // Drive the connection in the background.
        if let Err(err) = connection.await {
            tracing::error!(error = %err, "database connection error");
        }
    });

    let state = AppState::new(Arc::new(PostgresTelemetryStore::new(db)));
    let app = app::build_router(state);
    let listener = bind_listener(config.port).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
