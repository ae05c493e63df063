//! Serve command - Starts the HTTP server.

use tokio::time::Duration;
use tower_sessions::ExpiredDeletion;

use crate::api::{create_router, session_layer, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, SESSION_SWEEP_SECONDS};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let config = Config {
        server_host: args.host,
        server_port: args.port,
        ..config
    };

    // Connects and applies pending migrations
    let db = Database::connect(&config).await?;
    let session_store = db.session_store().await?;

    let sweeper = session_store.clone();
    let deletion_task = tokio::task::spawn(async move {
        if let Err(e) = sweeper
            .continuously_delete_expired(Duration::from_secs(SESSION_SWEEP_SECONDS))
            .await
        {
            tracing::error!("Expired session cleanup stopped: {}", e);
        }
    });

    let app_state = AppState::from_database(db);
    let app = create_router(app_state, session_layer(session_store, &config));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    let served = axum::serve(listener, app).await;
    deletion_task.abort();
    served.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
