/**
 * Server Initialization
 *
 * Connects the database, runs migrations, prepares the upload directory
 * and assembles the router.
 *
 * Unlike configuration loading, none of these steps is optional: a backend
 * that cannot reach its database or write its upload directory should not
 * come up at all.
 */

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use crate::routes::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to create upload directory: {0}")]
    UploadDir(#[from] std::io::Error),
}

/// Create and configure the Axum application.
///
/// 1. Connect the PostgreSQL pool
/// 2. Run migrations
/// 3. Create the upload directory if missing
/// 4. Build `AppState` and the router
pub async fn create_app(config: AppConfig) -> Result<Router<()>, InitError> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("Upload directory ready at {}", config.upload_dir.display());

    let state = AppState::new(pool, config);
    Ok(create_router(state))
}
