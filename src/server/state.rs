/**
 * Application State
 *
 * Central state container shared across handlers. Everything in here is
 * cheap to clone: the pool and HTTP client are internally reference
 * counted, the configuration sits behind an `Arc` and is immutable for the
 * life of the process.
 */

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::provider::YandexClient;
use crate::server::config::AppConfig;
use crate::users::store::PgIdentityStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Raw pool, used by the file bookkeeping queries.
    pub pool: PgPool,
    /// Identity store over the same pool.
    pub store: PgIdentityStore,
    /// Immutable process configuration.
    pub config: Arc<AppConfig>,
    /// Yandex.ID exchange client.
    pub provider: YandexClient,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let provider = YandexClient::new(&config);
        Self {
            store: PgIdentityStore::new(pool.clone()),
            pool,
            config: Arc::new(config),
            provider,
        }
    }
}
