//! Server Module
//!
//! Startup concerns: configuration loading, application state and
//! initialization.
//!
//! - **`config`** - immutable `AppConfig` loaded from the environment
//! - **`state`** - shared `AppState` (pool, store, config, provider)
//! - **`init`** - pool/migrations/router assembly

pub mod config;
pub mod init;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
