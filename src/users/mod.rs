//! Users Module
//!
//! The persisted identity model, the identity store and the users HTTP API.
//!
//! - **`models`** - `User`, `NewUser`, `UserUpdate`
//! - **`store`** - the `IdentityStore` trait and its PostgreSQL
//!   implementation
//! - **`types`** - request/response schemas
//! - **`handlers`** - CRUD endpoints

pub mod handlers;
pub mod models;
pub mod store;
pub mod types;

pub use models::User;
pub use store::{IdentityStore, PgIdentityStore};
