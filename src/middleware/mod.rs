//! Request-processing middleware.
//!
//! Currently only the authentication middleware and its extractors.

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser, Superuser};
