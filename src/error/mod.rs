//! Error Types
//!
//! This module defines the error taxonomy for the backend and its
//! conversion to HTTP responses.
//!
//! - **`types`** - `AuthError` (auth/API errors) and `StoreError`
//!   (persistence errors)
//! - **`conversion`** - `IntoResponse` implementation mapping errors to
//!   status codes and JSON bodies
//!
//! The distinction that matters most here is between `Unauthenticated`
//! (no usable credential, log in) and `SessionExpired` (refresh credential
//! also expired, a full login is required). Both map to 401 but carry
//! different detail messages so clients can tell them apart.

pub mod conversion;
pub mod types;

pub use types::{AuthError, StoreError};
