//! audiofile - user-account and media-file management backend
//!
//! An Axum HTTP backend providing registration, password and Yandex.ID
//! login, token-based session continuity and per-user audio file uploads.
//!
//! # Module Structure
//!
//! - **`auth`** - token codec, session/refresh manager, authorization
//!   decision, login operations, identity-provider exchange
//! - **`users`** - identity model, store and CRUD endpoints
//! - **`files`** - audio upload storage and bookkeeping
//! - **`middleware`** - the authentication gate in front of protected
//!   routes
//! - **`routes`** - router assembly
//! - **`server`** - configuration, state, initialization
//! - **`error`** - error taxonomy and HTTP mapping
//!
//! # Authentication Flow
//!
//! 1. **Login** (password or Yandex.ID) issues a short-lived access token
//!    and a long-lived refresh token; the access token travels in an
//!    HTTP-only cookie, the refresh token is persisted on the user record.
//! 2. **Protected requests** are resolved by the session manager: a valid
//!    access token authenticates directly; an expired one triggers a
//!    silent renewal against the stored refresh token; anything malformed
//!    is rejected outright.
//! 3. **Expiry of both** tokens yields a distinct `SessionExpired` error
//!    so clients know a fresh login is required.

pub mod auth;
pub mod error;
pub mod files;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod users;
