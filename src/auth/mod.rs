//! Authentication Module
//!
//! Token issuance and validation, session continuity, login operations and
//! the external identity exchange.
//!
//! # Architecture
//!
//! - **`tokens`** - the token codec: signed, expiring JWTs with a strict
//!   `Expired`/`Malformed` split
//! - **`sessions`** - the session/refresh manager and the authorization
//!   decision (`require_superuser`, `require_owner_or_superuser`)
//! - **`password`** - bcrypt hash/verify and the registration password
//!   policy
//! - **`service`** - `login_with_password` and
//!   `login_with_external_identity`
//! - **`provider`** - Yandex.ID code exchange and profile fetch
//! - **`handlers`** - the HTTP surface for the above
//!
//! # Session Continuity
//!
//! Logins issue three tokens: a short-lived access token (cookie), a
//! longer-lived refresh token (persisted on the user record, single active
//! value, no rotation) and a signed session-reference token (second
//! cookie). When the access token expires, the session manager uses the
//! session reference to find the candidate user and independently verifies
//! the stored refresh token before issuing a replacement access token.
//! When the refresh token has expired too, the caller gets
//! `SessionExpired` and must log in again.

pub mod handlers;
pub mod password;
pub mod provider;
pub mod service;
pub mod sessions;
pub mod tokens;

pub use sessions::{require_owner_or_superuser, require_superuser, resolve_identity};
pub use tokens::{Claims, TokenError};
