/**
 * Backend Error Types
 *
 * This module defines the error types used across the backend. Auth and
 * handler code returns `AuthError`; the identity/file stores return
 * `StoreError`, which `AuthError` wraps at the handler boundary.
 */

use thiserror::Error;

/// Persistence-layer errors.
///
/// `UniqueViolation` is split out from the generic database error because
/// unique-email and unique-filename conflicts surface to users as 400s,
/// while everything else is a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated (duplicate email, duplicate
    /// filename per user).
    #[error("duplicate key value violates unique constraint")]
    UniqueViolation,

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify an sqlx error, pulling unique-constraint conflicts out
    /// into their own variant.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::UniqueViolation,
            _ => Self::Database(err),
        }
    }
}

/// Authentication, authorization and request errors.
///
/// Every failure the core can produce is an explicit variant here; handlers
/// propagate them with `?` and the `IntoResponse` impl in
/// `error::conversion` maps them to status codes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential, or a credential that cannot be trusted (malformed
    /// token, unknown subject, missing session reference).
    #[error("User not authorized")]
    Unauthenticated,

    /// The access token expired and the stored refresh credential has
    /// expired too. The client must perform a full login, not a retry.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Authenticated but not permitted.
    #[error("Not enough rights")]
    Forbidden,

    /// No user with the given email.
    #[error("The user with the username: {0} not found")]
    UserNotFound(String),

    /// Wrong password, or a password login against an identity provisioned
    /// without one.
    #[error("Error password for login")]
    InvalidCredentials,

    /// Registration attempted with an email that is already taken.
    #[error("The email address is already in use")]
    EmailInUse,

    /// An update collided with the unique-email constraint.
    #[error("Duplicate email")]
    DuplicateEmail,

    /// The upstream identity provider rejected the exchange. Propagated,
    /// never retried.
    #[error("Identity provider exchange failed: {0}")]
    ExchangeFailed(String),

    /// Request payload failed validation (bad email, weak password,
    /// unsupported file format).
    #[error("{0}")]
    InvalidData(String),

    /// A referenced resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Token signing failure. Decode failures never reach here; they are
    /// mapped to `Unauthenticated`/`SessionExpired` by the session manager.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure.
    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
