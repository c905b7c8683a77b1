/**
 * User Model
 *
 * The persisted identity record. `hashed_password` is absent for users
 * provisioned through the external identity exchange; `refresh_token`
 * holds the single active refresh credential (overwritten on every login,
 * no rotation history).
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user in the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (UUID).
    pub id: Uuid,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Email address, globally unique as stored.
    pub email: String,
    /// bcrypt hash; `None` for externally provisioned identities.
    pub hashed_password: Option<String>,
    /// Whether the user passes superuser authorization gates.
    pub is_superuser: bool,
    /// Current refresh credential, if any.
    pub refresh_token: Option<String>,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Fields for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: Option<String>,
    pub email: String,
    /// Already hashed; `None` provisions a passwordless identity.
    pub hashed_password: Option<String>,
}

/// Fields for updating an existing user. `None` leaves a field untouched,
/// which is how PATCH semantics are expressed; PUT builds this with every
/// field set.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
}
