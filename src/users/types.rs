/**
 * User API Types
 *
 * Request and response schemas for the users endpoints. `UserOut` is the
 * only shape that leaves the server; it never carries the password hash or
 * the refresh token.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::models::User;

/// New user payload for `POST /users/create`.
#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub full_name: String,
    pub email: String,
    /// Plaintext; hashed before storage.
    pub password: String,
}

/// Full update payload for `PUT /users/{id_user}`.
#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub full_name: String,
    pub email: String,
}

/// Partial update payload for `PATCH /users/{id_user}`.
#[derive(Debug, Deserialize)]
pub struct UserUpdatePartialRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// User shape returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserOut {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: String,
    /// Registration date, formatted like `01-Jan-2026`.
    pub registered_at: String,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            registered_at: user.registered_at.format("%d-%b-%Y").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn user_out_formats_the_registration_date() {
        let mut user = crate::users::store::memory::test_user("a@b.c", None);
        user.registered_at = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();

        let out = UserOut::from(&user);
        assert_eq!(out.registered_at, "05-Jan-2026");
        assert_eq!(out.email, "a@b.c");
    }
}
