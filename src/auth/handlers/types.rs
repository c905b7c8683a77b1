/**
 * Authentication Handler Types
 *
 * Request and response types for the login endpoints.
 */

use serde::{Deserialize, Serialize};

/// Password login form (`POST /token`).
///
/// The field is named `username` to match the OAuth2 password-grant form
/// shape, but it carries the user's email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// The user's email.
    pub username: String,
    /// Plaintext password, verified against the stored bcrypt hash.
    pub password: String,
}

/// Token response for a successful password login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Query parameters of the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code handed back by the provider.
    pub code: String,
}
