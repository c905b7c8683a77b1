/**
 * Credential Verifier
 *
 * bcrypt hashing and verification, plus the registration password policy.
 * Verification uses bcrypt's constant-time comparison.
 */

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Hash a plaintext password for storage.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    Ok(hash(plain, DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AuthError> {
    Ok(verify(plain, hashed)?)
}

/// Registration password policy: at least 8 characters with a lowercase
/// letter, an uppercase letter, a digit and a punctuation character.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_punctuation())
}
