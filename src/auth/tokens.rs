/**
 * Token Codec
 *
 * Signed, expiring bearer tokens (JWT, HMAC-SHA256) carrying a subject
 * identifier. The codec is pure: issuance and decoding depend only on the
 * signing key, the clock and the inputs, so both are safe under unbounded
 * concurrency.
 *
 * # Error Contract
 *
 * `decode` distinguishes exactly two failures:
 *
 * - `TokenError::Expired` - the token is structurally valid and correctly
 *   signed but its `exp` has passed. Only this failure authorizes the
 *   session manager to attempt a silent refresh.
 * - `TokenError::Malformed` - everything else: garbage input, wrong shape,
 *   bad signature. Malformed input never triggers the refresh path.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims carried by access, refresh and session-reference tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id the token was issued for.
    pub sub: Uuid,
    /// Issued-at time (unix seconds).
    pub iat: i64,
    /// Expiration time (unix seconds).
    pub exp: i64,
}

/// Token decode failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Not a validly signed token of the expected shape.
    #[error("malformed token")]
    Malformed,

    /// Correctly signed, but `exp` has passed.
    #[error("token expired")]
    Expired,
}

/// Issue a signed token for `subject` expiring after `ttl`.
///
/// A negative `ttl` produces an already-expired (but correctly signed)
/// token, which is how tests exercise the expiry path.
pub fn issue(secret: &str, subject: Uuid, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject,
        iat: now,
        exp: now + ttl.num_seconds(),
    };

    let key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a token.
///
/// Expiry is checked with zero leeway so that the `Expired`/valid boundary
/// is exactly `exp <= now`.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_ref());
    let mut validation = Validation::default();
    validation.leeway = 0;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(err) => match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::Malformed),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn decode_returns_the_issued_subject() {
        let subject = Uuid::new_v4();
        let token = issue(SECRET, subject, Duration::minutes(30)).unwrap();

        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, subject);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_fails_with_expired_not_malformed() {
        let subject = Uuid::new_v4();
        let token = issue(SECRET, subject, Duration::seconds(-60)).unwrap();

        assert_eq!(decode_token(SECRET, &token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_fails_with_malformed() {
        assert_eq!(
            decode_token(SECRET, "not.a.token"),
            Err(TokenError::Malformed)
        );
        assert_eq!(decode_token(SECRET, ""), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_key_fails_with_malformed() {
        let token = issue(SECRET, Uuid::new_v4(), Duration::minutes(30)).unwrap();

        assert_eq!(
            decode_token("some-other-secret", &token),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn expired_token_under_wrong_key_is_malformed() {
        // Signature is checked before expiry: an attacker cannot steer a
        // forged token into the refresh path by backdating it.
        let token = issue("some-other-secret", Uuid::new_v4(), Duration::seconds(-60)).unwrap();

        assert_eq!(decode_token(SECRET, &token), Err(TokenError::Malformed));
    }
}
