/**
 * Session/Refresh Manager
 *
 * Resolves an inbound request's bearer credential into an authenticated
 * user, transparently renewing the access token from the stored refresh
 * credential when the access token has expired, and failing hard when both
 * are unusable.
 *
 * # Refresh Trigger
 *
 * The refresh path runs only when the access token decodes as `Expired` -
 * structurally valid and correctly signed, merely out of time. A
 * `Malformed` token never reaches it, so forged or garbage input cannot
 * steer the manager into consulting session state. The expired access
 * token itself authorizes nothing: the candidate user is named by the
 * signed session-reference token, and the stored refresh credential is
 * then verified independently.
 *
 * # Session Reference
 *
 * The session reference is a second signed token (same codec and key,
 * refresh lifetime) carrying the user id, set as its own HTTP-only cookie
 * at login. It replaces trusting a client-supplied plaintext id for the
 * refresh lookup.
 */

use uuid::Uuid;

use crate::auth::tokens::{self, TokenError};
use crate::error::AuthError;
use crate::server::config::AppConfig;
use crate::users::models::User;
use crate::users::store::IdentityStore;

/// Outcome of a successful identity resolution.
#[derive(Debug)]
pub struct ResolvedIdentity {
    pub user: User,
    /// Present when the access token was silently renewed; the transport
    /// layer must re-set the access cookie from it before responding.
    pub renewed_access_token: Option<String>,
}

/// Resolve the request's credentials into an authenticated user.
///
/// # Arguments
///
/// * `store` - identity store for subject lookups
/// * `config` - signing key and token lifetimes
/// * `access_token` - bearer credential from the cookie or header, if any
/// * `session_ref` - signed session-reference token, if any
///
/// # Errors
///
/// * `Unauthenticated` - no token, malformed token, unknown subject,
///   missing/invalid session reference, or missing/malformed stored
///   refresh credential
/// * `SessionExpired` - the access token and the stored refresh credential
///   have both expired; the caller must perform a full login
pub async fn resolve_identity<S: IdentityStore>(
    store: &S,
    config: &AppConfig,
    access_token: Option<&str>,
    session_ref: Option<&str>,
) -> Result<ResolvedIdentity, AuthError> {
    let token = access_token.ok_or(AuthError::Unauthenticated)?;

    match tokens::decode_token(&config.secret_key, token) {
        Ok(claims) => {
            let user = store
                .find_by_id(claims.sub)
                .await?
                .ok_or(AuthError::Unauthenticated)?;
            Ok(ResolvedIdentity {
                user,
                renewed_access_token: None,
            })
        }
        Err(TokenError::Expired) => renew_access_token(store, config, session_ref).await,
        Err(TokenError::Malformed) => Err(AuthError::Unauthenticated),
    }
}

/// Silent renewal: identify the candidate from the session reference, then
/// independently verify the stored refresh credential before issuing a
/// replacement access token.
async fn renew_access_token<S: IdentityStore>(
    store: &S,
    config: &AppConfig,
    session_ref: Option<&str>,
) -> Result<ResolvedIdentity, AuthError> {
    let session_ref = session_ref.ok_or(AuthError::Unauthenticated)?;

    // The session reference is signed; any decode failure (including its
    // own expiry) means renewal is unavailable, not that the session
    // expired - that verdict belongs to the refresh credential below.
    let candidate = tokens::decode_token(&config.secret_key, session_ref)
        .map_err(|_| AuthError::Unauthenticated)?
        .sub;

    let user = store
        .find_by_id(candidate)
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    let refresh_token = user
        .refresh_token
        .as_deref()
        .ok_or(AuthError::Unauthenticated)?;

    let refresh_claims = match tokens::decode_token(&config.secret_key, refresh_token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            tracing::info!("Refresh credential expired for user {}", user.id);
            return Err(AuthError::SessionExpired);
        }
        Err(TokenError::Malformed) => return Err(AuthError::Unauthenticated),
    };

    // The stored credential must still name the same subject.
    if refresh_claims.sub != user.id {
        return Err(AuthError::Unauthenticated);
    }

    let new_access = tokens::issue(&config.secret_key, user.id, config.access_token_ttl)?;
    tracing::info!("Access token renewed for user {}", user.id);

    Ok(ResolvedIdentity {
        user,
        renewed_access_token: Some(new_access),
    })
}

/// Fail with `Forbidden` unless the user is a superuser.
pub fn require_superuser(user: &User) -> Result<(), AuthError> {
    if user.is_superuser {
        Ok(())
    } else {
        tracing::warn!("User {} is not an administrator", user.id);
        Err(AuthError::Forbidden)
    }
}

/// Fail with `Forbidden` unless the user owns the target resource or is a
/// superuser.
pub fn require_owner_or_superuser(user: &User, target_id: Uuid) -> Result<(), AuthError> {
    if user.id == target_id || user.is_superuser {
        Ok(())
    } else {
        tracing::warn!(
            "User {} denied access to resource owned by {}",
            user.id,
            target_id
        );
        Err(AuthError::Forbidden)
    }
}
