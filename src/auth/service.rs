/**
 * Login Operations
 *
 * Password login and external-identity login share one tail: issue a fresh
 * access token, refresh token and session-reference token, persist the
 * refresh token onto the user record (overwriting any prior value), and
 * hand everything back to the transport layer for cookie-setting.
 *
 * Concurrent logins for the same user race on the refresh-token column on
 * a last-writer-wins basis; each login writes its own self-consistent
 * value, so no locking is needed.
 */

use crate::auth::password::verify_password;
use crate::auth::provider::ExternalProfile;
use crate::auth::tokens;
use crate::error::AuthError;
use crate::server::config::AppConfig;
use crate::users::models::{NewUser, User};
use crate::users::store::IdentityStore;

/// Everything a successful login produces.
#[derive(Debug)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Signed session-reference token for the renewal lookup.
    pub session_ref: String,
    pub user: User,
}

/// Authenticate with email and password.
///
/// # Errors
///
/// * `UserNotFound` - no user with that email
/// * `InvalidCredentials` - wrong password, or the identity was provisioned
///   externally and has no password at all
pub async fn login_with_password<S: IdentityStore>(
    store: &S,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Result<LoginTokens, AuthError> {
    tracing::info!("Password login for {}", email);

    let user = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;

    let hashed = user
        .hashed_password
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, hashed)? {
        tracing::warn!("Invalid password for {}", email);
        return Err(AuthError::InvalidCredentials);
    }

    issue_session(store, config, user).await
}

/// Authenticate with a profile obtained from the external identity
/// provider, provisioning a passwordless local identity on first sight.
///
/// A repeated exchange for the same email reuses the existing identity;
/// exactly one user exists per email.
pub async fn login_with_external_identity<S: IdentityStore>(
    store: &S,
    config: &AppConfig,
    profile: ExternalProfile,
) -> Result<LoginTokens, AuthError> {
    let user = match store.find_by_email(&profile.email).await? {
        Some(user) => user,
        None => {
            tracing::info!("User with email {} not found, creating", profile.email);
            store
                .insert(NewUser {
                    full_name: profile.display_name,
                    email: profile.email,
                    hashed_password: None,
                })
                .await?
        }
    };

    issue_session(store, config, user).await
}

/// Issue the three tokens for `user` and persist the refresh token.
async fn issue_session<S: IdentityStore>(
    store: &S,
    config: &AppConfig,
    user: User,
) -> Result<LoginTokens, AuthError> {
    let access_token = tokens::issue(&config.secret_key, user.id, config.access_token_ttl)?;
    let refresh_token = tokens::issue(&config.secret_key, user.id, config.refresh_token_ttl)?;
    let session_ref = tokens::issue(&config.secret_key, user.id, config.refresh_token_ttl)?;

    store.set_refresh_token(user.id, &refresh_token).await?;
    tracing::info!("Session issued for user {}", user.id);

    Ok(LoginTokens {
        access_token,
        refresh_token,
        session_ref,
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::test_support::test_config;
    use crate::users::store::memory::{test_user, MemoryStore};

    fn hashed(password: &str) -> String {
        // Minimum cost keeps the test suite fast.
        bcrypt::hash(password, 4).unwrap()
    }

    #[tokio::test]
    async fn login_with_correct_credentials_persists_refresh_token() {
        let store = MemoryStore::new();
        let config = test_config();
        let user = test_user("alice@example.com", Some(hashed("Passw0rd!")));
        let user_id = user.id;
        store.seed(user);

        let tokens = login_with_password(&store, &config, "alice@example.com", "Passw0rd!")
            .await
            .unwrap();

        assert_eq!(tokens.user.id, user_id);
        let stored = store.find_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(tokens.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_user_not_found() {
        let store = MemoryStore::new();
        let config = test_config();

        let err = login_with_password(&store, &config, "ghost@example.com", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let store = MemoryStore::new();
        let config = test_config();
        store.seed(test_user("alice@example.com", Some(hashed("Passw0rd!"))));

        let err = login_with_password(&store, &config, "alice@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn passwordless_identity_cannot_log_in_with_password() {
        let store = MemoryStore::new();
        let config = test_config();
        store.seed(test_user("oauth@example.com", None));

        let err = login_with_password(&store, &config, "oauth@example.com", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn relogin_overwrites_the_stored_refresh_token() {
        let store = MemoryStore::new();
        let config = test_config();
        let user = test_user("alice@example.com", Some(hashed("Passw0rd!")));
        let user_id = user.id;
        store.seed(user);

        let first = login_with_password(&store, &config, "alice@example.com", "Passw0rd!")
            .await
            .unwrap();
        // A second later so iat/exp differ and the tokens are distinct.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let second = login_with_password(&store, &config, "alice@example.com", "Passw0rd!")
            .await
            .unwrap();

        assert_ne!(first.refresh_token, second.refresh_token);
        let stored = store.find_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.refresh_token.as_deref(),
            Some(second.refresh_token.as_str())
        );
    }

    #[tokio::test]
    async fn external_login_provisions_exactly_one_passwordless_user() {
        let store = MemoryStore::new();
        let config = test_config();
        let profile = ExternalProfile {
            email: "yandex@example.com".to_string(),
            display_name: Some("Yandex User".to_string()),
        };

        let first = login_with_external_identity(&store, &config, profile.clone())
            .await
            .unwrap();
        assert_eq!(store.user_count(), 1);
        assert!(first.user.hashed_password.is_none());
        assert_eq!(first.user.full_name.as_deref(), Some("Yandex User"));

        // Second exchange reuses the same identity.
        let second = login_with_external_identity(&store, &config, profile)
            .await
            .unwrap();
        assert_eq!(store.user_count(), 1);
        assert_eq!(second.user.id, first.user.id);
    }
}
