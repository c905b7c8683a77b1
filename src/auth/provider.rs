/**
 * External Identity Exchange Adapter
 *
 * Exchanges a Yandex.ID authorization code for an upstream access token and
 * fetches the user profile (email, display name). Upstream rejections
 * surface as `ExchangeFailed` and are propagated, never retried.
 *
 * Base URLs are injectable so tests can point the client at a local mock
 * server.
 */

use serde::Deserialize;

use crate::error::AuthError;
use crate::server::config::AppConfig;

const YANDEX_OAUTH_BASE: &str = "https://oauth.yandex.ru";
const YANDEX_LOGIN_BASE: &str = "https://login.yandex.ru";

/// Upstream token returned by the code exchange.
#[derive(Debug, Deserialize)]
pub struct UpstreamToken {
    pub access_token: String,
}

/// Profile fields the backend cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub email: String,
    pub display_name: Option<String>,
}

/// Raw Yandex userinfo payload.
#[derive(Debug, Deserialize)]
struct YandexUserInfo {
    default_email: Option<String>,
    real_name: Option<String>,
}

/// HTTP client for the Yandex OAuth endpoints.
#[derive(Clone)]
pub struct YandexClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    oauth_base: String,
    login_base: String,
}

impl YandexClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_urls(config, YANDEX_OAUTH_BASE, YANDEX_LOGIN_BASE)
    }

    /// Construct against explicit base URLs (tests point these at a mock
    /// server).
    pub fn with_base_urls(config: &AppConfig, oauth_base: &str, login_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            oauth_base: oauth_base.trim_end_matches('/').to_string(),
            login_base: login_base.trim_end_matches('/').to_string(),
        }
    }

    /// Provider authorize URL the login endpoint redirects to.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?response_type=code&client_id={}&redirect_uri={}",
            self.oauth_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
        )
    }

    /// Exchange an authorization code for an upstream access token
    /// (client_secret_post authentication).
    pub async fn exchange_code(&self, code: &str) -> Result<UpstreamToken, AuthError> {
        tracing::info!("Start of user authentication by Yandex.ID");

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(format!("{}/token", self.oauth_base))
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Yandex token endpoint rejected the exchange: {}", status);
            return Err(AuthError::ExchangeFailed(format!(
                "token endpoint returned {status}"
            )));
        }

        response
            .json::<UpstreamToken>()
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))
    }

    /// Fetch the user profile with the upstream access token.
    pub async fn fetch_profile(&self, token: &UpstreamToken) -> Result<ExternalProfile, AuthError> {
        let response = self
            .http
            .get(format!("{}/info", self.login_base))
            .query(&[("format", "json")])
            .header("Authorization", format!("OAuth {}", token.access_token))
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Yandex userinfo endpoint failed: {}", status);
            return Err(AuthError::ExchangeFailed(format!(
                "userinfo endpoint returned {status}"
            )));
        }

        let info = response
            .json::<YandexUserInfo>()
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        let email = info
            .default_email
            .ok_or_else(|| AuthError::ExchangeFailed("profile has no email".to_string()))?;

        Ok(ExternalProfile {
            email,
            display_name: info.real_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::test_support::test_config;

    fn client_against(server: &mockito::ServerGuard) -> YandexClient {
        let config = test_config();
        YandexClient::with_base_urls(&config, &server.url(), &server.url())
    }

    #[test]
    fn authorize_url_carries_client_id_and_redirect() {
        let config = test_config();
        let client = YandexClient::new(&config);
        let url = client.authorize_url();
        assert!(url.starts_with("https://oauth.yandex.ru/authorize?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("response_type=code"));
    }

    #[tokio::test]
    async fn exchange_code_parses_upstream_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "upstream-token", "token_type": "bearer"}"#)
            .create_async()
            .await;

        let client = client_against(&server);
        let token = client.exchange_code("the-code").await.unwrap();
        assert_eq!(token.access_token, "upstream-token");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_exchange_is_exchange_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let client = client_against(&server);
        let err = client.exchange_code("bad-code").await.unwrap_err();
        assert!(matches!(err, AuthError::ExchangeFailed(_)));
    }

    #[tokio::test]
    async fn fetch_profile_maps_email_and_name() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/info?format=json")
            .match_header("authorization", "OAuth upstream-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"default_email": "user@yandex.ru", "real_name": "Real Name"}"#)
            .create_async()
            .await;

        let client = client_against(&server);
        let profile = client
            .fetch_profile(&UpstreamToken {
                access_token: "upstream-token".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(profile.email, "user@yandex.ru");
        assert_eq!(profile.display_name.as_deref(), Some("Real Name"));
    }

    #[tokio::test]
    async fn profile_without_email_is_exchange_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/info?format=json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"real_name": "No Email"}"#)
            .create_async()
            .await;

        let client = client_against(&server);
        let err = client
            .fetch_profile(&UpstreamToken {
                access_token: "t".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ExchangeFailed(_)));
    }
}
