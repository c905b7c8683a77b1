/**
 * Authentication Middleware
 *
 * Gates every protected route. The middleware pulls the access token from
 * the HTTP-only cookie (falling back to an `Authorization: Bearer` header),
 * runs the session manager, and attaches the authenticated user to request
 * extensions. When the session manager silently renewed the access token,
 * the replacement cookie is set on the response before it leaves.
 *
 * Failures map through `AuthError`: 401 for `Unauthenticated` and
 * `SessionExpired` (distinct messages), 403 for `Forbidden` downstream.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, header::SET_COOKIE, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::sessions::{require_superuser, resolve_identity};
use crate::error::AuthError;
use crate::server::state::AppState;
use crate::users::models::User;

/// Authenticated user attached to request extensions by the middleware.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Build the HTTP-only access-token cookie.
pub fn access_cookie(name: &str, token: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Cookie used to clear a previously set credential.
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .build()
}

/// Access token from the cookie, or from a bearer header for non-browser
/// clients.
fn extract_access_token(jar: &CookieJar, headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Authentication middleware for protected routes.
///
/// 1. Extract the access token (cookie or bearer header) and the
///    session-reference cookie
/// 2. Resolve the identity through the session manager
/// 3. Attach `AuthenticatedUser` to request extensions
/// 4. If the access token was renewed, set the replacement cookie on the
///    response
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let access_token = extract_access_token(&jar, request.headers(), &state.config.cookie_name);
    let session_ref = jar
        .get(&state.config.session_cookie_name())
        .map(|c| c.value().to_string());

    let resolved = resolve_identity(
        &state.store,
        &state.config,
        access_token.as_deref(),
        session_ref.as_deref(),
    )
    .await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user: resolved.user,
    });

    let mut response = next.run(request).await;

    if let Some(token) = resolved.renewed_access_token {
        let cookie = access_cookie(&state.config.cookie_name, &token);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!("Failed to encode renewed access cookie: {:?}", e);
            }
        }
    }

    Ok(response)
}

/// Extractor for the authenticated user set by `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let authenticated = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                AuthError::Unauthenticated
            })?;

        Ok(AuthUser(authenticated.user))
    }
}

/// Extractor that additionally applies the superuser gate.
#[derive(Clone, Debug)]
pub struct Superuser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for Superuser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_superuser(&user)?;
        Ok(Superuser(user))
    }
}
