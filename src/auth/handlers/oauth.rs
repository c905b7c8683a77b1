/**
 * Yandex.ID Login Handlers
 *
 * `GET /auth/login/yandex` redirects the browser to the provider authorize
 * URL. `GET /auth/yandex` is the registered callback: it exchanges the
 * authorization code, fetches the profile, provisions or loads the local
 * identity (passwordless on first sight), issues the session tokens and
 * redirects to the welcome view with both cookies set.
 *
 * A rejected exchange surfaces as `ExchangeFailed` (400); it is never
 * retried here.
 */

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::handlers::types::CallbackParams;
use crate::auth::service::login_with_external_identity;
use crate::error::AuthError;
use crate::middleware::auth::access_cookie;
use crate::server::state::AppState;

/// Redirect to the provider authorize URL.
pub async fn yandex_login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.provider.authorize_url())
}

/// Provider callback: code exchange, profile fetch, local login.
pub async fn yandex_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let upstream = state.provider.exchange_code(&params.code).await?;
    let profile = state.provider.fetch_profile(&upstream).await?;

    let tokens = login_with_external_identity(&state.store, &state.config, profile).await?;

    let jar = jar
        .add(access_cookie(&state.config.cookie_name, &tokens.access_token))
        .add(access_cookie(
            &state.config.session_cookie_name(),
            &tokens.session_ref,
        ));

    tracing::info!("External login completed for {}", tokens.user.email);

    Ok((jar, Redirect::to("/auth/welcome")))
}
