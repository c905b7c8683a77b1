/**
 * Session Pages
 *
 * The cookie-clearing logout endpoint plus the two small HTML views that
 * depend on the session-reference cookie: the index and the post-login
 * welcome page.
 */

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::tokens;
use crate::middleware::auth::removal_cookie;
use crate::server::state::AppState;

/// Whether the request carries a decodable session reference.
fn has_session(state: &AppState, jar: &CookieJar) -> bool {
    jar.get(&state.config.session_cookie_name())
        .map(|c| tokens::decode_token(&state.config.secret_key, c.value()).is_ok())
        .unwrap_or(false)
}

/// `GET /` - home page, or straight to the welcome view for a live session.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    if has_session(&state, &jar) {
        return Redirect::to("/auth/welcome").into_response();
    }
    Html("<h1>API Load File</h1><p><a href=\"/auth/login/yandex\">Log in with Yandex.ID</a></p>")
        .into_response()
}

/// `GET /auth/welcome` - shown after login; bounces to `/` without a
/// session.
pub async fn welcome(State(state): State<AppState>, jar: CookieJar) -> Response {
    if !has_session(&state, &jar) {
        return Redirect::to("/").into_response();
    }
    Html("<h1>Welcome!</h1>").into_response()
}

/// `GET /auth/logout` - clears both credentials and redirects home.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar
        .remove(removal_cookie(&state.config.cookie_name))
        .remove(removal_cookie(&state.config.session_cookie_name()));

    tracing::info!("User logged out");
    (jar, Redirect::to("/"))
}
