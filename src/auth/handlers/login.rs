/**
 * Password Login Handler
 *
 * Implements `POST /token`. Verifies the email/password pair, issues the
 * session tokens, persists the refresh token and answers 202 with the
 * access token in the body and in an HTTP-only cookie (plus the
 * session-reference cookie used by silent renewal).
 *
 * # Errors
 *
 * * `400 Bad Request` - unknown email (`UserNotFound`) or wrong password
 *   (`InvalidCredentials`)
 * * `500 Internal Server Error` - database or token issuance failure
 */

use axum::{extract::State, http::StatusCode, response::Json, Form};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::auth::service::login_with_password;
use crate::error::AuthError;
use crate::middleware::auth::access_cookie;
use crate::server::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>), AuthError> {
    tracing::info!("Login request for {}", request.username);

    let tokens = login_with_password(
        &state.store,
        &state.config,
        &request.username,
        &request.password,
    )
    .await?;

    let jar = jar
        .add(access_cookie(&state.config.cookie_name, &tokens.access_token))
        .add(access_cookie(
            &state.config.session_cookie_name(),
            &tokens.session_ref,
        ));

    tracing::info!("User logged in successfully: {}", tokens.user.email);

    Ok((
        StatusCode::ACCEPTED,
        jar,
        Json(TokenResponse {
            access_token: tokens.access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}
