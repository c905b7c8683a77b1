/**
 * Router Configuration
 *
 * Assembles the full route table. The users and files routes sit behind
 * the authentication middleware; the login, OAuth and page routes are
 * public. Static assets are served from `static/`.
 *
 * # Routes
 *
 * ## Public
 * - `GET /` - home page
 * - `POST /token` - password login
 * - `GET /auth/login/yandex` - redirect to the provider
 * - `GET /auth/yandex` - provider callback
 * - `GET /auth/logout` - clear credentials
 * - `GET /auth/welcome` - post-login view
 *
 * ## Protected (auth middleware)
 * - `GET /users/list`, `GET /users/me`, `POST /users/create`
 * - `PUT|PATCH|DELETE /users/{id_user}`
 * - `POST /files/load`, `GET /files/list`
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::auth::handlers::{index, login, logout, welcome, yandex_callback, yandex_login};
use crate::files::handlers::{list_files, load_file};
use crate::middleware::auth::auth_middleware;
use crate::server::state::AppState;
use crate::users::handlers::{
    create_user, delete_user, get_me, list_users, patch_user, update_user,
};

/// Create the Axum router with all routes configured.
pub fn create_router(state: AppState) -> Router<()> {
    let protected = Router::new()
        .route("/users/list", get(list_users))
        .route("/users/me", get(get_me))
        .route("/users/create", post(create_user))
        .route(
            "/users/{id_user}",
            put(update_user).patch(patch_user).delete(delete_user),
        )
        .route("/files/load", post(load_file))
        .route("/files/list", get(list_files))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(index))
        .route("/token", post(login))
        .route("/auth/login/yandex", get(yandex_login))
        .route("/auth/yandex", get(yandex_callback))
        .route("/auth/logout", get(logout))
        .route("/auth/welcome", get(welcome))
        .merge(protected)
        .nest_service("/static", ServeDir::new("static"))
        .fallback(|| async { "404 Not Found" })
        .with_state(state)
}
