/**
 * Users API Handlers
 *
 * User CRUD over the identity store. Listing and creation are superuser
 * operations; update and partial update are gated on ownership-or-superuser;
 * deletion requires a superuser.
 *
 * # Routes
 *
 * - `GET /users/list` - all users (superuser)
 * - `GET /users/me` - the calling user
 * - `POST /users/create` - create a user (superuser)
 * - `PUT /users/{id_user}` - full update (owner or superuser)
 * - `PATCH /users/{id_user}` - partial update (owner or superuser)
 * - `DELETE /users/{id_user}` - delete (superuser)
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::auth::password::{hash_password, is_valid_password};
use crate::auth::sessions::require_owner_or_superuser;
use crate::error::{AuthError, StoreError};
use crate::middleware::auth::{AuthUser, Superuser};
use crate::server::state::AppState;
use crate::users::models::{NewUser, User, UserUpdate};
use crate::users::store::IdentityStore;
use crate::users::types::{UserCreate, UserOut, UserUpdatePartialRequest, UserUpdateRequest};

/// `GET /users/list`
pub async fn list_users(
    State(state): State<AppState>,
    Superuser(_): Superuser,
) -> Result<Json<Vec<UserOut>>, AuthError> {
    let users = state.store.list().await?;
    Ok(Json(users.iter().map(UserOut::from).collect()))
}

/// `GET /users/me`
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserOut>, AuthError> {
    // Re-read through the store so the response reflects the current row,
    // not the snapshot taken at token validation.
    let user = state
        .store
        .find_by_email(&user.email)
        .await?
        .ok_or_else(|| AuthError::NotFound("User".to_string()))?;

    Ok(Json(UserOut::from(&user)))
}

/// `POST /users/create`
pub async fn create_user(
    State(state): State<AppState>,
    Superuser(_): Superuser,
    Json(new_user): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserOut>), AuthError> {
    tracing::info!("Create user request for {}", new_user.email);

    if !new_user.email.contains('@') {
        return Err(AuthError::InvalidData("Invalid email format".to_string()));
    }
    if !is_valid_password(&new_user.password) {
        return Err(AuthError::InvalidData("Invalid password".to_string()));
    }

    if state.store.find_by_email(&new_user.email).await?.is_some() {
        return Err(AuthError::EmailInUse);
    }

    let hashed_password = hash_password(&new_user.password)?;
    let user = state
        .store
        .insert(NewUser {
            full_name: Some(new_user.full_name),
            email: new_user.email,
            hashed_password: Some(hashed_password),
        })
        .await
        .map_err(|err| match err {
            // The pre-check races with concurrent inserts; the constraint
            // is authoritative.
            StoreError::UniqueViolation => AuthError::EmailInUse,
            other => AuthError::Store(other),
        })?;

    Ok((StatusCode::CREATED, Json(UserOut::from(&user))))
}

/// Resolve the target user of an update/delete, applying the
/// ownership-or-superuser gate.
async fn target_user(
    state: &AppState,
    caller: &User,
    id_user: Uuid,
) -> Result<User, AuthError> {
    require_owner_or_superuser(caller, id_user)?;

    state
        .store
        .find_by_id(id_user)
        .await?
        .ok_or_else(|| AuthError::NotFound(format!("User with id {id_user}")))
}

/// `PUT /users/{id_user}`
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id_user): Path<Uuid>,
    Json(update): Json<UserUpdateRequest>,
) -> Result<Json<UserOut>, AuthError> {
    let target = target_user(&state, &caller, id_user).await?;

    let updated = state
        .store
        .update(
            target.id,
            UserUpdate {
                full_name: Some(update.full_name),
                email: Some(update.email),
            },
        )
        .await
        .map_err(|err| match err {
            StoreError::UniqueViolation => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        })?;

    Ok(Json(UserOut::from(&updated)))
}

/// `PATCH /users/{id_user}`
pub async fn patch_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id_user): Path<Uuid>,
    Json(update): Json<UserUpdatePartialRequest>,
) -> Result<Json<UserOut>, AuthError> {
    let target = target_user(&state, &caller, id_user).await?;

    let updated = state
        .store
        .update(
            target.id,
            UserUpdate {
                full_name: update.full_name,
                email: update.email,
            },
        )
        .await
        .map_err(|err| match err {
            StoreError::UniqueViolation => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        })?;

    Ok(Json(UserOut::from(&updated)))
}

/// `DELETE /users/{id_user}`
pub async fn delete_user(
    State(state): State<AppState>,
    Superuser(caller): Superuser,
    Path(id_user): Path<Uuid>,
) -> Result<StatusCode, AuthError> {
    let target = target_user(&state, &caller, id_user).await?;
    state.store.delete(target.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
