/**
 * File Upload Handler
 *
 * `POST /files/load?new_name_file=...` - authenticated multipart upload.
 * The file part's original filename must carry an accepted audio extension;
 * the bytes are stored as `<new_name_file>.<ext>` and a bookkeeping row is
 * recorded for the calling user.
 */

use axum::{
    extract::{Multipart, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AuthError, StoreError};
use crate::files::models::StoredFile;
use crate::files::{db, storage};
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoadParams {
    pub new_name_file: String,
}

/// `POST /files/load`
///
/// # Errors
///
/// * `400 Bad Request` - missing file part, unsupported format, or a
///   duplicate filename for this user
/// * `401 Unauthorized` - handled by the auth middleware
pub async fn load_file(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<LoadParams>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AuthError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuthError::InvalidData(e.to_string()))?
    {
        if let Some(filename) = field.file_name().map(|f| f.to_string()) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AuthError::InvalidData(e.to_string()))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (original_filename, bytes) =
        upload.ok_or_else(|| AuthError::InvalidData("no file in request".to_string()))?;

    let (filename, path) = storage::write_media_file(
        &state.config.upload_dir,
        &params.new_name_file,
        &original_filename,
        &bytes,
    )
    .await?;

    db::insert_file(&state.pool, user.id, &filename, &path.to_string_lossy())
        .await
        .map_err(|err| match err {
            StoreError::UniqueViolation => {
                AuthError::InvalidData(format!("file {filename} already exists"))
            }
            other => AuthError::Store(other),
        })?;

    Ok(Json(json!({ "response": "OK" })))
}

/// `GET /files/list` - the calling user's uploads, newest first.
pub async fn list_files(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<StoredFile>>, AuthError> {
    let files = db::list_files_for_user(&state.pool, user.id).await?;
    Ok(Json(files))
}
