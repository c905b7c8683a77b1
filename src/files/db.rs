/**
 * File Bookkeeping Queries
 *
 * Database operations for uploaded-file records.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::files::models::StoredFile;

const FILE_COLUMNS: &str = "id, filename, path_file, user_id, registered_at";

/// Record an uploaded file for `user_id`. A duplicate (filename, user)
/// pair surfaces as `StoreError::UniqueViolation`.
pub async fn insert_file(
    pool: &PgPool,
    user_id: Uuid,
    filename: &str,
    path_file: &str,
) -> Result<StoredFile, StoreError> {
    tracing::info!("Recording file {} for user {}", filename, user_id);
    let file = sqlx::query_as::<_, StoredFile>(&format!(
        "INSERT INTO files (id, filename, path_file, user_id, registered_at) \
         VALUES ($1, $2, $3, $4, now()) \
         RETURNING {FILE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(filename)
    .bind(path_file)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from_sqlx)?;

    Ok(file)
}

/// Files owned by `user_id`, newest first.
pub async fn list_files_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<StoredFile>, StoreError> {
    let files = sqlx::query_as::<_, StoredFile>(&format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE user_id = $1 ORDER BY registered_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(StoreError::from_sqlx)?;

    Ok(files)
}
