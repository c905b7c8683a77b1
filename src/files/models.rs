/**
 * File Model
 *
 * Bookkeeping row for an uploaded media file. The bytes themselves live
 * under the configured upload directory; the row records the stored
 * filename, the path and the owning user. (filename, user_id) is unique.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredFile {
    pub id: Uuid,
    /// Stored filename (new name plus original extension).
    pub filename: String,
    /// Absolute or upload-dir-relative path the bytes were written to.
    pub path_file: String,
    /// Owning user.
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
}
