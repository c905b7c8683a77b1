/**
 * Media File Storage
 *
 * Writes uploaded audio files into the upload directory. Only a fixed set
 * of audio extensions is accepted; the stored name is the caller-chosen new
 * name with the original extension appended.
 */

use std::path::{Component, Path, PathBuf};

use crate::error::AuthError;

/// Accepted audio formats.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["mp3", "aac", "wav", "flac", "alac"];

/// A stored name must be a single plain path component. Anything with
/// separators or `..` would let the caller place the file outside the
/// upload directory.
fn is_safe_name(name: &str) -> bool {
    let mut parts = Path::new(name).components();
    matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\\')
}

/// The lowercased extension of `filename` if it is an accepted audio
/// format.
pub fn audio_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Write an uploaded file under `upload_dir` as `<new_name>.<ext>`.
///
/// Returns the stored filename and its full path.
///
/// # Errors
///
/// * `InvalidData` - `new_name` is empty or is not a single path component
/// * `InvalidData` - the original filename has no accepted audio extension
/// * `InvalidData` - the bytes could not be written
pub async fn write_media_file(
    upload_dir: &Path,
    new_name: &str,
    original_filename: &str,
    bytes: &[u8],
) -> Result<(String, PathBuf), AuthError> {
    tracing::info!("Start write file by name {}", new_name);

    if !is_safe_name(new_name) {
        tracing::warn!("rejected unsafe file name: {}", new_name);
        return Err(AuthError::InvalidData("invalid file name".to_string()));
    }

    let ext = audio_extension(original_filename).ok_or_else(|| {
        tracing::error!("invalid format file: {}", original_filename);
        AuthError::InvalidData("invalid format file".to_string())
    })?;

    let filename = format!("{new_name}.{ext}");
    let path = upload_dir.join(&filename);

    tokio::fs::write(&path, bytes).await.map_err(|e| {
        tracing::error!("Failed to write {}: {:?}", path.display(), e);
        AuthError::InvalidData(format!("failed to store file: {e}"))
    })?;

    Ok((filename, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_audio_extensions() {
        assert_eq!(audio_extension("song.mp3").as_deref(), Some("mp3"));
        assert_eq!(audio_extension("SONG.FLAC").as_deref(), Some("flac"));
        assert_eq!(audio_extension("notes.txt"), None);
        assert_eq!(audio_extension("archive.mp3.zip"), None);
        assert_eq!(audio_extension("noextension"), None);
    }

    #[tokio::test]
    async fn writes_under_the_new_name_with_original_extension() {
        let dir = tempfile::tempdir().unwrap();

        let (filename, path) = write_media_file(dir.path(), "renamed", "original.wav", b"RIFF")
            .await
            .unwrap();

        assert_eq!(filename, "renamed.wav");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"RIFF");
    }

    #[test]
    fn safe_names_are_single_plain_components() {
        assert!(is_safe_name("renamed"));
        assert!(is_safe_name("my.song"));

        assert!(!is_safe_name(""));
        assert!(!is_safe_name(".."));
        assert!(!is_safe_name("../escaped"));
        assert!(!is_safe_name("a/b"));
        assert!(!is_safe_name("/etc/cron.d/x"));
        assert!(!is_safe_name("..\\escaped"));
    }

    #[tokio::test]
    async fn rejects_names_that_leave_the_upload_dir() {
        let base = tempfile::tempdir().unwrap();
        let upload = base.path().join("upload");
        tokio::fs::create_dir(&upload).await.unwrap();

        let err = write_media_file(&upload, "../escaped", "song.mp3", b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidData(_)));

        // Nothing landed inside or next to the upload directory.
        assert_eq!(std::fs::read_dir(&upload).unwrap().count(), 0);
        assert!(!base.path().join("escaped.mp3").exists());
    }

    #[tokio::test]
    async fn rejects_non_audio_uploads() {
        let dir = tempfile::tempdir().unwrap();

        let err = write_media_file(dir.path(), "renamed", "malware.exe", b"MZ")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidData(_)));
        // Nothing was written.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
