//! Temporary storage for uploaded videos.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use stance_models::{sanitize_filename, UploadError, VideoExtension};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Preferred multipart field name for the video.
pub const VIDEO_FIELD: &str = "video_file";

/// An uploaded video on local disk, removed exactly once.
///
/// [`TempUpload::remove`] deletes the file and logs the outcome; if the
/// guard is dropped without that (error paths, cancellation, unwinding) the
/// file is removed on drop instead.
#[derive(Debug)]
pub struct TempUpload {
    file: Option<NamedTempFile>,
    path: PathBuf,
    original_name: String,
    extension: VideoExtension,
    size: u64,
}

impl TempUpload {
    /// Create an empty upload file named `<uuid>_<sanitized name>` in `dir`.
    pub fn create(dir: &Path, original_name: &str) -> ApiResult<Self> {
        let extension = VideoExtension::from_filename(original_name)?;
        let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));

        let file = tempfile::Builder::new()
            .prefix(&file_name)
            .rand_bytes(0)
            .tempfile_in(dir)
            .map_err(|e| ApiError::internal(format!("Failed to create upload file: {}", e)))?;

        Ok(Self {
            path: file.path().to_path_buf(),
            file: Some(file),
            original_name: original_name.to_string(),
            extension,
            size: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename as declared by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn extension(&self) -> VideoExtension {
        self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Stream a multipart field's body into the file.
    async fn write_field(&mut self, field: &mut Field<'_>) -> ApiResult<()> {
        let std_file = self
            .file
            .as_ref()
            .ok_or_else(|| ApiError::internal("Upload file already removed"))?
            .as_file()
            .try_clone()
            .map_err(|e| ApiError::internal(format!("Failed to open upload file: {}", e)))?;
        let mut out = tokio::fs::File::from_std(std_file);

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            out.write_all(&chunk)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;
            self.size += chunk.len() as u64;
        }
        out.flush()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;
        Ok(())
    }

    /// Delete the file now.
    pub fn remove(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        match file.close() {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary upload"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove temporary upload"),
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Read the video field of a multipart request into a [`TempUpload`].
///
/// The first field carrying a filename is taken. Its extension is checked
/// before any bytes are written.
pub async fn receive_upload(multipart: &mut Multipart, dir: &Path) -> ApiResult<TempUpload> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let file_name = field.file_name().map(str::to_string);
        let is_video_field = field.name() == Some(VIDEO_FIELD);

        let Some(file_name) = file_name.filter(|n| !n.trim().is_empty()) else {
            if is_video_field {
                return Err(UploadError::MissingFilename.into());
            }
            continue;
        };

        let mut upload = TempUpload::create(dir, &file_name)?;
        upload.write_field(&mut field).await?;
        debug!(
            file = %file_name,
            bytes = upload.size(),
            path = %upload.path().display(),
            "Stored upload"
        );
        return Ok(upload);
    }

    Err(ApiError::bad_request(format!(
        "No video file provided (expected multipart field '{}')",
        VIDEO_FIELD
    )))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_names_file_after_upload() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TempUpload::create(dir.path(), "My Dance.MOV").unwrap();

        let name = upload.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.ends_with("_My_Dance.MOV"), "got {name}");
        assert_eq!(upload.extension(), VideoExtension::Mov);
        assert_eq!(upload.original_name(), "My Dance.MOV");
        assert!(upload.path().exists());
    }

    #[test]
    fn test_rejects_unsupported_extension_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TempUpload::create(dir.path(), "clip.avi").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TempUpload::create(dir.path(), "a.mp4").unwrap();
        let path = upload.path().to_path_buf();
        upload.remove();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let upload = TempUpload::create(dir.path(), "a.mp4").unwrap();
            upload.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_concurrent_uploads_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempUpload::create(dir.path(), "same.mp4").unwrap();
        let b = TempUpload::create(dir.path(), "same.mp4").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
