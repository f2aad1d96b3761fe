use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

use crate::error::ErrorResponse;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
const PUBLIC_PREFIX: &str = "/uploads";
const SUBDIR: &str = "registry";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file was provided")]
    Missing,

    #[error("file is empty")]
    Empty,

    #[error("file is larger than {} MB", MAX_IMAGE_BYTES / 1024 / 1024)]
    TooLarge,

    #[error("unsupported image type; allowed: JPEG, PNG, WebP, GIF")]
    UnsupportedType,

    #[error("invalid upload: {0}")]
    Multipart(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            UploadError::Missing | UploadError::Empty | UploadError::Multipart(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
            }
            UploadError::TooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "too_large"),
            UploadError::UnsupportedType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type")
            }
            UploadError::Io(e) => {
                tracing::error!("Failed to store upload: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        let body = ErrorResponse {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Sniffs the real format from the leading bytes and returns its extension.
fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("jpg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("gif"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("webp"),
        _ => None,
    }
}

fn declared_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Content-addressed image storage under the upload dir. Identical uploads
/// land on the same file.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: upload_dir.into(),
        }
    }

    /// Validates and writes the image, returning the public URL path.
    pub async fn save(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge);
        }
        if let Some(name) = file_name {
            declared_extension(name).ok_or(UploadError::UnsupportedType)?;
        }
        let ext = sniff_extension(bytes).ok_or(UploadError::UnsupportedType)?;

        let hash = Sha256::digest(bytes);
        let stored_name = format!("{:x}.{}", hash, ext);
        let dir = self.root.join(SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&stored_name);
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, bytes).await?;
            tracing::info!("Stored image {} ({} bytes)", stored_name, bytes.len());
        }

        Ok(format!("{PUBLIC_PREFIX}/{SUBDIR}/{stored_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    fn store() -> ImageStore {
        ImageStore::new(std::env::temp_dir().join(format!("image-store-{}", uuid::Uuid::new_v4())))
    }

    #[test]
    fn test_sniff_extension() {
        assert_eq!(sniff_extension(PNG), Some("png"));
        assert_eq!(sniff_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("jpg"));
        assert_eq!(sniff_extension(b"GIF89a"), Some("gif"));
        assert_eq!(sniff_extension(b"RIFF\0\0\0\0WEBPVP8 "), Some("webp"));
        assert_eq!(sniff_extension(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_declared_extension() {
        assert_eq!(declared_extension("beach.JPG").as_deref(), Some("jpg"));
        assert_eq!(declared_extension("notes.txt"), None);
        assert_eq!(declared_extension("noextension"), None);
    }

    #[tokio::test]
    async fn test_identical_uploads_share_a_file() {
        let store = store();
        let first = store.save(Some("a.png"), PNG).await.unwrap();
        let second = store.save(Some("b.png"), PNG).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("/uploads/registry/"));
        assert!(first.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_rejects_bad_uploads() {
        let store = store();
        assert!(matches!(store.save(None, &[]).await, Err(UploadError::Empty)));
        assert!(matches!(
            store.save(Some("evil.exe"), PNG).await,
            Err(UploadError::UnsupportedType)
        ));
        assert!(matches!(
            store.save(Some("fake.png"), b"not really a png").await,
            Err(UploadError::UnsupportedType)
        ));
        let big = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(store.save(None, &big).await, Err(UploadError::TooLarge)));
    }
}
