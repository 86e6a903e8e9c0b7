//! Streaming multipart uploads for company logos and claim documents.

use actix_multipart::Multipart;
use futures::StreamExt;
use log::{info, warn};
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::constants::{
    CODE_FILE_TOO_LARGE, CODE_FILE_UPLOAD_FAILED, CODE_INVALID_FILE_TYPE, ERR_FAILED_PROCESS_UPLOAD,
    ERR_FAILED_READ_FILE, ERR_FAILED_SAVE_FILE, ERR_FILE_TOO_LARGE, ERR_INVALID_FILE_TYPE,
    ERR_NO_FILE,
};
use crate::errors::ApiError;

/// Which form field to read, which content types to accept, and where to store them.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub field: &'static str,
    /// (content type, file extension)
    pub allowed: &'static [(&'static str, &'static str)],
    pub max_bytes: usize,
    pub subdir: &'static str,
}

pub const LOGO_UPLOAD: UploadPolicy = UploadPolicy {
    field: "logo",
    allowed: &[
        ("image/jpeg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
        ("image/svg+xml", "svg"),
    ],
    max_bytes: 2 * 1024 * 1024,
    subdir: "logos",
};

pub const DOCUMENT_UPLOAD: UploadPolicy = UploadPolicy {
    field: "document",
    allowed: &[
        ("image/jpeg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
        ("application/pdf", "pdf"),
    ],
    max_bytes: 10 * 1024 * 1024,
    subdir: "claims",
};

impl UploadPolicy {
    /// File extension for an accepted content type.
    pub fn extension_for(&self, content_type: Option<&str>) -> Result<&'static str, ApiError> {
        let content_type = content_type.unwrap_or_default();
        self.allowed
            .iter()
            .find(|(allowed, _)| *allowed == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                let accepted: Vec<&str> = self.allowed.iter().map(|(ct, _)| *ct).collect();
                ApiError::bad_request(
                    CODE_INVALID_FILE_TYPE,
                    format!("{}. Allowed types: {}", ERR_INVALID_FILE_TYPE, accepted.join(", ")),
                )
            })
    }

    pub fn check_size(&self, size: usize) -> Result<(), ApiError> {
        if size > self.max_bytes {
            return Err(ApiError::bad_request(
                CODE_FILE_TOO_LARGE,
                format!(
                    "{}. Maximum size is {}MB",
                    ERR_FILE_TOO_LARGE,
                    self.max_bytes / (1024 * 1024)
                ),
            ));
        }
        Ok(())
    }
}

pub struct FileService {
    upload_dir: PathBuf,
}

fn save_failed(e: std::io::Error) -> ApiError {
    warn!("Upload write failed: {}", e);
    ApiError::internal(ERR_FAILED_SAVE_FILE)
}

impl FileService {
    pub fn new() -> Self {
        Self {
            upload_dir: PathBuf::from(&CONFIG.upload_dir),
        }
    }

    /// Stream the policy's form field to disk and return its public URL
    /// (e.g. `/uploads/claims/<owner>_<uuid>.pdf`).
    pub async fn save_upload(
        &self,
        policy: &UploadPolicy,
        owner_id: &str,
        payload: &mut Multipart,
    ) -> Result<String, ApiError> {
        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|e| {
                warn!("Failed to process multipart field: {}", e);
                ApiError::bad_request(CODE_FILE_UPLOAD_FAILED, ERR_FAILED_PROCESS_UPLOAD)
            })?;

            let field_name = field
                .content_disposition()
                .and_then(|cd| cd.get_name())
                .unwrap_or("");
            if field_name != policy.field {
                continue;
            }

            let content_type = field.content_type().map(|ct| ct.essence_str().to_string());
            let extension = policy.extension_for(content_type.as_deref())?;

            let dir = self.upload_dir.join(policy.subdir);
            std::fs::create_dir_all(&dir).map_err(save_failed)?;

            let filename = format!("{}_{}.{}", owner_id, Uuid::new_v4(), extension);
            let filepath = dir.join(&filename);
            let mut file = std::fs::File::create(&filepath).map_err(save_failed)?;

            let mut total_size: usize = 0;
            while let Some(chunk) = field.next().await {
                let data = match chunk {
                    Ok(data) => data,
                    Err(e) => {
                        warn!("Failed to read chunk: {}", e);
                        let _ = std::fs::remove_file(&filepath);
                        return Err(ApiError::bad_request(
                            CODE_FILE_UPLOAD_FAILED,
                            ERR_FAILED_READ_FILE,
                        ));
                    }
                };

                total_size += data.len();
                if let Err(e) = policy.check_size(total_size) {
                    let _ = std::fs::remove_file(&filepath);
                    return Err(e);
                }

                if let Err(e) = file.write_all(&data) {
                    let _ = std::fs::remove_file(&filepath);
                    return Err(save_failed(e));
                }
            }

            info!("Stored {} upload ({} bytes) as {}", policy.field, total_size, filename);
            return Ok(format!("/uploads/{}/{}", policy.subdir, filename));
        }

        Err(ApiError::bad_request(
            CODE_FILE_UPLOAD_FAILED,
            format!("{}: '{}'", ERR_NO_FILE, policy.field),
        ))
    }

    /// Remove a previously stored upload. Unknown paths are ignored.
    pub fn delete_file(&self, url: &str) {
        let Some(relative) = url.strip_prefix("/uploads/") else {
            return;
        };
        if relative.contains("..") {
            return;
        }
        let path = self.upload_dir.join(relative);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to delete {}: {}", path.display(), e);
            }
        }
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_types() {
        assert_eq!(LOGO_UPLOAD.extension_for(Some("image/svg+xml")).unwrap(), "svg");
        assert_eq!(
            LOGO_UPLOAD.extension_for(Some("application/pdf")).unwrap_err().code(),
            CODE_INVALID_FILE_TYPE
        );
        assert!(LOGO_UPLOAD.extension_for(None).is_err());
    }

    #[test]
    fn test_document_types() {
        assert_eq!(DOCUMENT_UPLOAD.extension_for(Some("application/pdf")).unwrap(), "pdf");
        assert_eq!(DOCUMENT_UPLOAD.extension_for(Some("image/jpeg")).unwrap(), "jpg");
        assert!(DOCUMENT_UPLOAD.extension_for(Some("image/svg+xml")).is_err());
    }

    #[test]
    fn test_size_limits() {
        assert!(LOGO_UPLOAD.check_size(2 * 1024 * 1024).is_ok());
        assert_eq!(
            LOGO_UPLOAD.check_size(2 * 1024 * 1024 + 1).unwrap_err().code(),
            CODE_FILE_TOO_LARGE
        );
        assert!(DOCUMENT_UPLOAD.check_size(5 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_delete_ignores_foreign_paths() {
        let service = FileService {
            upload_dir: std::env::temp_dir().join("cargo-insure-test-uploads"),
        };
        service.delete_file("https://cdn.example.com/logo.png");
        service.delete_file("/uploads/../etc/passwd");
        service.delete_file("/uploads/logos/missing.png");
    }
}
