//! Uploaded food photos.
//!
//! Images live as plain files in one directory that is also served
//! statically. Each upload gets a fresh name built from the current unix
//! milliseconds and a random suffix, keeping the original extension, so
//! concurrent uploads never collide on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::OrderError;
use crate::model::GenericError;

pub const MAX_EXTENSION_LEN: usize = 10;

/// An image received from a client, fully buffered and already checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(original_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Rejects anything whose declared type is not `image/*`.
pub fn check_content_type(content_type: Option<&str>) -> Result<String, OrderError> {
    let content_type = content_type.unwrap_or_default().trim().to_ascii_lowercase();
    let is_image = content_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty());

    if is_image {
        Ok(content_type)
    } else if content_type.is_empty() {
        Err(OrderError::UnsupportedMediaType("(none)".to_string()))
    } else {
        Err(OrderError::UnsupportedMediaType(content_type))
    }
}

fn sanitize_extension(raw: &str) -> Option<String> {
    let ext = raw.to_ascii_lowercase();
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

fn extension_for_content_type(content_type: &str) -> Option<String> {
    let subtype = content_type.strip_prefix("image/")?;
    let subtype = subtype.split(';').next().unwrap_or_default().trim();
    match subtype {
        "jpeg" | "pjpeg" => Some("jpg".to_string()),
        "svg+xml" => Some("svg".to_string()),
        "x-icon" | "vnd.microsoft.icon" => Some("ico".to_string()),
        other => sanitize_extension(other),
    }
}

/// Extension for the stored file: the original one if usable, otherwise one
/// derived from the content type.
pub fn file_extension(original_name: &str, content_type: &str) -> Option<String> {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(sanitize_extension)
        .or_else(|| extension_for_content_type(content_type))
}

pub fn generate_file_name(original_name: &str, content_type: &str) -> String {
    let stem = format!("{}-{}", Utc::now().timestamp_millis(), rand::random::<u32>());
    match file_extension(original_name, content_type) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// File-side seam of the order lifecycle.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Write the upload under a generated name and return that name
    async fn save(&self, upload: &ImageUpload) -> Result<String, GenericError>;

    /// Remove a stored file; a file that is already gone is not an error
    async fn remove(&self, file_name: &str) -> Result<(), GenericError>;

    async fn exists(&self, file_name: &str) -> Result<bool, GenericError>;

    /// Directory served under `/uploads`
    fn root(&self) -> PathBuf;
}

#[derive(Debug, Clone)]
pub struct DiskImageStorage {
    root: PathBuf,
}

impl DiskImageStorage {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, GenericError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!("Storing uploaded images in {}", root.display());
        Ok(Self { root })
    }

    /// Stored names are generated here, so anything that is not a bare file
    /// name did not come from us.
    fn path_for(&self, file_name: &str) -> Result<PathBuf, GenericError> {
        let is_bare = !file_name.is_empty()
            && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
        if !is_bare {
            return Err(format!("Invalid image file name: {file_name}").into());
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl ImageStorage for DiskImageStorage {
    async fn save(&self, upload: &ImageUpload) -> Result<String, GenericError> {
        let file_name = generate_file_name(&upload.original_name, &upload.content_type);
        let path = self.path_for(&file_name)?;
        tokio::fs::write(&path, &upload.bytes).await?;
        debug!(file = %file_name, bytes = upload.bytes.len(), "Stored image");
        Ok(file_name)
    }

    async fn remove(&self, file_name: &str) -> Result<(), GenericError> {
        let path = self.path_for(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = %file_name, "Removed image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(file = %file_name, "Image already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, file_name: &str) -> Result<bool, GenericError> {
        let path = self.path_for(file_name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    fn root(&self) -> PathBuf {
        self.root.clone()
    }
}
