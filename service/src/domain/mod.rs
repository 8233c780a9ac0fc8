use crate::domain::error::HandlerError;
use crate::domain::error::HandlerError::UnsupportedExtensionError;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod error;
pub mod image_reference;
pub mod server_timing;

pub use image_reference::ImageReference;

/// Where and how a downloaded image is written to the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObjectDescriptor {
    pub bucket_name: String,
    pub key: String,
    pub content_type: String,
}

/// Lambda Function URL response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

pub trait ContentTypeProvider {
    fn content_type(&self) -> Result<String, HandlerError>;
}

impl ContentTypeProvider for ImageReference {
    /// Resolve the MIME type from the lowercase file extension. The upstream
    /// server's own `Content-Type` is never consulted.
    fn content_type(&self) -> Result<String, HandlerError> {
        let unsupported = || UnsupportedExtensionError {
            file_name: self.file_name.clone(),
        };
        let (_, extension) = self.file_name.rsplit_once('.').ok_or_else(unsupported)?;
        if extension.is_empty() {
            return Err(unsupported());
        }
        mime_guess::from_ext(&extension.to_lowercase())
            .first()
            .map(|mime| mime.essence_str().to_string())
            .ok_or_else(unsupported)
    }
}

impl StoredObjectDescriptor {
    pub fn for_image(bucket_name: &str, image: &ImageReference) -> Result<Self, HandlerError> {
        Ok(StoredObjectDescriptor {
            bucket_name: bucket_name.to_string(),
            key: image.file_name.clone(),
            content_type: image.content_type()?,
        })
    }
}
