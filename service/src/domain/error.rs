use thiserror::Error;

/// Every way an invocation can fail. None of these are recovered from; they
/// surface to the runtime as an invocation error and to the caller as a 5xx.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Dog API call failed: {reason}")]
    DogApiError { reason: String },

    #[error("Image download from {url} failed: {reason}")]
    DownloadError { url: String, reason: String },

    #[error("Image at {url} exceeds the {limit} byte limit")]
    ImageTooLargeError { url: String, limit: usize },

    #[error("No content type known for {file_name}")]
    UnsupportedExtensionError { file_name: String },

    #[error("Could not store {key} in bucket {bucket}: {reason}")]
    StorageError {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Configuration {key} is invalid: {reason}")]
    MissingConfigError { key: &'static str, reason: String },
}

impl HandlerError {
    /// Short stable label, used as the span status message and log field.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::DogApiError { .. } => "dog_api",
            HandlerError::DownloadError { .. } => "download",
            HandlerError::ImageTooLargeError { .. } => "download",
            HandlerError::UnsupportedExtensionError { .. } => "unsupported_extension",
            HandlerError::StorageError { .. } => "storage",
            HandlerError::MissingConfigError { .. } => "config",
        }
    }
}
