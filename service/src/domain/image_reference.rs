use crate::domain::error::HandlerError;
use crate::domain::error::HandlerError::DogApiError;
use serde::Deserialize;

/// Body of the dog API's random image endpoint.
#[derive(Debug, Deserialize)]
pub struct DogApiResponse {
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub source_url: String,
    pub file_name: String,
}

impl ImageReference {
    /// The file name is everything after the last `/`, taken verbatim.
    pub fn from_url(url: &str) -> Result<ImageReference, HandlerError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| DogApiError {
            reason: format!("image URL {url:?} is not absolute: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DogApiError {
                reason: format!("image URL {url:?} is not http(s)"),
            });
        }
        let file_name = url.rsplit('/').next().unwrap_or_default().to_string();
        Ok(ImageReference {
            source_url: url.to_string(),
            file_name,
        })
    }
}

impl TryFrom<DogApiResponse> for ImageReference {
    type Error = HandlerError;

    fn try_from(response: DogApiResponse) -> Result<Self, Self::Error> {
        let message = response.message.ok_or_else(|| DogApiError {
            reason: format!(
                "response has no message field (status {})",
                response.status.as_deref().unwrap_or("missing")
            ),
        })?;
        ImageReference::from_url(&message)
    }
}
