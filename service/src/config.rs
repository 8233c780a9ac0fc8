use crate::domain::error::HandlerError;
use crate::domain::error::HandlerError::MissingConfigError;
use tracing::info;

pub const DOG_API_URL: &str = "https://dog.ceo/api/breeds/image/random";
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const BUCKET_NAME_KEY: &str = "BUCKET_NAME";
const DOG_API_URL_KEY: &str = "DOG_API_URL";
const MAX_IMAGE_BYTES_KEY: &str = "MAX_IMAGE_BYTES";

/// Settings read once at cold start and shared read-only by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bucket_name: String,
    pub dog_api_url: String,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Config, HandlerError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, HandlerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_name = lookup(BUCKET_NAME_KEY)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or(MissingConfigError {
                key: BUCKET_NAME_KEY,
                reason: "must be set to the target bucket".to_string(),
            })?;

        let dog_api_url = lookup(DOG_API_URL_KEY)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DOG_API_URL.to_string());

        let max_image_bytes = match lookup(MAX_IMAGE_BYTES_KEY) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|max| *max > 0)
                .ok_or(MissingConfigError {
                    key: MAX_IMAGE_BYTES_KEY,
                    reason: format!("expected a positive integer, got {raw:?}"),
                })?,
            None => MAX_IMAGE_BYTES,
        };

        info!("Config loaded for bucket {bucket_name}");
        Ok(Config {
            bucket_name,
            dog_api_url,
            max_image_bytes,
        })
    }
}
