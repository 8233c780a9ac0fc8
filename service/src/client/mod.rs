use crate::domain::error::HandlerError;
use crate::domain::ImageReference;
use bytes::Bytes;

pub mod dog_api_client;

/// Where random images come from.
pub trait ImageSource {
    /// Ask the upstream API for a random image and where to fetch it.
    async fn random_image(&self) -> Result<ImageReference, HandlerError>;

    /// Buffer the full image body in memory.
    async fn download(&self, image: &ImageReference) -> Result<Bytes, HandlerError>;
}
