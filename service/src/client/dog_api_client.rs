use crate::client::ImageSource;
use crate::config::Config;
use crate::domain::error::HandlerError;
use crate::domain::error::HandlerError::{DogApiError, DownloadError, ImageTooLargeError};
use crate::domain::image_reference::DogApiResponse;
use crate::domain::ImageReference;
use bytes::{Bytes, BytesMut};
use tracing::{debug, info, instrument};

/// `ImageSource` backed by the public dog API over HTTPS.
#[derive(Debug, Clone)]
pub struct DogApiClient {
    client: reqwest::Client,
    api_url: String,
    max_image_bytes: usize,
}

impl DogApiClient {
    pub fn new(config: &Config) -> Result<DogApiClient, reqwest::Error> {
        info!("Initializing dog API client.");
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(DogApiClient::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> DogApiClient {
        DogApiClient {
            client,
            api_url: config.dog_api_url.clone(),
            max_image_bytes: config.max_image_bytes,
        }
    }

    fn too_large(&self, image: &ImageReference) -> HandlerError {
        ImageTooLargeError {
            url: image.source_url.clone(),
            limit: self.max_image_bytes,
        }
    }
}

impl ImageSource for DogApiClient {
    #[instrument(skip(self), fields(api_url = %self.api_url))]
    async fn random_image(&self) -> Result<ImageReference, HandlerError> {
        let api_error = |e: reqwest::Error| DogApiError {
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(api_error)?;
        let body: DogApiResponse = response.json().await.map_err(api_error)?;

        let image = ImageReference::try_from(body)?;
        debug!("Dog API returned {}", image.source_url);
        Ok(image)
    }

    #[instrument(skip(self, image), fields(url = %image.source_url))]
    async fn download(&self, image: &ImageReference) -> Result<Bytes, HandlerError> {
        let download_error = |e: reqwest::Error| DownloadError {
            url: image.source_url.clone(),
            reason: e.to_string(),
        };
        let mut response = self
            .client
            .get(&image.source_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(download_error)?;

        let declared = response.content_length().unwrap_or(0);
        if declared > self.max_image_bytes as u64 {
            return Err(self.too_large(image));
        }

        let mut buffer = BytesMut::with_capacity(declared as usize);
        while let Some(chunk) = response.chunk().await.map_err(download_error)? {
            if buffer.len() + chunk.len() > self.max_image_bytes {
                return Err(self.too_large(image));
            }
            buffer.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes", buffer.len());
        Ok(buffer.freeze())
    }
}
