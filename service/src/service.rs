use crate::client::ImageSource;
use crate::config::Config;
use crate::domain::error::HandlerError;
use crate::domain::server_timing::ServerTiming;
use crate::domain::StoredObjectDescriptor;
use crate::observability::{step_span, traced};
use crate::repository::ObjectStore;
use bytes::Bytes;
use std::time::Instant;
use tracing::{debug, info};

/// A fetched image after it has been written to the bucket.
#[derive(Debug)]
pub struct ImageData {
    pub body: Bytes,
    pub stored: StoredObjectDescriptor,
    pub server_timing: ServerTiming,
}

pub type InternalResponse = Result<ImageData, HandlerError>;

/// Fetch a random dog, download it and store it. Steps run strictly in order
/// and the first failure ends the invocation.
pub async fn process_dog<S, O>(config: &Config, source: &S, store: &O) -> InternalResponse
where
    S: ImageSource,
    O: ObjectStore,
{
    let process_timer = Instant::now();
    let mut server_timing = ServerTiming::new();

    let timer = Instant::now();
    let image = traced(step_span!("call_dog_api"), source.random_image()).await?;
    server_timing.stop("dog_api", timer);

    let timer = Instant::now();
    let body = source.download(&image).await?;
    server_timing.stop("download", timer);
    debug!("Downloaded {} ({} bytes)", image.file_name, body.len());

    let timer = Instant::now();
    let stored = traced(step_span!("save_dog_to_s3"), async {
        let descriptor = StoredObjectDescriptor::for_image(&config.bucket_name, &image)?;
        store.upload(&descriptor, body.clone()).await?;
        Ok::<_, HandlerError>(descriptor)
    })
    .await?;
    server_timing.stop("s3", timer);

    info!(
        "Success {} ms: stored {} as {} in {}",
        process_timer.elapsed().as_millis(),
        stored.key,
        stored.content_type,
        stored.bucket_name
    );
    Ok(ImageData {
        body,
        stored,
        server_timing,
    })
}
