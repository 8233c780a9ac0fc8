use crate::domain::error::HandlerError;
use crate::domain::error::HandlerError::StorageError;
use crate::domain::StoredObjectDescriptor;
use crate::repository::ObjectStore;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::time::Instant;
use tracing::{error, info, instrument};

/// `ObjectStore` writing to S3 with `PutObject`.
#[derive(Debug, Clone)]
pub struct BucketRepository {
    client: aws_sdk_s3::Client,
}

impl BucketRepository {
    pub fn new(client: aws_sdk_s3::Client) -> BucketRepository {
        BucketRepository { client }
    }
}

impl ObjectStore for BucketRepository {
    #[instrument(skip(self, bytes), fields(bucket = %descriptor.bucket_name, key = %descriptor.key))]
    async fn upload(
        &self,
        descriptor: &StoredObjectDescriptor,
        bytes: Bytes,
    ) -> Result<(), HandlerError> {
        let timer = Instant::now();
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&descriptor.bucket_name)
            .key(&descriptor.key)
            .content_type(&descriptor.content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                error!("Could not write {} to S3", descriptor.key);
                StorageError {
                    bucket: descriptor.bucket_name.clone(),
                    key: descriptor.key.clone(),
                    reason: DisplayErrorContext(&e).to_string(),
                }
            })?;
        info!(
            "S3 write took {} ms for {} ({size} bytes)",
            timer.elapsed().as_millis(),
            descriptor.key
        );
        Ok(())
    }
}
