use crate::domain::error::HandlerError;
use crate::domain::StoredObjectDescriptor;
use bytes::Bytes;

pub(crate) mod bucket_repository;

/// Blob upload capability the handler writes images to.
pub trait ObjectStore {
    async fn upload(
        &self,
        descriptor: &StoredObjectDescriptor,
        bytes: Bytes,
    ) -> Result<(), HandlerError>;
}
