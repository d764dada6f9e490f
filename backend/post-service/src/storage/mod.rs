//! Binary object storage for post attachments.

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod s3;

pub use memory::{InMemoryObjectStore, StoredObject};
pub use s3::S3ObjectStore;

#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("Object storage error: {0}")]
    Backend(String),
}

impl From<s3_utils::S3Error> for ObjectStoreError {
    fn from(err: s3_utils::S3Error) -> Self {
        ObjectStoreError::Backend(err.to_string())
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the public retrieval URL
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError>;

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

/// Key of an attachment object: `{post_id}/{upload_id}/{file_name}`.
///
/// `upload_id` is fresh per upload, so no two attaches write the same object.
pub fn attachment_key(post_id: &str, upload_id: &str, file_name: &str) -> String {
    format!("{}/{}/{}", post_id, upload_id, file_name)
}
