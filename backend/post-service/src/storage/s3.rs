use super::{ObjectStore, ObjectStoreError};
use async_trait::async_trait;
use s3_utils::S3Operations;

/// Attachment storage in an S3 bucket
#[derive(Clone)]
pub struct S3ObjectStore {
    operations: S3Operations,
}

impl S3ObjectStore {
    pub fn new(operations: S3Operations) -> Self {
        Self { operations }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        Ok(self.operations.upload_file(key, bytes, content_type).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        Ok(self.operations.delete_file(key).await?)
    }
}
