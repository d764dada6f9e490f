use super::{ObjectStore, ObjectStoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use s3_utils::S3Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Process-local object store. URLs are built the same way as for S3.
pub struct InMemoryObjectStore {
    config: S3Config,
    objects: DashMap<String, StoredObject>,
}

impl InMemoryObjectStore {
    pub fn new(config: S3Config) -> Self {
        Self {
            config,
            objects: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|o| o.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new(S3Config {
            bucket: "post-attachments".to_string(),
            region: "local".to_string(),
            base_url: "memory://objects".to_string(),
            path_style: true,
        })
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        self.objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.config.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::attachment_key;

    #[tokio::test]
    async fn test_put_returns_public_url() {
        let store = InMemoryObjectStore::default();
        let key = attachment_key("p1", "u1", "report.pdf");

        let url = store
            .put(&key, b"%PDF".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert_eq!(url, "memory://objects/post-attachments/p1%2Fu1%2Freport.pdf");
        assert_eq!(store.get(&key).unwrap().content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryObjectStore::default();
        store.put("p1/a.txt", vec![1], "text/plain").await.unwrap();

        store.delete("p1/a.txt").await.unwrap();
        store.delete("p1/a.txt").await.unwrap();
        assert!(store.is_empty());
    }
}
