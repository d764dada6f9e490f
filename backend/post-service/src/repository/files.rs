use crate::domain::models::File;
use crate::store::{Direction, DocumentStore, Query, Record, StoreResult};
use std::sync::Arc;

/// Repository for the File registry
#[derive(Clone)]
pub struct FileRepository {
    store: Arc<dyn DocumentStore>,
}

impl FileRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, file: &File) -> StoreResult<File> {
        let id = self.store.add(File::COLLECTION, file.to_fields()?).await?;
        Ok(File {
            id,
            ..file.clone()
        })
    }

    pub async fn get(&self, file_id: &str) -> StoreResult<Option<File>> {
        match self.store.get_by_id(File::COLLECTION, file_id).await? {
            Some(doc) => Ok(Some(File::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Files attached to a post, oldest first
    pub async fn list_for_post(&self, post_id: &str) -> StoreResult<Vec<File>> {
        let query = Query::new()
            .where_eq("postId", post_id)
            .order_by("createdAt", Direction::Ascending);
        self.store
            .query(File::COLLECTION, &query)
            .await?
            .into_iter()
            .map(File::from_document)
            .collect()
    }

    pub async fn delete(&self, file_id: &str) -> StoreResult<bool> {
        self.store.delete(File::COLLECTION, file_id).await
    }
}
