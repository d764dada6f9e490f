use crate::domain::models::Post;
use crate::store::{
    Direction, DocumentStore, Fields, Precondition, Query, Record, StoreResult,
};
use std::sync::Arc;

/// Repository for Post documents
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn DocumentStore>,
}

impl PostRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert a post and return it with its store-assigned id
    pub async fn create(&self, post: &Post) -> StoreResult<Post> {
        let id = self.store.add(Post::COLLECTION, post.to_fields()?).await?;
        Ok(Post {
            id,
            ..post.clone()
        })
    }

    pub async fn get(&self, post_id: &str) -> StoreResult<Option<Post>> {
        Ok(self.get_versioned(post_id).await?.map(|(post, _)| post))
    }

    /// Fetch a post with the document version to guard a later write
    pub async fn get_versioned(&self, post_id: &str) -> StoreResult<Option<(Post, u64)>> {
        match self.store.get_by_id(Post::COLLECTION, post_id).await? {
            Some(doc) => {
                let version = doc.version;
                Ok(Some((Post::from_document(doc)?, version)))
            }
            None => Ok(None),
        }
    }

    /// All posts, newest first
    pub async fn list_recent(&self) -> StoreResult<Vec<Post>> {
        let query = Query::new().order_by("createdAt", Direction::Descending);
        self.store
            .query(Post::COLLECTION, &query)
            .await?
            .into_iter()
            .map(Post::from_document)
            .collect()
    }

    /// Partial merge of `fields` into the post
    pub async fn update(
        &self,
        post_id: &str,
        fields: Fields,
        precondition: Precondition,
    ) -> StoreResult<u64> {
        self.store
            .update(Post::COLLECTION, post_id, fields, precondition)
            .await
    }

    pub async fn delete(&self, post_id: &str) -> StoreResult<bool> {
        self.store.delete(Post::COLLECTION, post_id).await
    }
}
