use crate::domain::models::Like;
use crate::store::{DocumentStore, Query, Record, StoreResult};
use std::sync::Arc;

/// Repository for Like documents
#[derive(Clone)]
pub struct LikeRepository {
    store: Arc<dyn DocumentStore>,
}

impl LikeRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find the user's like on a post (equality on both fields, limit 1)
    pub async fn find(&self, post_id: &str, user_handle: &str) -> StoreResult<Option<Like>> {
        let query = Query::new()
            .where_eq("userHandle", user_handle)
            .where_eq("postId", post_id)
            .limit(1);
        match self.store.query(Like::COLLECTION, &query).await?.pop() {
            Some(doc) => Ok(Some(Like::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Insert under the pair's reserved key.
    ///
    /// Fails with `StoreError::AlreadyExists` when the pair already has a like.
    pub async fn create_unique(&self, post_id: &str, user_handle: &str) -> StoreResult<Like> {
        let like = Like {
            id: Like::key(post_id, user_handle),
            post_id: post_id.to_string(),
            user_handle: user_handle.to_string(),
        };
        self.store
            .create(Like::COLLECTION, &like.id, like.to_fields()?)
            .await?;
        Ok(like)
    }

    /// Returns whether this call removed the like
    pub async fn delete(&self, like_id: &str) -> StoreResult<bool> {
        self.store.delete(Like::COLLECTION, like_id).await
    }

    pub async fn count_for_post(&self, post_id: &str) -> StoreResult<usize> {
        let query = Query::new().where_eq("postId", post_id);
        Ok(self.store.query(Like::COLLECTION, &query).await?.len())
    }

    pub async fn delete_for_post(&self, post_id: &str) -> StoreResult<usize> {
        let query = Query::new().where_eq("postId", post_id);
        let mut deleted = 0;
        for doc in self.store.query(Like::COLLECTION, &query).await? {
            if self.store.delete(Like::COLLECTION, &doc.id).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
