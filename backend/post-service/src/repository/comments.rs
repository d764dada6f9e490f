use crate::domain::models::Comment;
use crate::store::{Direction, DocumentStore, Query, Record, StoreResult};
use std::sync::Arc;

/// Repository for Comment documents
#[derive(Clone)]
pub struct CommentRepository {
    store: Arc<dyn DocumentStore>,
}

impl CommentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, comment: &Comment) -> StoreResult<Comment> {
        let id = self
            .store
            .add(Comment::COLLECTION, comment.to_fields()?)
            .await?;
        Ok(Comment {
            id,
            ..comment.clone()
        })
    }

    /// Comments on a post, newest first
    pub async fn list_for_post(&self, post_id: &str) -> StoreResult<Vec<Comment>> {
        let query = Query::new()
            .where_eq("postId", post_id)
            .order_by("createdAt", Direction::Descending);
        self.store
            .query(Comment::COLLECTION, &query)
            .await?
            .into_iter()
            .map(Comment::from_document)
            .collect()
    }

    pub async fn count_for_post(&self, post_id: &str) -> StoreResult<usize> {
        let query = Query::new().where_eq("postId", post_id);
        Ok(self.store.query(Comment::COLLECTION, &query).await?.len())
    }

    /// Remove every comment on a post, returning how many were deleted
    pub async fn delete_for_post(&self, post_id: &str) -> StoreResult<usize> {
        let query = Query::new().where_eq("postId", post_id);
        let mut deleted = 0;
        for doc in self.store.query(Comment::COLLECTION, &query).await? {
            if self.store.delete(Comment::COLLECTION, &doc.id).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
