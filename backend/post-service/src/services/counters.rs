use crate::domain::models::Post;
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{CommentRepository, LikeRepository, PostRepository};
use crate::services::post_not_found;
use crate::store::{fields, Precondition, StoreError};
use serde_json::json;
use tracing::{debug, info};

/// Denormalized counters stored on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Comments,
}

impl Counter {
    pub fn field(self) -> &'static str {
        match self {
            Counter::Likes => "likeCount",
            Counter::Comments => "commentCount",
        }
    }

    fn get(self, post: &Post) -> u64 {
        match self {
            Counter::Likes => post.like_count,
            Counter::Comments => post.comment_count,
        }
    }

    fn set(self, post: &mut Post, value: u64) {
        match self {
            Counter::Likes => post.like_count = value,
            Counter::Comments => post.comment_count = value,
        }
    }
}

/// Keeps `likeCount`/`commentCount` in step with the like and comment records.
///
/// Every write is a read followed by a version-guarded update; a lost race
/// re-reads and tries again, so concurrent adjustments are never dropped.
/// Counters never go below zero.
#[derive(Clone)]
pub struct CounterService {
    posts: PostRepository,
    likes: LikeRepository,
    comments: CommentRepository,
    max_attempts: u32,
}

impl CounterService {
    pub fn new(
        posts: PostRepository,
        likes: LikeRepository,
        comments: CommentRepository,
        max_attempts: u32,
    ) -> Self {
        Self {
            posts,
            likes,
            comments,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn increment(&self, post_id: &str, counter: Counter) -> ServiceResult<Post> {
        self.adjust(post_id, counter, 1).await
    }

    pub async fn decrement(&self, post_id: &str, counter: Counter) -> ServiceResult<Post> {
        self.adjust(post_id, counter, -1).await
    }

    /// Apply `delta` to a counter and return the post as written
    #[tracing::instrument(skip(self))]
    pub async fn adjust(&self, post_id: &str, counter: Counter, delta: i64) -> ServiceResult<Post> {
        for attempt in 1..=self.max_attempts {
            let (mut post, version) = self
                .posts
                .get_versioned(post_id)
                .await?
                .ok_or_else(|| post_not_found(post_id))?;

            let current = counter.get(&post);
            let next = if delta >= 0 {
                current.saturating_add(delta.unsigned_abs())
            } else {
                current.saturating_sub(delta.unsigned_abs())
            };

            let update = fields([(counter.field(), json!(next))]);
            match self
                .posts
                .update(post_id, update, Precondition::Version(version))
                .await
            {
                Ok(_) => {
                    counter.set(&mut post, next);
                    return Ok(post);
                }
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(attempt, "counter write lost a race, retrying");
                }
                Err(StoreError::NotFound { .. }) => return Err(post_not_found(post_id)),
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::DependencyFailure(format!(
            "{} on post {} is contended, gave up after {} attempts",
            counter.field(),
            post_id,
            self.max_attempts
        )))
    }

    /// Recompute both counters from the like and comment records.
    ///
    /// Repairs a post left inconsistent by an uncompensated partial failure.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self, post_id: &str) -> ServiceResult<Post> {
        for attempt in 1..=self.max_attempts {
            let (mut post, version) = self
                .posts
                .get_versioned(post_id)
                .await?
                .ok_or_else(|| post_not_found(post_id))?;

            let like_count = self.likes.count_for_post(post_id).await? as u64;
            let comment_count = self.comments.count_for_post(post_id).await? as u64;

            if post.like_count == like_count && post.comment_count == comment_count {
                return Ok(post);
            }

            let update = fields([
                (Counter::Likes.field(), json!(like_count)),
                (Counter::Comments.field(), json!(comment_count)),
            ]);
            match self
                .posts
                .update(post_id, update, Precondition::Version(version))
                .await
            {
                Ok(_) => {
                    info!(
                        from_likes = post.like_count,
                        to_likes = like_count,
                        from_comments = post.comment_count,
                        to_comments = comment_count,
                        "reconciled post counters"
                    );
                    post.like_count = like_count;
                    post.comment_count = comment_count;
                    return Ok(post);
                }
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(attempt, "reconcile write lost a race, retrying");
                }
                Err(StoreError::NotFound { .. }) => return Err(post_not_found(post_id)),
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::DependencyFailure(format!(
            "counters on post {} are contended, gave up after {} attempts",
            post_id, self.max_attempts
        )))
    }
}
