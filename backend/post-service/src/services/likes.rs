use crate::domain::models::{Actor, Post};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{LikeRepository, PostRepository};
use crate::services::counters::{Counter, CounterService};
use crate::services::post_not_found;
use crate::store::StoreError;
use tracing::{info, warn};

/// Enforces one like per (user, post) and keeps `likeCount` in step.
///
/// Likes live under the reserved id `{post_id}:{user_handle}`, so two racing
/// `like` calls cannot both insert: the loser sees `AlreadyExists` and reports
/// `Conflict`. On `unlike` only the caller whose delete removed the record
/// decrements the counter.
#[derive(Clone)]
pub struct LikeService {
    posts: PostRepository,
    likes: LikeRepository,
    counters: CounterService,
}

impl LikeService {
    pub fn new(posts: PostRepository, likes: LikeRepository, counters: CounterService) -> Self {
        Self {
            posts,
            likes,
            counters,
        }
    }

    /// Check if user has liked a post
    pub async fn has_liked(&self, post_id: &str, user_handle: &str) -> ServiceResult<bool> {
        Ok(self.likes.find(post_id, user_handle).await?.is_some())
    }

    #[tracing::instrument(skip(self, actor), fields(actor = %actor.handle))]
    pub async fn like(&self, post_id: &str, actor: &Actor) -> ServiceResult<Post> {
        self.ensure_post(post_id).await?;

        if self.has_liked(post_id, &actor.handle).await? {
            return Err(already_liked(post_id));
        }

        let like = match self.likes.create_unique(post_id, &actor.handle).await {
            Ok(like) => like,
            Err(StoreError::AlreadyExists { .. }) => return Err(already_liked(post_id)),
            Err(e) => return Err(e.into()),
        };

        match self.counters.increment(post_id, Counter::Likes).await {
            Ok(post) => {
                info!(like_count = post.like_count, "post liked");
                Ok(post)
            }
            Err(err) => {
                if let Err(cleanup) = self.likes.delete(&like.id).await {
                    warn!(error = %cleanup, like_id = %like.id, "failed to remove like after counter failure");
                }
                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self, actor), fields(actor = %actor.handle))]
    pub async fn unlike(&self, post_id: &str, actor: &Actor) -> ServiceResult<Post> {
        self.ensure_post(post_id).await?;

        let like = self
            .likes
            .find(post_id, &actor.handle)
            .await?
            .ok_or_else(|| not_liked(post_id))?;

        if !self.likes.delete(&like.id).await? {
            // A concurrent unlike removed it first and owns the decrement
            return Err(not_liked(post_id));
        }

        let post = self.counters.decrement(post_id, Counter::Likes).await?;
        info!(like_count = post.like_count, "post unliked");
        Ok(post)
    }

    async fn ensure_post(&self, post_id: &str) -> ServiceResult<()> {
        match self.posts.get(post_id).await? {
            Some(_) => Ok(()),
            None => Err(post_not_found(post_id)),
        }
    }
}

fn already_liked(post_id: &str) -> ServiceError {
    ServiceError::Conflict(format!("Post {} already liked", post_id))
}

fn not_liked(post_id: &str) -> ServiceError {
    ServiceError::InvalidState(format!("Post {} not liked", post_id))
}
