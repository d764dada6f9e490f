/// Comment service - comment creation with its matching counter update
use crate::domain::models::{Actor, Comment};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{CommentRepository, PostRepository};
use crate::services::counters::{Counter, CounterService};
use crate::services::{post_not_found, require_non_blank};
use chrono::Utc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct CommentService {
    posts: PostRepository,
    comments: CommentRepository,
    counters: CounterService,
}

impl CommentService {
    pub fn new(
        posts: PostRepository,
        comments: CommentRepository,
        counters: CounterService,
    ) -> Self {
        Self {
            posts,
            comments,
            counters,
        }
    }

    /// Add a comment and bump the post's `commentCount` by one.
    ///
    /// The counter is written first. If the comment insert then fails the
    /// counter is decremented again and `DependencyFailure` is returned.
    #[tracing::instrument(skip(self, body, actor), fields(actor = %actor.handle))]
    pub async fn add_comment(
        &self,
        post_id: &str,
        body: &str,
        actor: &Actor,
    ) -> ServiceResult<Comment> {
        require_non_blank("body", body, "Comment must not be empty")?;

        let post = self.counters.increment(post_id, Counter::Comments).await?;

        let comment = Comment {
            id: String::new(),
            body: body.to_string(),
            created_at: Utc::now(),
            post_id: post_id.to_string(),
            author_handle: actor.handle.clone(),
            author_image_url: actor.image_url.clone(),
        };

        match self.comments.create(&comment).await {
            Ok(comment) => {
                info!(
                    comment_id = %comment.id,
                    comment_count = post.comment_count,
                    "comment added"
                );
                Ok(comment)
            }
            Err(err) => {
                error!(error = %err, "comment insert failed after counter increment");
                if let Err(undo) = self.counters.decrement(post_id, Counter::Comments).await {
                    warn!(error = %undo, "failed to roll back commentCount; post needs reconcile");
                }
                Err(ServiceError::DependencyFailure(format!(
                    "Comment on post {} could not be stored",
                    post_id
                )))
            }
        }
    }

    /// Comments on a post, newest first
    pub async fn list_comments(&self, post_id: &str) -> ServiceResult<Vec<Comment>> {
        if self.posts.get(post_id).await?.is_none() {
            return Err(post_not_found(post_id));
        }
        Ok(self.comments.list_for_post(post_id).await?)
    }
}
