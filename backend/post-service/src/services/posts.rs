/// Post service - post lifecycle: create, read, edit and delete
use crate::domain::models::{Actor, EditOutcome, NewPost, Post, PostDetail};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{CommentRepository, LikeRepository, PostRepository};
use crate::services::files::FileService;
use crate::services::ownership::assert_owner;
use crate::services::{post_not_found, require_non_blank};
use crate::store::{fields, Precondition, StoreError};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
    comments: CommentRepository,
    likes: LikeRepository,
    files: FileService,
    cascade_delete: bool,
}

impl PostService {
    pub fn new(
        posts: PostRepository,
        comments: CommentRepository,
        likes: LikeRepository,
        files: FileService,
        cascade_delete: bool,
    ) -> Self {
        Self {
            posts,
            comments,
            likes,
            files,
            cascade_delete,
        }
    }

    #[tracing::instrument(skip(self, new_post, actor), fields(actor = %actor.handle))]
    pub async fn create_post(&self, new_post: NewPost, actor: &Actor) -> ServiceResult<Post> {
        validate_content(&new_post.title, &new_post.body)?;

        let post = Post {
            id: String::new(),
            title: new_post.title,
            body: new_post.body,
            author_handle: actor.handle.clone(),
            author_image_url: actor.image_url.clone(),
            created_at: Utc::now(),
            like_count: 0,
            comment_count: 0,
            file_names: Vec::new(),
        };

        let post = self.posts.create(&post).await?;
        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list_recent().await?)
    }

    /// A post with its comments, newest first
    pub async fn get_post(&self, post_id: &str) -> ServiceResult<PostDetail> {
        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        let comments = self.comments.list_for_post(post_id).await?;
        Ok(PostDetail { post, comments })
    }

    /// Overwrite title and body. Counters, `createdAt` and `fileNames` are untouched.
    ///
    /// When both fields equal the stored values nothing is written and
    /// `EditOutcome::Unchanged` is returned.
    #[tracing::instrument(skip(self, title, body))]
    pub async fn edit_post(
        &self,
        post_id: &str,
        title: &str,
        body: &str,
    ) -> ServiceResult<EditOutcome> {
        validate_content(title, body)?;

        let mut post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;

        if post.title == title && post.body == body {
            return Ok(EditOutcome::Unchanged);
        }

        let update = fields([("title", json!(title)), ("body", json!(body))]);
        match self.posts.update(post_id, update, Precondition::None).await {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => return Err(post_not_found(post_id)),
            Err(e) => return Err(e.into()),
        }

        post.title = title.to_string();
        post.body = body.to_string();
        info!("post edited");
        Ok(EditOutcome::Updated(post))
    }

    /// Delete a post. Only its author may do so.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.handle))]
    pub async fn delete_post(&self, post_id: &str, actor: &Actor) -> ServiceResult<()> {
        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;

        assert_owner(&post, actor)?;

        if !self.posts.delete(post_id).await? {
            return Err(post_not_found(post_id));
        }
        info!("post deleted");

        if self.cascade_delete {
            self.delete_children(post_id).await.map_err(|err| {
                error!(error = %err, "cascade delete incomplete");
                ServiceError::DependencyFailure(format!(
                    "Post {} deleted but its likes, comments or files were not all removed",
                    post_id
                ))
            })?;
        }

        Ok(())
    }

    async fn delete_children(&self, post_id: &str) -> ServiceResult<()> {
        let likes = self.likes.delete_for_post(post_id).await?;
        let comments = self.comments.delete_for_post(post_id).await?;
        let files = self.files.purge_post_files(post_id).await?;
        info!(likes, comments, files, "removed post children");
        Ok(())
    }
}

fn validate_content(title: &str, body: &str) -> ServiceResult<()> {
    require_non_blank("title", title, "Title must not be empty")?;
    require_non_blank("body", body, "Body must not be empty")
}
