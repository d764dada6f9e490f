use crate::config::Config;
use crate::repository::{CommentRepository, FileRepository, LikeRepository, PostRepository};
use crate::services::{CommentService, CounterService, FileService, LikeService, PostService};
use crate::storage::ObjectStore;
use crate::store::DocumentStore;
use std::sync::Arc;

/// All engine services wired over one document store and one object store
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub files: FileService,
    pub counters: CounterService,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let post_repo = PostRepository::new(store.clone());
        let comment_repo = CommentRepository::new(store.clone());
        let like_repo = LikeRepository::new(store.clone());
        let file_repo = FileRepository::new(store);

        let counters = CounterService::new(
            post_repo.clone(),
            like_repo.clone(),
            comment_repo.clone(),
            config.counters.max_attempts,
        );
        let files = FileService::new(
            post_repo.clone(),
            file_repo,
            objects,
            config.uploads.denied_mime_types.clone(),
            config.counters.max_attempts,
        );
        let likes = LikeService::new(post_repo.clone(), like_repo.clone(), counters.clone());
        let comments =
            CommentService::new(post_repo.clone(), comment_repo.clone(), counters.clone());
        let posts = PostService::new(
            post_repo,
            comment_repo,
            like_repo,
            files.clone(),
            config.posts.cascade_delete,
        );

        Self {
            posts,
            comments,
            likes,
            files,
            counters,
        }
    }
}
