pub mod comments;
pub mod counters;
pub mod files;
pub mod likes;
pub mod ownership;
pub mod posts;

pub use comments::CommentService;
pub use counters::{Counter, CounterService};
pub use files::{dedupe_file_name, FileService};
pub use likes::LikeService;
pub use ownership::{assert_owner, Owned};
pub use posts::PostService;

use crate::error::{ServiceError, ServiceResult};

pub(crate) fn post_not_found(post_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("Post {} not found", post_id))
}

/// Reject values that are empty once surrounding whitespace is trimmed
pub(crate) fn require_non_blank(
    field: &'static str,
    value: &str,
    message: &str,
) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::invalid_input(field, message))
    } else {
        Ok(())
    }
}
