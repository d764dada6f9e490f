use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated caller, as verified by the auth layer in front of the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub handle: String,
    pub image_url: String,
}

impl Actor {
    pub fn new(handle: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            image_url: image_url.into(),
        }
    }
}

/// Post entity with its denormalized like/comment counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_handle: String,
    pub author_image_url: String,
    pub created_at: DateTime<Utc>,
    pub like_count: u64,
    pub comment_count: u64,
    #[serde(default)]
    pub file_names: Vec<String>,
}

impl Record for Post {
    const COLLECTION: &'static str = "posts";
}

/// Comment entity - immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub post_id: String,
    pub author_handle: String,
    pub author_image_url: String,
}

impl Record for Comment {
    const COLLECTION: &'static str = "comments";
}

/// Like entity - at most one per (post_id, user_handle)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(default)]
    pub id: String,
    pub post_id: String,
    pub user_handle: String,
}

impl Like {
    /// Document id reserved for a (post, user) pair.
    ///
    /// Both parts are percent-encoded, so a `:` inside an id cannot make two
    /// pairs share a key.
    pub fn key(post_id: &str, user_handle: &str) -> String {
        format!(
            "{}:{}",
            urlencoding::encode(post_id),
            urlencoding::encode(user_handle)
        )
    }
}

impl Record for Like {
    const COLLECTION: &'static str = "likes";
}

/// File attached to a post. Owned by the uploader, not the post author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(default)]
    pub id: String,
    pub file_name: String,
    pub file_url: String,
    /// Object store key holding the bytes
    pub storage_key: String,
    pub post_id: String,
    pub author_handle: String,
    pub created_at: DateTime<Utc>,
}

impl Record for File {
    const COLLECTION: &'static str = "files";
}

/// Input for a new post
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

/// A post together with its comments, newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Result of an edit request
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Title and body matched the stored post; nothing was written
    Unchanged,
    Updated(Post),
}
