use crate::domain::models::{Actor, File, Post};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{FileRepository, PostRepository};
use crate::services::ownership::assert_owner;
use crate::services::{post_not_found, require_non_blank};
use crate::storage::{attachment_key, ObjectStore};
use crate::store::{fields, Precondition, StoreError};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COPY_SUFFIX: &str = "_copy";

/// Pick a display name for `raw` that is not already in `existing`.
///
/// Each collision inserts `_copy` before the extension:
/// `report.pdf` -> `report_copy.pdf` -> `report_copy_copy.pdf`.
pub fn dedupe_file_name(raw: &str, existing: &[String]) -> String {
    let (stem, extension) = split_extension(raw);
    let mut stem = stem.to_string();
    let mut candidate = raw.to_string();

    while existing.iter().any(|name| *name == candidate) {
        stem.push_str(COPY_SUFFIX);
        candidate = match extension {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem.clone(),
        };
    }

    candidate
}

/// Split at the last dot, unless that dot starts the name (`.env`)
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Attaches files to posts, keeping the post's `fileNames`, the File registry
/// and the object store in sync.
#[derive(Clone)]
pub struct FileService {
    posts: PostRepository,
    files: FileRepository,
    objects: Arc<dyn ObjectStore>,
    denied_mime_types: Vec<String>,
    max_attempts: u32,
}

impl FileService {
    pub fn new(
        posts: PostRepository,
        files: FileRepository,
        objects: Arc<dyn ObjectStore>,
        denied_mime_types: Vec<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            posts,
            files,
            objects,
            denied_mime_types,
            max_attempts: max_attempts.max(1),
        }
    }

    #[tracing::instrument(skip(self, content, actor), fields(actor = %actor.handle, size = content.len()))]
    pub async fn attach(
        &self,
        post_id: &str,
        raw_file_name: &str,
        content: Vec<u8>,
        content_type: &str,
        actor: &Actor,
    ) -> ServiceResult<File> {
        require_non_blank("fileName", raw_file_name, "File name must not be empty")?;
        if raw_file_name.contains('/') {
            return Err(ServiceError::invalid_input(
                "fileName",
                "File name must not contain '/'",
            ));
        }

        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;

        self.check_content_type(content_type)?;

        let mut file_name = dedupe_file_name(raw_file_name, &post.file_names);
        let upload_id = Uuid::new_v4().simple().to_string();
        let storage_key = attachment_key(post_id, &upload_id, &file_name);
        let file_url = self.objects.put(&storage_key, content, content_type).await?;
        debug!(%storage_key, "stored attachment object");

        // Names taken since the read above are skipped on each CAS attempt
        let appended = self
            .update_file_names(post_id, |names| {
                file_name = dedupe_file_name(raw_file_name, names);
                names.push(file_name.clone());
                true
            })
            .await;

        match appended {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.discard_object(&storage_key).await;
                return Err(post_not_found(post_id));
            }
            Err(err) => {
                self.discard_object(&storage_key).await;
                return Err(err);
            }
        }

        let file = File {
            id: String::new(),
            file_name: file_name.clone(),
            file_url,
            storage_key: storage_key.clone(),
            post_id: post_id.to_string(),
            author_handle: actor.handle.clone(),
            created_at: Utc::now(),
        };

        match self.files.create(&file).await {
            Ok(file) => {
                info!(file_id = %file.id, file_name = %file.file_name, "file attached");
                Ok(file)
            }
            Err(err) => {
                warn!(error = %err, "file record insert failed, undoing attach");
                if let Err(undo) = self.remove_file_name(post_id, &file_name).await {
                    warn!(error = %undo, %file_name, "failed to remove file name after attach failure");
                }
                self.discard_object(&storage_key).await;
                Err(ServiceError::DependencyFailure(format!(
                    "File {} could not be registered",
                    file_name
                )))
            }
        }
    }

    /// Remove a file. Only its uploader may do so.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.handle))]
    pub async fn detach(&self, file_id: &str, actor: &Actor) -> ServiceResult<()> {
        let file = self
            .files
            .get(file_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("File {} not found", file_id)))?;

        assert_owner(&file, actor)?;

        self.objects.delete(&file.storage_key).await?;

        let post = self.remove_file_name(&file.post_id, &file.file_name).await?;

        self.files.delete(&file.id).await?;

        if post.is_none() {
            return Err(post_not_found(&file.post_id));
        }

        info!(file_name = %file.file_name, "file detached");
        Ok(())
    }

    pub async fn list_files(&self, post_id: &str) -> ServiceResult<Vec<File>> {
        if self.posts.get(post_id).await?.is_none() {
            return Err(post_not_found(post_id));
        }
        Ok(self.files.list_for_post(post_id).await?)
    }

    /// Delete every file record and stored object of a post
    pub async fn purge_post_files(&self, post_id: &str) -> ServiceResult<usize> {
        let files = self.files.list_for_post(post_id).await?;
        for file in &files {
            self.objects.delete(&file.storage_key).await?;
            self.files.delete(&file.id).await?;
        }
        Ok(files.len())
    }

    fn check_content_type(&self, content_type: &str) -> ServiceResult<()> {
        let mime: mime::Mime = content_type.parse().map_err(|_| {
            ServiceError::invalid_input(
                "contentType",
                format!("{} is not a valid MIME type", content_type),
            )
        })?;

        let essence = mime.essence_str().to_ascii_lowercase();
        if self.denied_mime_types.iter().any(|denied| *denied == essence) {
            return Err(ServiceError::invalid_input(
                "contentType",
                "Wrong file type submitted",
            ));
        }
        Ok(())
    }

    async fn remove_file_name(&self, post_id: &str, file_name: &str) -> ServiceResult<Option<Post>> {
        self.update_file_names(post_id, |names| {
            match names.iter().position(|name| name == file_name) {
                Some(idx) => {
                    names.remove(idx);
                    true
                }
                None => false,
            }
        })
        .await
    }

    /// Version-guarded edit of a post's `fileNames`.
    ///
    /// `edit` returns whether a write is needed. Returns `None` when the post
    /// does not exist.
    async fn update_file_names<F>(&self, post_id: &str, mut edit: F) -> ServiceResult<Option<Post>>
    where
        F: FnMut(&mut Vec<String>) -> bool,
    {
        for attempt in 1..=self.max_attempts {
            let Some((mut post, version)) = self.posts.get_versioned(post_id).await? else {
                return Ok(None);
            };

            if !edit(&mut post.file_names) {
                return Ok(Some(post));
            }

            let update = fields([("fileNames", json!(post.file_names))]);
            match self
                .posts
                .update(post_id, update, Precondition::Version(version))
                .await
            {
                Ok(_) => return Ok(Some(post)),
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(attempt, "fileNames write lost a race, retrying");
                }
                Err(StoreError::NotFound { .. }) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::DependencyFailure(format!(
            "fileNames on post {} is contended, gave up after {} attempts",
            post_id, self.max_attempts
        )))
    }

    async fn discard_object(&self, key: &str) {
        if let Err(err) = self.objects.delete(key).await {
            warn!(error = %err, %key, "failed to delete orphaned attachment object");
        }
    }
}
