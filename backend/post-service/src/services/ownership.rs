use crate::domain::models::{Actor, File, Post};
use crate::error::{ServiceError, ServiceResult};

/// A resource with a recorded owner
pub trait Owned {
    const KIND: &'static str;

    fn owner_handle(&self) -> &str;
    fn resource_id(&self) -> &str;
}

impl Owned for Post {
    const KIND: &'static str = "post";

    fn owner_handle(&self) -> &str {
        &self.author_handle
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Files belong to their uploader, independent of the post's author
impl Owned for File {
    const KIND: &'static str = "file";

    fn owner_handle(&self) -> &str {
        &self.author_handle
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Fail with `Forbidden` unless `actor` owns `resource`
pub fn assert_owner<R: Owned>(resource: &R, actor: &Actor) -> ServiceResult<()> {
    if resource.owner_handle() == actor.handle {
        Ok(())
    } else {
        tracing::warn!(
            kind = R::KIND,
            resource_id = resource.resource_id(),
            actor = %actor.handle,
            "ownership check failed"
        );
        Err(ServiceError::Forbidden(format!(
            "{} {} is not owned by {}",
            R::KIND,
            resource.resource_id(),
            actor.handle
        )))
    }
}
