//! Document store adapter.
//!
//! The engine only needs collection-addressed documents with partial updates,
//! equality queries and a per-document compare-and-swap. Hosts provide an
//! implementation of [`DocumentStore`]; [`InMemoryDocumentStore`] backs tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;

pub use memory::InMemoryDocumentStore;

/// Field map of a stored document
pub type Fields = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    #[error("Document {collection}/{id} changed: expected version {expected}, found {actual}")]
    VersionConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A stored document. `version` increases on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub version: u64,
    pub fields: Fields,
}

/// Write guard for [`DocumentStore::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    None,
    Version(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality-filtered query with optional ordering and limit
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Insert under a store-assigned id
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Insert under a caller-chosen id; fails with `AlreadyExists` if taken
    async fn create(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Merge `fields` into an existing document and return its new version
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        precondition: Precondition,
    ) -> StoreResult<u64>;

    /// Returns whether a document was removed
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>>;
}

/// A typed record persisted as a document of `COLLECTION`.
///
/// The record's `id` field mirrors the document id and is never stored as a field.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn from_document(doc: Document) -> StoreResult<Self> {
        let mut fields = doc.fields;
        fields.insert("id".to_string(), Value::String(doc.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    fn to_fields(&self) -> StoreResult<Fields> {
        match serde_json::to_value(self)? {
            Value::Object(mut fields) => {
                fields.remove("id");
                Ok(fields)
            }
            other => Err(StoreError::Backend(format!(
                "record for {} serialized to non-object {}",
                Self::COLLECTION,
                other
            ))),
        }
    }
}

/// Build a partial field map from `(name, value)` pairs
pub fn fields<I, K>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
