use super::{
    Direction, Document, DocumentStore, Fields, Precondition, Query, StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::DateTime;
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Stored {
    /// Insertion sequence, used as the tie-breaker for query ordering
    seq: u64,
    doc: Document,
}

/// Process-local document store.
///
/// Each collection is one `DashMap` entry, so every read-then-write below runs
/// under that collection's shard lock and is atomic per document.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: DashMap<String, HashMap<String, Stored>>,
    sequence: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, AtomicOrdering::SeqCst)
    }

    fn insert(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let seq = self.next_seq();
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        docs.insert(
            id.to_string(),
            Stored {
                seq,
                doc: Document {
                    id: id.to_string(),
                    version: 1,
                    fields,
                },
            },
        );
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).map(|s| s.doc.clone())))
    }

    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.insert(collection, &id, fields)?;
        Ok(id)
    }

    async fn create(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.insert(collection, id, fields)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        precondition: Precondition,
    ) -> StoreResult<u64> {
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let mut docs = self.collections.get_mut(collection).ok_or_else(not_found)?;
        let stored = docs.get_mut(id).ok_or_else(not_found)?;

        if let Precondition::Version(expected) = precondition {
            if stored.doc.version != expected {
                return Err(StoreError::VersionConflict {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    expected,
                    actual: stored.doc.version,
                });
            }
        }

        stored.doc.fields.extend(fields);
        stored.doc.version += 1;
        Ok(stored.doc.version)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .get_mut(collection)
            .map(|mut docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let mut matched: Vec<Stored> = match self.collections.get(collection) {
            Some(docs) => docs
                .values()
                .filter(|s| {
                    query
                        .filters
                        .iter()
                        .all(|(field, value)| s.doc.fields.get(field) == Some(value))
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        matched.sort_by_key(|s| s.seq);

        if let Some((field, direction)) = &query.order_by {
            matched.sort_by(|a, b| {
                let (x, y) = (a.doc.fields.get(field), b.doc.fields.get(field));
                match direction {
                    Direction::Ascending => compare_values(x, y),
                    Direction::Descending => compare_values(y, x),
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        Ok(matched.into_iter().map(|s| s.doc).collect())
    }
}

/// Numbers compare numerically, RFC 3339 strings chronologically, other
/// strings lexicographically. Missing fields sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fields;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Fields {
        fields(pairs.iter().map(|(k, v)| (*k, v.clone())))
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .add("posts", doc(&[("title", json!("A"))]))
            .await
            .unwrap();

        let found = store.get_by_id("posts", &id).await.unwrap().unwrap();
        assert_eq!(found.version, 1);
        assert_eq!(found.fields["title"], json!("A"));
        assert!(store.get_by_id("posts", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_existing_id() {
        let store = InMemoryDocumentStore::new();
        store.create("likes", "p1:alice", Fields::new()).await.unwrap();

        let err = store
            .create("likes", "p1:alice", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert_eq!(store.count("likes"), 1);
    }

    #[tokio::test]
    async fn test_update_merges_and_checks_version() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .add("posts", doc(&[("title", json!("A")), ("likeCount", json!(0))]))
            .await
            .unwrap();

        let version = store
            .update(
                "posts",
                &id,
                doc(&[("likeCount", json!(1))]),
                Precondition::Version(1),
            )
            .await
            .unwrap();
        assert_eq!(version, 2);

        let stale = store
            .update(
                "posts",
                &id,
                doc(&[("likeCount", json!(5))]),
                Precondition::Version(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            stale,
            StoreError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            }
        ));

        let found = store.get_by_id("posts", &id).await.unwrap().unwrap();
        assert_eq!(found.fields["title"], json!("A"));
        assert_eq!(found.fields["likeCount"], json!(1));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update("posts", "nope", Fields::new(), Precondition::None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = InMemoryDocumentStore::new();
        let id = store.add("files", Fields::new()).await.unwrap();

        assert!(store.delete("files", &id).await.unwrap());
        assert!(!store.delete("files", &id).await.unwrap());
        assert!(!store.delete("unknown", &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_query_filters_orders_and_limits() {
        let store = InMemoryDocumentStore::new();
        for (post, at) in [
            ("p1", "2024-01-01T10:00:00Z"),
            ("p2", "2024-01-01T11:00:00Z"),
            ("p1", "2024-01-01T12:00:00.5Z"),
            ("p1", "2024-01-01T09:00:00Z"),
        ] {
            store
                .add(
                    "comments",
                    doc(&[("postId", json!(post)), ("createdAt", json!(at))]),
                )
                .await
                .unwrap();
        }

        let query = Query::new()
            .where_eq("postId", "p1")
            .order_by("createdAt", Direction::Descending);
        let found = store.query("comments", &query).await.unwrap();
        let times: Vec<_> = found.iter().map(|d| d.fields["createdAt"].clone()).collect();
        assert_eq!(
            times,
            vec![
                json!("2024-01-01T12:00:00.5Z"),
                json!("2024-01-01T10:00:00Z"),
                json!("2024-01-01T09:00:00Z"),
            ]
        );

        let limited = store.query("comments", &query.limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }
}
