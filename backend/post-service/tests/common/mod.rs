#![allow(dead_code)]

use async_trait::async_trait;
use post_service::config::Config;
use post_service::domain::models::{Actor, NewPost, Post};
use post_service::storage::{InMemoryObjectStore, ObjectStore, ObjectStoreError};
use post_service::store::{
    Document, DocumentStore, Fields, InMemoryDocumentStore, Precondition, Query, StoreError,
    StoreResult,
};
use post_service::AppState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

/// Document store wrapper that counts writes and can fail inserts or updates in chosen collections
#[derive(Default)]
pub struct TestStore {
    pub inner: InMemoryDocumentStore,
    writes: AtomicUsize,
    failing_adds: Mutex<Vec<String>>,
    failing_updates: Mutex<Vec<String>>,
}

impl TestStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_adds_to(&self, collection: &str) {
        self.failing_adds
            .lock()
            .unwrap()
            .push(collection.to_string());
    }

    pub fn fail_updates_to(&self, collection: &str) {
        self.failing_updates
            .lock()
            .unwrap()
            .push(collection.to_string());
    }

    fn fails(list: &Mutex<Vec<String>>, collection: &str) -> bool {
        list.lock().unwrap().iter().any(|c| c == collection)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for TestStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get_by_id(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        if Self::fails(&self.failing_adds, collection) {
            return Err(StoreError::Backend("injected failure".to_string()));
        }
        self.record_write();
        self.inner.add(collection, fields).await
    }

    async fn create(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.record_write();
        self.inner.create(collection, id, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        precondition: Precondition,
    ) -> StoreResult<u64> {
        if Self::fails(&self.failing_updates, collection) {
            return Err(StoreError::Backend("injected failure".to_string()));
        }
        self.record_write();
        self.inner.update(collection, id, fields, precondition).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.record_write();
        self.inner.delete(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        self.inner.query(collection, query).await
    }
}

/// Object store wrapper whose uploads can be switched to fail, held at a barrier, or slowed down
#[derive(Default)]
pub struct TestObjects {
    pub inner: InMemoryObjectStore,
    fail_puts: AtomicBool,
    put_gate: Mutex<Option<Arc<Barrier>>>,
    slow_puts: Mutex<Vec<(Vec<u8>, Duration)>>,
}

impl TestObjects {
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    /// Every upload waits until `parties` uploads are in flight
    pub fn gate_puts(&self, parties: usize) {
        *self.put_gate.lock().unwrap() = Some(Arc::new(Barrier::new(parties)));
    }

    /// Uploads of exactly `bytes` are stored only after `delay`
    pub fn slow_put_of(&self, bytes: &[u8], delay: Duration) {
        self.slow_puts.lock().unwrap().push((bytes.to_vec(), delay));
    }
}

#[async_trait]
impl ObjectStore for TestObjects {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Backend("injected failure".to_string()));
        }

        let gate = self.put_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }

        let delay = self
            .slow_puts
            .lock()
            .unwrap()
            .iter()
            .find(|(slow, _)| *slow == bytes)
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.inner.put(key, bytes, content_type).await
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.inner.delete(key).await
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<TestStore>,
    pub objects: Arc<TestObjects>,
}

pub fn harness() -> Harness {
    harness_with(Config::default())
}

pub fn harness_with(config: Config) -> Harness {
    let store = Arc::new(TestStore::default());
    let objects = Arc::new(TestObjects::default());
    let state = AppState::new(&config, store.clone(), objects.clone());
    Harness {
        state,
        store,
        objects,
    }
}

pub fn alice() -> Actor {
    Actor::new("alice", "https://img.example.com/alice.png")
}

pub fn bob() -> Actor {
    Actor::new("bob", "https://img.example.com/bob.png")
}

pub async fn create_post(h: &Harness, author: &Actor) -> Post {
    h.state
        .posts
        .create_post(
            NewPost {
                title: "A".to_string(),
                body: "B".to_string(),
            },
            author,
        )
        .await
        .unwrap()
}
