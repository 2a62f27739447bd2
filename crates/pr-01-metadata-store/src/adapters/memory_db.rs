//! In-Memory Document Database Adapter
//!
//! Implements `DocumentDatabase` over a path-keyed map. Used for local
//! development and tests; the hosted store sits behind the same port.

use crate::domain::{CollectionPath, Document, DocumentPath, MetadataStoreError};
use crate::ports::outbound::DocumentDatabase;
use async_trait::async_trait;
use parking_lot::RwLock;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// Length of generated document keys.
const GENERATED_KEY_LEN: usize = 20;

/// In-memory document database.
pub struct InMemoryDocumentDatabase {
    /// Full document path -> document.
    docs: RwLock<BTreeMap<DocumentPath, Document>>,
    /// Simulated outage: every call fails with `Unavailable`.
    offline: AtomicBool,
    /// Simulated write outage: reads succeed, writes fail.
    read_only: AtomicBool,
    /// Number of write calls attempted.
    writes: AtomicUsize,
}

impl InMemoryDocumentDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
            offline: AtomicBool::new(false),
            read_only: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Toggle a full outage.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Toggle a write outage.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of write calls attempted so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw document access for assertions.
    pub fn snapshot(&self, path: &str) -> Option<Document> {
        let path = DocumentPath::new(path).ok()?;
        self.docs.read().get(&path).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Whether the database is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    fn check_online(&self) -> Result<(), MetadataStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(MetadataStoreError::Unavailable("database offline".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), MetadataStoreError> {
        self.check_online()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.read_only.load(Ordering::SeqCst) {
            return Err(MetadataStoreError::Unavailable("writes rejected".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryDocumentDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_KEY_LEN)
        .map(char::from)
        .collect()
}

#[async_trait]
impl DocumentDatabase for InMemoryDocumentDatabase {
    async fn add(
        &self,
        collection: &CollectionPath,
        doc: Document,
    ) -> Result<String, MetadataStoreError> {
        self.check_writable()?;
        let mut docs = self.docs.write();
        loop {
            let key = generate_key();
            let path = collection.doc(&key)?;
            if !docs.contains_key(&path) {
                debug!("[pr-01] add {}", path);
                docs.insert(path, doc);
                return Ok(key);
            }
        }
    }

    async fn set(&self, path: &DocumentPath, doc: Document) -> Result<(), MetadataStoreError> {
        self.check_writable()?;
        debug!("[pr-01] set {}", path);
        self.docs.write().insert(path.clone(), doc);
        Ok(())
    }

    async fn update(
        &self,
        path: &DocumentPath,
        fields: Document,
    ) -> Result<(), MetadataStoreError> {
        self.check_writable()?;
        let mut docs = self.docs.write();
        let existing = docs
            .get_mut(path)
            .ok_or_else(|| MetadataStoreError::NotFound(path.to_string()))?;
        debug!("[pr-01] update {} ({} fields)", path, fields.len());
        existing.extend(fields);
        Ok(())
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, MetadataStoreError> {
        self.check_online()?;
        Ok(self.docs.read().get(path).cloned())
    }

    async fn list(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<(String, Document)>, MetadataStoreError> {
        self.check_online()?;
        let docs = self.docs.read();
        Ok(docs
            .iter()
            .filter(|(path, _)| path.parent() == *collection)
            .map(|(path, doc)| (path.id().to_string(), doc.clone()))
            .collect())
    }

    async fn increment_or_create(
        &self,
        path: &DocumentPath,
        field: &str,
        by: i64,
    ) -> Result<i64, MetadataStoreError> {
        self.check_writable()?;
        // Single write lock: read-modify-write cannot interleave.
        let mut docs = self.docs.write();
        let doc = docs.entry(path.clone()).or_default();
        let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
        let next = current + by;
        doc.insert(field.to_string(), Value::from(next));
        debug!("[pr-01] increment {}.{} -> {}", path, field, next);
        Ok(next)
    }
}
