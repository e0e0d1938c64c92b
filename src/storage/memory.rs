//! # In-Memory Backend

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{PageStore, StorageError, StorageResult};
use crate::types::{Commit, Document};

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<String, Document>,
    directories: HashSet<String>,
    commits: Vec<(String, Commit)>,
}

/// Map-backed store. Counts every call so callers can assert that an
/// operation never reached storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_mkdir: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without recording a commit
    pub fn insert(&self, key: &str, document: Document) {
        self.lock().documents.insert(key.to_string(), document);
    }

    pub fn document(&self, key: &str) -> Option<Document> {
        self.lock().documents.get(key).cloned()
    }

    pub fn commits(&self) -> Vec<(String, Commit)> {
        self.lock().commits.clone()
    }

    pub fn has_directory(&self, dir: &str) -> bool {
        self.lock().directories.contains(dir)
    }

    /// Number of trait calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mkdir(&self, fail: bool) {
        self.fail_mkdir.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl PageStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.record_call();
        self.lock().documents.contains_key(key)
    }

    fn read(&self, key: &str) -> StorageResult<Document> {
        self.record_call();
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Io("read rejected".to_string()));
        }
        self.lock()
            .documents
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn write(&self, key: &str, document: &Document, commit: &Commit) -> StorageResult<()> {
        self.record_call();
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("write rejected".to_string()));
        }
        let mut inner = self.lock();
        inner.documents.insert(key.to_string(), document.clone());
        inner.commits.push((key.to_string(), commit.clone()));
        Ok(())
    }

    fn make_containing_directory(&self, dir: &str) -> StorageResult<()> {
        self.record_call();
        if self.fail_mkdir.load(Ordering::SeqCst) {
            return Err(StorageError::Io("mkdir rejected".to_string()));
        }
        self.lock().directories.insert(dir.to_string());
        Ok(())
    }
}
