//! # Page Storage
//!
//! Capability interface for the versioned document backend, plus the
//! backends shipped with the crate.

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::types::{Commit, Document};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Backend trait for versioned page storage
pub trait PageStore: Send + Sync + std::fmt::Debug {
    /// Check whether a document exists at key
    fn exists(&self, key: &str) -> bool;

    /// Read the document stored at key
    fn read(&self, key: &str) -> StorageResult<Document>;

    /// Write a document and record the commit that attributes it
    fn write(&self, key: &str, document: &Document, commit: &Commit) -> StorageResult<()>;

    /// Create the directory that will hold a document. Idempotent.
    fn make_containing_directory(&self, dir: &str) -> StorageResult<()>;
}
