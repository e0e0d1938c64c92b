//! Folio - a wiki page content service
//!
//! Pages live in a versioned store under hierarchical paths, are written in
//! markdown and served either as raw source or as sanitized HTML.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::WikiError;
pub use services::{AssetService, PageService, RenderService};
pub use storage::{FileStore, MemoryStore, PageStore, StorageError};
pub use types::{ApiMessage, AppState, Commit, ContentType, Document, PageContent, PageRequest};

// Re-export utility functions
pub use utils::{containing_directory, normalize_path, SENTINEL_FILENAME};
