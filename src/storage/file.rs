//! # Local Filesystem Backend
//!
//! Documents are stored as JSON files below a data directory. Each commit is
//! appended as one JSON line to the history log in the same directory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, error, info};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{PageStore, StorageError, StorageResult};
use crate::types::{Commit, Document};
use crate::utils::ensure_safe_path;

/// History log filename, relative to the data directory
pub const HISTORY_FILE: &str = ".history.jsonl";

#[derive(Serialize)]
struct HistoryEntry<'a> {
    key: &'a str,
    author: &'a str,
    message: &'a str,
    timestamp: String,
}

/// Filesystem-backed page store
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        debug!("Creating FileStore with data directory: {:?}", root);
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        if !ensure_safe_path(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn append_history(&self, key: &str, commit: &Commit) -> StorageResult<()> {
        let entry = HistoryEntry {
            key,
            author: &commit.author,
            message: &commit.message,
            timestamp: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .map_err(|e| StorageError::Encoding(e.to_string()))?,
        };
        let mut line =
            serde_json::to_string(&entry).map_err(|e| StorageError::Encoding(e.to_string()))?;
        line.push('\n');

        let mut history = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(HISTORY_FILE))
            .map_err(|e| StorageError::Io(e.to_string()))?;
        history.write_all(line.as_bytes()).map_err(|e| StorageError::Io(e.to_string()))
    }
}

/// Put back what was at `path` before a rename replaced it
fn restore(path: &Path, previous: Option<Vec<u8>>) {
    let restored = match previous {
        Some(bytes) => fs::write(path, bytes),
        None => fs::remove_file(path),
    };
    if let Err(e) = restored {
        error!("Failed to roll back {:?}: {}", path, e);
    }
}

impl PageStore for FileStore {
    fn exists(&self, key: &str) -> bool {
        let exists = self.full_path(key).map(|p| p.is_file()).unwrap_or(false);
        debug!("Document exists check: {} -> {}", key, exists);
        exists
    }

    fn read(&self, key: &str) -> StorageResult<Document> {
        let full_path = self.full_path(key)?;

        let raw = fs::read_to_string(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                error!("Failed to read document {:?}: {}", full_path, e);
                StorageError::Io(e.to_string())
            }
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            error!("Corrupt document {:?}: {}", full_path, e);
            StorageError::Encoding(e.to_string())
        })
    }

    fn write(&self, key: &str, document: &Document, commit: &Commit) -> StorageResult<()> {
        let full_path = self.full_path(key)?;
        let encoded = serde_json::to_vec_pretty(document)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let previous = fs::read(&full_path).ok();
        let tmp_path = full_path.with_extension("json.tmp");
        fs::write(&tmp_path, &encoded).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp_path, &full_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StorageError::Io(e.to_string())
        })?;

        // A document without its history entry is rolled back
        if let Err(e) = self.append_history(key, commit) {
            error!("Failed to record commit for {}: {}", key, e);
            restore(&full_path, previous);
            return Err(e);
        }
        info!("Committed {} by {}: {}", key, commit.author, commit.message);
        Ok(())
    }

    fn make_containing_directory(&self, dir: &str) -> StorageResult<()> {
        let full_path = self.full_path(dir)?;
        fs::create_dir_all(&full_path).map_err(|e| {
            error!("Failed to create directory {:?}: {}", full_path, e);
            StorageError::Io(e.to_string())
        })
    }
}
