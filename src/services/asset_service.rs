use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use time::{Duration, OffsetDateTime};

use crate::errors::WikiError;
use crate::utils::{content_type_for, ensure_safe_path, ASSET_INDEX};

const ONE_YEAR: Duration = Duration::days(365);
const THIRTY_DAYS: Duration = Duration::days(30);

/// Caching behaviour chosen from the asset extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePolicy {
    /// Long-lived cache for script bundles
    Immutable,
    /// Never cache, used for markup pages
    NoStore,
    /// No caching headers at all
    Unspecified,
}

/// A resolved static asset ready to be served
#[derive(Debug, Clone)]
pub struct Asset {
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub cache: CachePolicy,
}

impl Asset {
    /// Header pairs for this asset, `Expires` computed against `now`
    pub fn headers(&self, now: OffsetDateTime) -> Vec<(&'static str, String)> {
        let mut headers = vec![("content-type", self.content_type.to_string())];
        match self.cache {
            CachePolicy::Immutable => {
                headers.push(("expires", http_date(now + ONE_YEAR)));
                headers.push(("cache-control", "public, max-age=31536000".to_string()));
            }
            CachePolicy::NoStore => {
                headers.push(("expires", http_date(now - THIRTY_DAYS)));
                headers.push((
                    "cache-control",
                    "no-cache, no-store, must-revalidate".to_string(),
                ));
            }
            CachePolicy::Unspecified => {}
        }
        headers
    }
}

/// Serves frontend files from a directory on disk
#[derive(Clone)]
pub struct AssetService {
    static_dir: PathBuf,
}

impl AssetService {
    pub fn new(static_dir: PathBuf) -> Self {
        Self { static_dir }
    }

    /// Resolve a request path and load the asset behind it
    pub fn load(&self, req_path: &str) -> Result<Asset, WikiError> {
        let path = asset_path(req_path);
        if !ensure_safe_path(&path) {
            warn!("Rejected asset path: '{}'", req_path);
            return Err(WikiError::NotFound("Not found".to_string()));
        }

        let full_path = self.static_dir.join(&path);
        if !full_path.is_file() {
            warn!("Asset not found: {:?}", full_path);
            return Err(WikiError::NotFound(format!("Asset {} not found", path)));
        }

        let bytes = fs::read(&full_path)?;
        let (content_type, cache) = classify(Path::new(&path));
        debug!("Serving asset '{}' ({} bytes, {})", path, bytes.len(), content_type);
        Ok(Asset {
            path,
            bytes,
            content_type,
            cache,
        })
    }
}

/// Same suffix convention as page keys, with `index.html` as the sentinel
pub fn asset_path(req_path: &str) -> String {
    let trimmed = req_path.strip_prefix('/').unwrap_or(req_path);
    if trimmed.is_empty() || trimmed.ends_with('/') {
        format!("{}{}", trimmed, ASSET_INDEX)
    } else {
        trimmed.to_string()
    }
}

fn classify(path: &Path) -> (&'static str, CachePolicy) {
    match path.extension().and_then(|s| s.to_str()) {
        Some("js") => ("text/javascript", CachePolicy::Immutable),
        Some("html") => ("text/html", CachePolicy::NoStore),
        _ => (content_type_for(path), CachePolicy::Unspecified),
    }
}

fn http_date(at: OffsetDateTime) -> String {
    let format = time::macros::format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    at.format(&format).unwrap_or_default()
}
