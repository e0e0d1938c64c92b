use std::path::{Component, Path};

/// Filename that stands for "the page at this directory"
pub const SENTINEL_FILENAME: &str = "_default.json";

/// Filename served for empty or directory-like asset paths
pub const ASSET_INDEX: &str = "index.html";

/// Map a request path to its storage key.
///
/// This is a pure suffix rule: no case folding, no percent decoding and no
/// traversal handling. Keys that already name the sentinel pass through.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return SENTINEL_FILENAME.to_string();
    }
    if is_normalized(path) {
        return path.to_string();
    }
    if path.ends_with('/') {
        format!("{}{}", path, SENTINEL_FILENAME)
    } else {
        format!("{}/{}", path, SENTINEL_FILENAME)
    }
}

fn is_normalized(path: &str) -> bool {
    path == SENTINEL_FILENAME
        || path
            .strip_suffix(SENTINEL_FILENAME)
            .is_some_and(|head| head.ends_with('/'))
}

/// Everything up to and including the last separator of a key
pub fn containing_directory(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[..=idx],
        None => "",
    }
}

/// Reject relative paths that climb out of their root or are absolute
pub fn ensure_safe_path(req_path: &str) -> bool {
    Path::new(req_path)
        .components()
        .all(|comp| matches!(comp, Component::Normal(_) | Component::CurDir))
}

/// Determine content type for a file based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()) {
        Some(ref ext) if ext == "html" || ext == "htm" => "text/html",
        Some(ref ext) if ext == "css" => "text/css",
        Some(ref ext) if ext == "js" => "text/javascript",
        Some(ref ext) if ext == "json" => "application/json",
        Some(ref ext) if ext == "svg" => "image/svg+xml",
        Some(ref ext) if ext == "png" => "image/png",
        Some(ref ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ref ext) if ext == "gif" => "image/gif",
        Some(ref ext) if ext == "ico" => "image/x-icon",
        Some(ref ext) if ext == "woff2" => "font/woff2",
        Some(ref ext) if ext == "txt" => "text/plain; charset=utf-8",
        Some(ref ext) if ext == "md" => "text/markdown",
        _ => "application/octet-stream",
    }
}
