//! MIME type detection based on file extensions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

static MIME_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("css", "text/css"),
        ("htm", "text/html"),
        ("html", "text/html"),
        ("xml", "text/xml"),
        ("txt", "text/plain"),
        ("asc", "text/plain"),
        ("md", "text/markdown"),
        ("csv", "text/csv"),
        ("js", "application/javascript"),
        ("mjs", "application/javascript"),
        ("json", "application/json"),
        ("wasm", "application/wasm"),
        ("pdf", "application/pdf"),
        ("zip", "application/zip"),
        ("gz", "application/gzip"),
        ("tar", "application/x-tar"),
        ("doc", "application/msword"),
        ("exe", "application/octet-stream"),
        ("class", "application/octet-stream"),
        ("gif", "image/gif"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("svg", "image/svg+xml"),
        ("ico", "image/x-icon"),
        ("webp", "image/webp"),
        ("mp3", "audio/mpeg"),
        ("m3u", "audio/mpeg-url"),
        ("ogg", "application/x-ogg"),
        ("wav", "audio/wav"),
        ("mp4", "video/mp4"),
        ("webm", "video/webm"),
        ("woff", "font/woff"),
        ("woff2", "font/woff2"),
    ])
});

/// Looks up an extension, case-insensitively, without the leading dot.
pub fn for_extension(ext: &str) -> Option<&'static str> {
    MIME_TYPES.get(ext.to_ascii_lowercase().as_str()).copied()
}

/// MIME type for `path`, falling back to `application/octet-stream`.
pub fn lookup(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(for_extension)
        .unwrap_or(DEFAULT_MIME_TYPE)
}
