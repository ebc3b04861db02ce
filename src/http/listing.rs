//! HTML directory listings.
//!
//! Rendering is a pure function of the request URI and the entries, so the
//! markup can change without touching the file server.

use crate::http::codec::{encode_uri, escape_html};

/// One directory entry as shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    /// File length in bytes; not shown for directories.
    pub size: u64,
}

/// Renders the listing page for `uri`, which must end in `/`.
///
/// Directories come first, then files, each group sorted by name.
pub fn render(uri: &str, entries: &[Entry]) -> String {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    let mut html = format!(
        "<html><body><h1>Directory {}</h1><br/>",
        escape_html(uri)
    );

    if let Some(parent) = parent_of(uri) {
        html.push_str(&format!(
            "<b><a href=\"{}\">..</a></b><br/>",
            encode_uri(parent)
        ));
    }

    for entry in sorted {
        let mut name = entry.name.clone();
        if entry.is_dir {
            name.push('/');
            html.push_str("<b>");
        }

        html.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            encode_uri(&format!("{uri}{name}")),
            escape_html(&name)
        ));

        if !entry.is_dir {
            html.push_str(&format!(
                " &nbsp;<font size=2>({})</font>",
                format_size(entry.size)
            ));
        }

        html.push_str("<br/>");
        if entry.is_dir {
            html.push_str("</b>");
        }
    }

    html.push_str("</body></html>");
    html
}

/// Human-readable size: bytes below 1 KiB, one decimal in KB, two in MB.
pub fn format_size(len: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if len < KB {
        format!("{len} bytes")
    } else if len < MB {
        format!("{}.{} KB", len / KB, len % KB * 10 / KB)
    } else {
        format!("{}.{:02} MB", len / MB, len % MB * 100 / MB)
    }
}

/// `/a/b/` -> `/a/`; the root has no parent.
fn parent_of(uri: &str) -> Option<&str> {
    let trimmed = uri.strip_suffix('/').unwrap_or(uri);
    if trimmed.is_empty() {
        return None;
    }
    trimmed.rfind('/').map(|slash| &uri[..=slash])
}
