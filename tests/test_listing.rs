use nanoserve::http::listing::{format_size, render, Entry};
use nanoserve::http::mime::{for_extension, lookup, DEFAULT_MIME_TYPE};
use std::path::Path;

fn entry(name: &str, is_dir: bool, size: u64) -> Entry {
    Entry {
        name: name.to_string(),
        is_dir,
        size,
    }
}

#[test]
fn test_format_size() {
    assert_eq!(format_size(0), "0 bytes");
    assert_eq!(format_size(1023), "1023 bytes");
    assert_eq!(format_size(1024), "1.0 KB");
    assert_eq!(format_size(1536), "1.5 KB");
    assert_eq!(format_size(1024 * 1024), "1.00 MB");
    assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
}

#[test]
fn test_render_listing_links_and_sizes() {
    let html = render(
        "/docs/",
        &[entry("b.txt", false, 12), entry("a dir", true, 4096), entry("a.txt", false, 2048)],
    );

    assert!(html.contains("<h1>Directory /docs/</h1>"));
    assert!(html.contains("<b><a href=\"/\">..</a></b>"));
    assert!(html.contains("<b><a href=\"/docs/a+dir/\">a dir/</a><br/></b>"));
    assert!(html.contains("<a href=\"/docs/b.txt\">b.txt</a> &nbsp;<font size=2>(12 bytes)</font>"));
    assert!(html.contains("(2.0 KB)"));

    let dir = html.find("a dir/").unwrap();
    let a = html.find("a.txt").unwrap();
    let b = html.find("b.txt").unwrap();
    assert!(dir < a && a < b);
}

#[test]
fn test_render_root_has_no_parent_link() {
    let html = render("/", &[entry("index.css", false, 1)]);

    assert!(!html.contains(">..<"));
    assert!(html.contains("href=\"/index.css\""));
}

#[test]
fn test_render_escapes_names() {
    let html = render("/", &[entry("<script>.txt", false, 1)]);

    assert!(html.contains("&lt;script&gt;.txt"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_mime_lookup() {
    assert_eq!(lookup(Path::new("index.html")), "text/html");
    assert_eq!(lookup(Path::new("/a/b/STYLE.CSS")), "text/css");
    assert_eq!(lookup(Path::new("photo.jpeg")), "image/jpeg");
    assert_eq!(lookup(Path::new("archive.unknown")), DEFAULT_MIME_TYPE);
    assert_eq!(lookup(Path::new("Makefile")), "application/octet-stream");
    assert_eq!(for_extension("js"), Some("application/javascript"));
    assert_eq!(for_extension("nope"), None);
}
