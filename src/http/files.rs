//! Static file serving, the default handler.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::http::codec::encode_uri;
use crate::http::handler::Handler;
use crate::http::listing::{self, Entry};
use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Body, Response, StatusCode};

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serves files below `root`, optionally listing directories that have no
/// index file.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    directory_listing: bool,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, directory_listing: bool) -> Self {
        Self {
            root: root.into(),
            directory_listing,
        }
    }

    /// The working directory, with listings enabled.
    pub fn current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?, true))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directory_listing(&self) -> bool {
        self.directory_listing
    }

    /// Resolves `uri` below the root and builds the response for it.
    ///
    /// Failures are answered with a status, never returned as errors:
    /// traversal and unreadable files get `403`, missing paths `404`, and a
    /// root that is not a directory `500`.
    pub fn serve_file(&self, uri: &str, headers: &HashMap<String, String>) -> Response {
        if !self.root.is_dir() {
            return Response::error(
                StatusCode::InternalServerError,
                "INTERNAL ERROR: serve_file(): given root is not a directory.",
            );
        }

        let uri = uri.trim().replace('\\', "/");
        if is_traversal(&uri) {
            return Response::error(
                StatusCode::Forbidden,
                "FORBIDDEN: Won't serve ../ for security reasons.",
            );
        }

        let path = self.root.join(uri.trim_start_matches('/'));
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Response::error(StatusCode::NotFound, "Error 404, file not found.");
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Cannot stat path");
                return Response::error(StatusCode::Forbidden, "FORBIDDEN: Reading file failed.");
            }
        };

        if metadata.is_dir() {
            self.serve_directory(&uri, &path, headers)
        } else {
            serve_regular(&path, metadata.len(), headers)
        }
    }

    fn serve_directory(&self, uri: &str, dir: &Path, headers: &HashMap<String, String>) -> Response {
        if !uri.ends_with('/') {
            return Response::redirect(&encode_uri(&format!("{uri}/")));
        }

        for index in INDEX_FILES {
            let candidate = dir.join(index);
            if let Ok(metadata) = fs::metadata(&candidate) {
                if metadata.is_file() {
                    return serve_regular(&candidate, metadata.len(), headers);
                }
            }
        }

        if !self.directory_listing {
            return Response::error(StatusCode::Forbidden, "FORBIDDEN: No directory listing.");
        }

        match read_entries(dir) {
            Ok(entries) => Response::text(StatusCode::Ok, "text/html", &listing::render(uri, &entries)),
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "Cannot list directory");
                Response::error(StatusCode::Forbidden, "FORBIDDEN: No directory listing.")
            }
        }
    }
}

impl Handler for StaticFiles {
    fn serve(&self, request: &Request) -> anyhow::Result<Response> {
        Ok(match request.method {
            Method::GET | Method::POST => self.serve_file(&request.uri, &request.headers),
            _ => Response::error(
                StatusCode::NotImplemented,
                &format!("Method {} is not implemented.", request.method),
            ),
        })
    }
}

/// Start offset of a `Range: bytes=<start>-` value.
///
/// Anything unparsable yields `None`; the end of the range is ignored.
pub fn parse_range_start(value: &str) -> Option<u64> {
    let spec = value.trim().strip_prefix("bytes=")?;
    let start = spec.split('-').next()?;
    start.trim().parse().ok()
}

/// A `..` segment anywhere, or `..` at either end.
fn is_traversal(uri: &str) -> bool {
    uri.starts_with("..") || uri.ends_with("..") || uri.split('/').any(|segment| segment == "..")
}

fn serve_regular(path: &Path, len: u64, headers: &HashMap<String, String>) -> Response {
    let range_start = headers
        .get("range")
        .and_then(|value| parse_range_start(value))
        .filter(|&start| start < len);
    let start = range_start.unwrap_or(0);

    let file = match open_at(path, start) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Cannot open file");
            return Response::error(StatusCode::Forbidden, "FORBIDDEN: Reading file failed.");
        }
    };

    let mut response = Response::new(StatusCode::Ok, Some(mime::lookup(path)), Body::File(file));
    response.add_header("Accept-Ranges", "bytes");
    response.add_header("Content-length", (len - start).to_string());
    if let Some(start) = range_start {
        response.add_header("Content-range", format!("bytes {}-{}/{}", start, len - 1, len));
    }
    response
}

fn open_at(path: &Path, start: u64) -> io::Result<File> {
    let mut file = File::open(path)?;
    if start > 0 {
        file.seek(SeekFrom::Start(start))?;
    }
    Ok(file)
}

fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        });
    }
    Ok(entries)
}
