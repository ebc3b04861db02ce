use std::fmt;
use std::fs::File;
use std::sync::RwLock;

use bytes::Bytes;
use encoding_rs::Encoding;

use crate::http::codec::escape_html;

/// Character encoding used by [`Response::text`]; `None` means UTF-8.
static OUTPUT_ENCODING: RwLock<Option<String>> = RwLock::new(None);

/// Sets the process-wide encoding for text responses, by WHATWG label
/// (`"utf-8"`, `"iso-8859-1"`, `"shift_jis"`, ...).
///
/// An unknown label is accepted here; text responses then have an empty
/// body.
pub fn set_output_encoding(label: Option<&str>) {
    let mut guard = OUTPUT_ENCODING
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = label.map(str::to_string);
}

pub fn output_encoding() -> Option<String> {
    OUTPUT_ENCODING
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Converts handler text to bytes in the configured output encoding.
pub fn encode_text(text: &str) -> Bytes {
    let Some(label) = output_encoding() else {
        return Bytes::copy_from_slice(text.as_bytes());
    };

    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) => {
            let (bytes, _, _) = encoding.encode(text);
            Bytes::copy_from_slice(&bytes)
        }
        None => {
            tracing::debug!(encoding = %label, "Unknown output encoding, sending empty body");
            Bytes::new()
        }
    }
}

/// HTTP status codes the server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use nanoserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

impl fmt::Display for StatusCode {
    /// Formats as it appears on the status line, e.g. `200 OK`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Response payload. The writer takes ownership and drops it once sent,
/// which closes any open file.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Bytes),
    /// A file positioned at the first byte to send.
    File(File),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Bytes(b) => b.is_empty(),
            Body::File(_) => false,
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Bytes(v.into())
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Bytes(b)
    }
}

impl From<File> for Body {
    fn from(f: File) -> Self {
        Body::File(f)
    }
}

/// A response produced by a handler and consumed by the writer.
///
/// The status is mandatory by construction. Headers keep insertion order.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Sent as `Content-Type` when present
    pub mime_type: Option<String>,
    /// Handler-supplied headers, written in order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .mime_type("application/json")
///     .header("Cache-Control", "no-cache")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    mime_type: Option<String>,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            mime_type: None,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Appends a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a text body, encoded with the process-wide output encoding.
    pub fn text(mut self, text: &str) -> Self {
        self.body = Body::Bytes(encode_text(text));
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            mime_type: self.mime_type,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    pub fn new(status: StatusCode, mime_type: Option<&str>, body: impl Into<Body>) -> Self {
        Self {
            status,
            mime_type: mime_type.map(str::to_string),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A text response in the configured output encoding.
    pub fn text(status: StatusCode, mime_type: &str, text: &str) -> Self {
        Self::new(status, Some(mime_type), encode_text(text))
    }

    /// A `text/plain` response carrying `message`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::text(status, "text/plain", message)
    }

    /// A `301` pointing at `location`, which must already be a valid URI.
    /// The HTML body shows it escaped.
    pub fn redirect(location: &str) -> Self {
        let shown = escape_html(location);
        let mut response = Self::text(
            StatusCode::MovedPermanently,
            "text/html",
            &format!("<html><body>Redirected: <a href=\"{shown}\">{shown}</a></body></html>"),
        );
        response.add_header("Location", location);
        response
    }

    /// Appends a header to be written after `Content-Type` and `Date`.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Looks up a handler-supplied header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
