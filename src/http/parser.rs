use std::collections::HashMap;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::codec::{decode, decode_params, DecodeError};
use crate::http::request::{Method, Params, Request};
use crate::http::watchdog::Watchdog;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing method in request line")]
    MissingMethod,
    #[error("missing URI in request line")]
    MissingUri,
    #[error("bad percent-encoding: {0}")]
    Decode(#[from] DecodeError),
    #[error("timed out reading {0}")]
    TimedOut(&'static str),
    #[error("connection closed before a request line was sent")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Whether the client sent something malformed, as opposed to the read
    /// itself failing.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ParseError::MissingMethod | ParseError::MissingUri | ParseError::Decode(_)
        )
    }
}

/// Reads one request from `reader`.
///
/// The request line and headers share the header deadline, so a client that
/// connects and stays silent is cut off like one that stalls mid-headers.
/// The idle timeout, when set, also bounds the request line and a POST body.
/// Only a complete parse yields a `Request`.
pub async fn parse_request<R>(reader: &mut R, watchdog: &Watchdog) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let (method, uri, mut params, headers) = watchdog.headers(read_head(reader, watchdog)).await?;

    let mut body = Vec::new();
    if method == Method::POST {
        let length = headers
            .get("content-length")
            .and_then(|v| v.trim().parse::<usize>().ok());
        body = watchdog.idle("body", read_body(reader, length)).await?;
        decode_params(String::from_utf8_lossy(&body).trim(), &mut params)?;
    }

    Ok(Request {
        method,
        uri,
        params,
        headers,
        body: body.into(),
    })
}

/// Request line and headers. A malformed request line fails before any
/// header is read.
async fn read_head<R>(
    reader: &mut R,
    watchdog: &Watchdog,
) -> Result<(Method, String, Params, HashMap<String, String>), ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = watchdog
        .idle("request line", read_line(reader))
        .await?
        .ok_or(ParseError::Closed)?;

    let (method, raw_uri) = split_request_line(&line)?;
    let mut params = Params::new();
    let uri = split_uri(raw_uri, &mut params)?;

    let headers = read_headers(reader).await?;
    Ok((method, uri, params, headers))
}

/// Splits `METHOD SP URI [SP VERSION]`. The version is ignored.
pub fn split_request_line(line: &str) -> Result<(Method, &str), ParseError> {
    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(ParseError::MissingMethod)?;
    let uri = parts.next().ok_or(ParseError::MissingUri)?;
    Ok((Method::from(method), uri))
}

/// Decodes the path of `raw` and collects its query string into `params`.
pub fn split_uri(raw: &str, params: &mut Params) -> Result<String, ParseError> {
    match raw.split_once('?') {
        Some((path, query)) => {
            decode_params(query, params)?;
            Ok(decode(path)?)
        }
        None => Ok(decode(raw)?),
    }
}

/// Splits `Name: value`, lower-casing the name. `None` if there is no colon.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
}

async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

async fn read_headers<R>(reader: &mut R) -> Result<HashMap<String, String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = HashMap::new();

    while let Some(line) = read_line(reader).await? {
        if line.trim().is_empty() {
            break;
        }
        match parse_header_line(&line) {
            Some((name, value)) => {
                headers.insert(name, value);
            }
            None => tracing::debug!(line = %line, "Skipping header line without a colon"),
        }
    }

    Ok(headers)
}

/// Reads `length` bytes, or without a length until a CRLF has been seen.
async fn read_body<R>(reader: &mut R, length: Option<usize>) -> Result<Vec<u8>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();

    match length {
        Some(length) => {
            (&mut *reader).take(length as u64).read_to_end(&mut body).await?;
        }
        None => loop {
            let n = reader.read_until(b'\n', &mut body).await?;
            if n == 0 || body.ends_with(b"\r\n") {
                break;
            }
        },
    }

    Ok(body)
}
