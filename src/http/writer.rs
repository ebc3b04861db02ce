use chrono::{DateTime, Utc};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.0";

/// Formats `time` the way the `Date` header expects it.
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Status line, `Content-Type`, `Date` (unless the handler set one), the
/// handler's headers and the blank line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(format!("{} {}\r\n", HTTP_VERSION, resp.status).as_bytes());

    if let Some(mime) = &resp.mime_type {
        buf.extend_from_slice(format!("Content-Type: {mime}\r\n").as_bytes());
    }

    if resp.header("Date").is_none() {
        buf.extend_from_slice(format!("Date: {}\r\n", http_date(Utc::now())).as_bytes());
    }

    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// A response ready to go out: serialized head plus the body it streams.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        let head = serialize_head(&response);
        Self {
            head,
            body: response.body,
        }
    }

    /// Writes head and body, then flushes. The body is dropped on every path
    /// out of here.
    pub async fn write_to_stream<W>(self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;

        match self.body {
            Body::Empty => {}
            Body::Bytes(bytes) => stream.write_all(&bytes).await?,
            Body::File(file) => {
                let mut file = tokio::fs::File::from_std(file);
                tokio::io::copy(&mut file, stream).await?;
            }
        }

        stream.flush().await
    }
}

/// Serializes `response` onto `stream`.
pub async fn write_response<W>(stream: &mut W, response: Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ResponseWriter::new(response).write_to_stream(stream).await
}
