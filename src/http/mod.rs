//! HTTP/1.0 protocol implementation.
//!
//! One request per connection: the server reads a request, hands it to a
//! [`handler::Handler`], writes the response and closes the socket.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection session driving the state machine below
//! - **`parser`**: Reads the request line, headers and form body off the socket
//! - **`watchdog`**: Read deadlines that keep a stalled client from pinning a session
//! - **`codec`**: Percent-decoding of paths, query strings and form bodies
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`handler`**: The pluggable `serve()` hook
//! - **`files`**: The default handler, serving a directory tree
//! - **`listing`**: HTML directory listings
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, headers (deadline), POST body
//!        └──────┬──────┘
//!               │ Request parsed          ── malformed / timed out ──┐
//!               ▼                                                    │
//!        ┌──────────────────┐                                        │
//!        │   Dispatching    │ ← handler runs on the blocking pool    │
//!        └──────┬───────────┘                                        │
//!               │ Response ready                                     │
//!               ▼                                                    │
//!        ┌──────────────────┐                                        │
//!        │    Writing       │ ← 400 / 500 error response  ◄──────────┘
//!        └──────┬───────────┘
//!               │ Response sent (or client gone)
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use nanoserve::http::response::{Response, StatusCode};
//! use nanoserve::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = Server::builder()
//!         .port(8080)
//!         .handler(|req: &nanoserve::http::request::Request| {
//!             anyhow::Ok(Response::text(StatusCode::Ok, "text/plain", &format!("hello {}", req.uri)))
//!         })
//!         .bind()
//!         .await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.stop().await;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod files;
pub mod handler;
pub mod listing;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod watchdog;
pub mod writer;
