//! nanoserve - Embeddable HTTP/1.0 server
//!
//! Core library: request parsing, static file serving and the accept loop.

pub mod config;
pub mod http;
pub mod server;
