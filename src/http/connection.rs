use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::task::JoinError;

use crate::http::handler::Handler;
use crate::http::parser::{parse_request, ParseError};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::watchdog::Watchdog;
use crate::http::writer::ResponseWriter;

/// One accepted socket, from accept to close. Exactly one request is read
/// and exactly one response written.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<dyn Handler>,
    watchdog: Watchdog,
    state: ConnectionState,
}

pub enum ConnectionState {
    /// Request line, headers and, for POST, the body
    Reading,
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        handler: Arc<dyn Handler>,
        watchdog: Watchdog,
    ) -> Self {
        Self {
            stream,
            peer,
            handler,
            watchdog,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the session to `Closed`. Every failure is answered or logged
    /// here; nothing escapes to the accept loop.
    pub async fn run(mut self) {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Ok(request) => ConnectionState::Dispatching(request),
                        Err(ParseError::Closed) => {
                            tracing::debug!(peer = %self.peer, "Client closed without a request");
                            ConnectionState::Closed
                        }
                        Err(e) => ConnectionState::Writing(ResponseWriter::new(self.reject(&e))),
                    };
                }

                ConnectionState::Dispatching(request) => {
                    let response = self.dispatch(request).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(response));
                }

                ConnectionState::Writing(writer) => {
                    if let Err(e) = writer.write_to_stream(&mut self.stream).await {
                        tracing::debug!(peer = %self.peer, error = %e, "Failed to write response");
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        let _ = self.stream.shutdown().await;
    }

    async fn read_request(&mut self) -> Result<Request, ParseError> {
        let mut reader = BufReader::new(&mut self.stream);
        parse_request(&mut reader, &self.watchdog).await
    }

    fn reject(&self, error: &ParseError) -> Response {
        if error.is_bad_request() {
            tracing::debug!(peer = %self.peer, error = %error, "Bad request");
            Response::error(StatusCode::BadRequest, &format!("BAD REQUEST: {error}"))
        } else {
            tracing::info!(peer = %self.peer, error = %error, "Request read aborted");
            Response::error(
                StatusCode::InternalServerError,
                &format!("SERVER INTERNAL ERROR: {error}"),
            )
        }
    }

    async fn dispatch(&self, request: Request) -> Response {
        let handler = Arc::clone(&self.handler);
        let method = request.method.clone();
        let uri = request.uri.clone();

        let outcome = tokio::task::spawn_blocking(move || handler.serve(&request)).await;

        let message = match outcome {
            Ok(Ok(response)) => {
                tracing::debug!(
                    peer = %self.peer,
                    method = %method,
                    uri = %uri,
                    status = response.status.as_u16(),
                    "Request served"
                );
                return response;
            }
            Ok(Err(e)) => format!("{e:#}"),
            Err(e) => panic_message(e),
        };

        tracing::error!(
            peer = %self.peer,
            method = %method,
            uri = %uri,
            error = %message,
            "Handler failed"
        );
        Response::error(
            StatusCode::InternalServerError,
            &format!("SERVER INTERNAL ERROR: serve() failed: {message}"),
        )
    }
}

fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return "handler task was cancelled".to_string();
    }
    let payload = error.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
