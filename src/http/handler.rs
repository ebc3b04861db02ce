use crate::http::request::Request;
use crate::http::response::Response;

/// Turns a parsed request into a response.
///
/// Handlers run on the blocking pool, so plain file and socket I/O is fine.
/// An `Err` or a panic becomes `500 Internal Server Error` carrying the
/// message; it never takes down the server.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, request: &Request) -> anyhow::Result<Response>;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> anyhow::Result<Response> + Send + Sync + 'static,
{
    fn serve(&self, request: &Request) -> anyhow::Result<Response> {
        self(request)
    }
}
