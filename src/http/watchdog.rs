//! Read deadlines for a single connection.
//!
//! The request line and headers always run under one deadline, so a client
//! that connects and sends nothing, or stops halfway, cannot pin its session
//! forever. Expiry drops the pending read, which releases the socket's read
//! half exactly like shutting it down, and the session answers with an error
//! response. The idle-session timeout, when configured, additionally bounds
//! the request line and the form body.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::http::parser::ParseError;

/// How long a client may take to send its request line and headers.
pub const DEFAULT_HEADER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watchdog {
    header_timeout: Duration,
    idle_timeout: Option<Duration>,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_TIMEOUT, None)
    }
}

impl Watchdog {
    pub fn new(header_timeout: Duration, idle_timeout: Option<Duration>) -> Self {
        Self {
            header_timeout,
            idle_timeout,
        }
    }

    pub fn header_timeout(&self) -> Duration {
        self.header_timeout
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Runs the request-line and header read, aborting it once the header
    /// deadline passes.
    ///
    /// A read that finishes in time is returned untouched; the pending timer
    /// is simply dropped.
    pub async fn headers<F, T>(&self, read: F) -> Result<T, ParseError>
    where
        F: Future<Output = Result<T, ParseError>>,
    {
        match timeout(self.header_timeout, read).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(
                    timeout_ms = self.header_timeout.as_millis() as u64,
                    "Request head read timed out"
                );
                Err(ParseError::TimedOut("request head"))
            }
        }
    }

    /// Runs any other read under the idle-session timeout, if one is set.
    pub async fn idle<F, T>(&self, stage: &'static str, read: F) -> Result<T, ParseError>
    where
        F: Future<Output = Result<T, ParseError>>,
    {
        let Some(limit) = self.idle_timeout else {
            return read.await;
        };

        timeout(limit, read)
            .await
            .map_err(|_| ParseError::TimedOut(stage))?
    }
}
