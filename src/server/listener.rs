use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::files::StaticFiles;
use crate::http::handler::Handler;
use crate::http::watchdog::{Watchdog, DEFAULT_HEADER_TIMEOUT};

/// Pause between accepts after the listener reports an error.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A listening server and its accept loop.
///
/// The socket is bound before construction returns. Sessions already
/// running when [`Server::stop`] is called finish on their own.
pub struct Server {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    accept_loop: Option<JoinHandle<()>>,
}

/// Options for [`Server`]. Without a handler the working directory is
/// served with listings enabled.
pub struct ServerBuilder {
    addr: SocketAddr,
    idle_timeout: Option<Duration>,
    header_timeout: Duration,
    handler: Option<Arc<dyn Handler>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            idle_timeout: None,
            header_timeout: DEFAULT_HEADER_TIMEOUT,
            handler: None,
        }
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    pub fn bind_address(mut self, ip: IpAddr) -> Self {
        self.addr.set_ip(ip);
        self
    }

    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Bounds the request-line and body reads of a session, on top of the
    /// header deadline.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn header_timeout(mut self, timeout: Duration) -> Self {
        self.header_timeout = timeout;
        self
    }

    pub fn handler(mut self, handler: impl Handler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Binds the listener and starts accepting. Fails if the address is
    /// unavailable.
    pub async fn bind(self) -> io::Result<Server> {
        let handler: Arc<dyn Handler> = match self.handler {
            Some(handler) => handler,
            None => Arc::new(StaticFiles::current_dir()?),
        };
        let watchdog = Watchdog::new(self.header_timeout, self.idle_timeout);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let (shutdown, stop_rx) = watch::channel(false);
        let accept_loop = tokio::spawn(accept_loop(listener, stop_rx, handler, watchdog));

        Ok(Server {
            local_addr,
            shutdown,
            accept_loop: Some(accept_loop),
        })
    }
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Serves the working directory on `port`, all interfaces.
    pub async fn bind(port: u16) -> io::Result<Self> {
        Self::builder().port(port).bind().await
    }

    pub async fn bind_to(port: u16, ip: IpAddr) -> io::Result<Self> {
        Self::builder().port(port).bind_address(ip).bind().await
    }

    pub async fn with_idle_timeout(port: u16, ip: IpAddr, idle_timeout: Duration) -> io::Result<Self> {
        Self::builder()
            .port(port)
            .bind_address(ip)
            .idle_timeout(idle_timeout)
            .bind()
            .await
    }

    /// Serves `static_files.root` with the configured address and timeouts.
    pub async fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let mut builder = Self::builder()
            .addr(cfg.listen_addr()?)
            .header_timeout(cfg.header_timeout())
            .handler(StaticFiles::new(
                cfg.static_files.root.clone(),
                cfg.static_files.directory_listing,
            ));
        if let Some(idle) = cfg.idle_timeout() {
            builder = builder.idle_timeout(idle);
        }
        Ok(builder.bind().await?)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the accept loop is still running.
    pub fn is_running(&self) -> bool {
        self.accept_loop
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops accepting and waits for the accept loop to exit. The listener
    /// is closed when this returns, so the port can be bound again.
    /// Calling it again is a no-op.
    pub async fn stop(&mut self) {
        let Some(accept_loop) = self.accept_loop.take() else {
            return;
        };
        let _ = self.shutdown.send(true);
        if let Err(e) = accept_loop.await {
            warn!(error = %e, "Accept loop ended abnormally");
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    mut stop_rx: watch::Receiver<bool>,
    handler: Arc<dyn Handler>,
    watchdog: Watchdog,
) {
    loop {
        tokio::select! {
            biased;

            _ = stop_rx.changed() => {
                info!("Server stopping");
                break;
            }

            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    debug!("Accepted connection from {}", peer);
                    let conn = Connection::new(socket, peer, Arc::clone(&handler), watchdog);
                    tokio::spawn(conn.run());
                }
                Err(e) if *stop_rx.borrow() => {
                    info!(error = %e, "Listener closed while stopping");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Accept failed, backing off");
                    if back_off(&mut stop_rx).await {
                        info!("Server stopping");
                        break;
                    }
                }
            }
        }
    }
}

/// Pause after a failed accept so a persistent error (EMFILE and friends)
/// does not spin. Returns `true` if the server was stopped meanwhile.
async fn back_off(stop_rx: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = stop_rx.changed() => true,
        _ = tokio::time::sleep(ACCEPT_BACKOFF) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn back_off_waits_before_next_accept() {
        let (_stop, mut stop_rx) = watch::channel(false);

        let started = Instant::now();
        assert!(!back_off(&mut stop_rx).await);
        assert!(started.elapsed() >= ACCEPT_BACKOFF - Duration::from_millis(5));
    }

    #[tokio::test]
    async fn back_off_returns_early_on_stop() {
        let (stop, mut stop_rx) = watch::channel(false);
        stop.send(true).unwrap();

        let started = Instant::now();
        assert!(back_off(&mut stop_rx).await);
        assert!(started.elapsed() < ACCEPT_BACKOFF);
    }

    #[tokio::test]
    async fn back_off_returns_early_when_server_dropped() {
        let (stop, mut stop_rx) = watch::channel(false);
        drop(stop);

        assert!(back_off(&mut stop_rx).await);
    }
}
