// Server module entry point
// Owns the listener and runs the accept loop: Unbound -> Listening -> Terminated

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::handler::{Handler, NoCache, StaticFiles};
use crate::logger;

pub use listener::bind_listener;
pub use signal::shutdown_signal;

/// A bound HTTP server.
///
/// Only [`Server::bind`] creates one, so holding a `Server` means the port is
/// already listening. The socket is closed when the server is dropped,
/// which happens when [`Server::run_until`] returns.
pub struct Server<H> {
    listener: TcpListener,
    handler: Arc<H>,
    access_log: Option<Arc<str>>,
}

impl<H: Handler> Server<H> {
    /// Bind `addr` and prepare to serve it with `handler`.
    ///
    /// Fails immediately if the address is in use or not permitted; there
    /// is no retry and no fallback port.
    pub fn bind(addr: SocketAddr, handler: H) -> io::Result<Self> {
        Ok(Self {
            listener: bind_listener(addr)?,
            handler: Arc::new(handler),
            access_log: None,
        })
    }

    /// Log every request in `format` (see [`logger::AccessLogEntry::format`])
    #[must_use]
    pub fn with_access_log(mut self, format: &str) -> Self {
        self.access_log = Some(Arc::from(format));
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Accept connections forever
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Accept connections until `shutdown` resolves, then close the listener.
    ///
    /// Connections already being served run to completion on their own tasks.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => connection::serve_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&self.handler),
                            self.access_log.clone(),
                        ),
                        Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                    }
                }

                () = &mut shutdown => break,
            }
        }
    }
}

/// Bind the configured site and print the banner.
///
/// The banner is written only after the listener is bound; every error
/// (bad host, missing root, port taken) returns before it.
pub fn start(cfg: &Config) -> io::Result<Server<NoCache<StaticFiles>>> {
    let addr = cfg
        .socket_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let root = cfg.root_dir()?;

    let server = Server::bind(addr, NoCache::new(StaticFiles::new(root))).map_err(|e| {
        logger::log_bind_failed(&addr, &e);
        e
    })?;
    let server = if cfg.logging.access_log {
        server.with_access_log(&cfg.logging.access_log_format)
    } else {
        server
    };

    logger::log_server_start(&server.local_addr()?);
    Ok(server)
}
