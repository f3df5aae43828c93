// Connection handling module
// Serves one accepted TCP connection on its own task

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::handler::Handler;
use crate::logger::{self, AccessLogEntry};

/// Spawn a task that drives HTTP/1.1 on `stream` until the client goes away.
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `peer_addr` - The peer's socket address, used by the access log
/// * `handler` - Shared request handler
/// * `access_log` - Access log format, `None` disables access logging
pub fn serve_connection<H: Handler>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<H>,
    access_log: Option<Arc<str>>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let handler = Arc::clone(&handler);
            let access_log = access_log.clone();
            async move {
                let response = dispatch(req, peer_addr, &*handler, access_log.as_deref()).await;
                Ok::<_, Infallible>(response)
            }
        });

        // Title case so header names go out as `Cache-Control`, not `cache-control`
        let mut builder = http1::Builder::new();
        builder.keep_alive(true).title_case_headers(true);

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}

async fn dispatch<H: Handler>(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    handler: &H,
    access_log: Option<&str>,
) -> Response<Full<Bytes>> {
    // Request bodies are never read
    let (parts, _body) = req.into_parts();
    let req = Request::from_parts(parts, ());

    let Some(format) = access_log else {
        return handler.handle(req).await;
    };

    let mut entry = AccessLogEntry::begin(peer_addr, &req);
    let response = handler.handle(req).await;
    entry.complete(&response);
    logger::log_access(&entry, format);
    response
}
