//! Request handler module
//!
//! A [`Handler`] turns a request head into a complete response. Handlers
//! compose: [`NoCache`] wraps any handler and decorates what it returns,
//! [`StaticFiles`] serves a directory tree.

mod listing;
mod nocache;
pub mod path;
mod static_files;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;

pub use nocache::NoCache;
pub use static_files::{StaticFiles, INDEX_FILES};

/// Produces the response for one request.
///
/// Only the request head is passed in; the file server never reads request
/// bodies. Handlers cannot fail: every outcome, including I/O errors, is
/// expressed as an HTTP response.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: Request<()>) -> impl Future<Output = Response<Full<Bytes>>> + Send;
}
