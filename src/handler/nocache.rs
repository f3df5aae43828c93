//! No-cache decorator
//!
//! Wraps another handler and appends the cache-busting headers to every
//! response it produces, whatever the status.

use super::Handler;
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

/// Decorates every response of `H` with `Cache-Control`, `Pragma` and `Expires`
#[derive(Debug, Clone)]
pub struct NoCache<H> {
    inner: H,
}

impl<H: Handler> NoCache<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }

    pub const fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Handler> Handler for NoCache<H> {
    async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        let mut response = self.inner.handle(req).await;
        http::apply_no_cache_headers(response.headers_mut());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
    use hyper::StatusCode;

    /// Answers every request with a fixed status and one header of its own
    struct Fixed(StatusCode);

    impl Handler for Fixed {
        async fn handle(&self, _req: Request<()>) -> Response<Full<Bytes>> {
            Response::builder()
                .status(self.0)
                .header("x-inner", "1")
                .body(Full::new(Bytes::from_static(b"inner")))
                .unwrap()
        }
    }

    fn request(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_headers_appended_after_inner_headers() {
        let handler = NoCache::new(Fixed(StatusCode::OK));
        let response = handler.handle(request("/")).await;

        let names: Vec<&str> = response.headers().keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["x-inner", "cache-control", "pragma", "expires"]);
        assert_eq!(
            response.headers()[CACHE_CONTROL],
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(response.headers()[PRAGMA], "no-cache");
        assert_eq!(response.headers()[EXPIRES], "0");
    }

    #[tokio::test]
    async fn test_every_status_is_decorated() {
        for status in [
            StatusCode::OK,
            StatusCode::MOVED_PERMANENTLY,
            StatusCode::NOT_MODIFIED,
            StatusCode::NOT_FOUND,
            StatusCode::NOT_IMPLEMENTED,
        ] {
            let response = NoCache::new(Fixed(status)).handle(request("/x")).await;
            assert_eq!(response.status(), status);
            assert_eq!(response.headers().get_all(CACHE_CONTROL).iter().count(), 1);
            assert_eq!(response.headers()[EXPIRES], "0");
        }
    }

    #[tokio::test]
    async fn test_status_and_body_untouched() {
        use http_body_util::BodyExt;

        let handler = NoCache::new(Fixed(StatusCode::NOT_FOUND));
        assert_eq!(handler.inner().0, StatusCode::NOT_FOUND);

        let response = handler.handle(request("/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"inner");
    }
}
