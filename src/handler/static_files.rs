//! Static file serving module
//!
//! Serves a directory tree: files, index files, directory listings, trailing
//! slash redirects and `If-Modified-Since` revalidation.

use super::{listing, path, Handler};
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files served in place of a directory listing, in order of preference
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serves files below `root`
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn serve_directory(
        &self,
        req: &Request<()>,
        dir: &Path,
        is_head: bool,
    ) -> Response<Full<Bytes>> {
        let uri = req.uri();

        // Relative links in the page only resolve correctly under a trailing slash
        if !uri.path().ends_with('/') {
            let location = match uri.query() {
                Some(query) => format!("{}/?{query}", uri.path()),
                None => format!("{}/", uri.path()),
            };
            return http::build_redirect_response(&location);
        }

        for index in INDEX_FILES {
            let candidate = dir.join(index);
            if let Ok(metadata) = fs::metadata(&candidate).await {
                if metadata.is_file() {
                    return serve_file(&candidate, &metadata, req.headers(), is_head).await;
                }
            }
        }

        match listing::render_listing(dir, &path::decode_path(uri.path())).await {
            Ok(html) => http::build_html_response(html, is_head),
            Err(e) => {
                logger::log_warning(&format!("Cannot list directory '{}': {e}", dir.display()));
                http::build_404_response("No permission to list directory", is_head)
            }
        }
    }
}

impl Handler for StaticFiles {
    async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        let is_head = match *req.method() {
            Method::GET => false,
            Method::HEAD => true,
            ref other => return http::build_501_response(other),
        };

        let uri_path = req.uri().path();
        let fs_path = path::translate_path(&self.root, uri_path);

        // Missing files are the common case, not worth a log line
        let Ok(metadata) = fs::metadata(&fs_path).await else {
            return http::build_404_response("File not found", is_head);
        };

        if metadata.is_dir() {
            return self.serve_directory(&req, &fs_path, is_head).await;
        }

        // A file addressed as a directory
        if uri_path.ends_with('/') {
            return http::build_404_response("File not found", is_head);
        }

        serve_file(&fs_path, &metadata, req.headers(), is_head).await
    }
}

async fn serve_file(
    file_path: &Path,
    metadata: &Metadata,
    headers: &HeaderMap,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
    if cache::is_not_modified(header(IF_MODIFIED_SINCE), header(IF_NONE_MATCH), modified) {
        return http::build_304_response(last_modified.as_deref());
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return http::build_404_response("File not found", is_head);
        }
    };

    http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file_path),
        last_modified.as_deref(),
        is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
    use hyper::StatusCode;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir_all(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js/app.js"), "console.log('v1');").unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.htm"), "docs").unwrap();
        dir
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    async fn body(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file() {
        let dir = site();
        let files = StaticFiles::new(dir.path());
        assert_eq!(files.root(), dir.path());

        let response = files.handle(get("/js/app.js")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/javascript");
        assert_eq!(response.headers()[CONTENT_LENGTH], "18");
        assert!(response.headers().contains_key(LAST_MODIFIED));
        assert_eq!(body(response).await, "console.log('v1');");
    }

    #[tokio::test]
    async fn test_query_string_ignored() {
        let dir = site();
        let response = StaticFiles::new(dir.path()).handle(get("/js/app.js?v=123")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = site();
        let response = StaticFiles::new(dir.path()).handle(get("/nope.js")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.contains("File not found"));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash() {
        let dir = site();
        let response = StaticFiles::new(dir.path()).handle(get("/js/app.js/")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_files() {
        let dir = site();
        let files = StaticFiles::new(dir.path());

        let response = files.handle(get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body(response).await, "<h1>home</h1>");

        let response = files.handle(get("/docs/")).await;
        assert_eq!(body(response).await, "docs");
    }

    #[tokio::test]
    async fn test_directory_redirect() {
        let dir = site();
        let files = StaticFiles::new(dir.path());

        let response = files.handle(get("/js")).await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/js/");

        let response = files.handle(get("/js?dev=1")).await;
        assert_eq!(response.headers()[LOCATION], "/js/?dev=1");
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let dir = site();
        let response = StaticFiles::new(dir.path()).handle(get("/js/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let html = body(response).await;
        assert!(html.contains("Directory listing for /js/"));
        assert!(html.contains("<a href=\"app.js\">app.js</a>"));
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let parent = tempfile::tempdir().unwrap();
        std::fs::write(parent.path().join("secret.txt"), "secret").unwrap();
        std::fs::create_dir(parent.path().join("site")).unwrap();
        std::fs::write(parent.path().join("site/secret.txt"), "public").unwrap();

        let files = StaticFiles::new(parent.path().join("site"));
        let response = files.handle(get("/../secret.txt")).await;
        assert_eq!(body(response).await, "public");

        let response = files.handle(get("/%2e%2e/%2e%2e/secret.txt")).await;
        assert_eq!(body(response).await, "public");
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = site();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/index.html")
            .body(())
            .unwrap();
        let response = StaticFiles::new(dir.path()).handle(req).await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_head_request() {
        let dir = site();
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/js/app.js")
            .body(())
            .unwrap();
        let response = StaticFiles::new(dir.path()).handle(req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "18");
        assert_eq!(body(response).await, "");
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let dir = site();
        let files = StaticFiles::new(dir.path());

        let first = files.handle(get("/js/app.js")).await;
        let last_modified = first.headers()[LAST_MODIFIED].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/js/app.js")
            .header(IF_MODIFIED_SINCE, &last_modified)
            .body(())
            .unwrap();
        let response = files.handle(req).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(body(response).await, "");

        let req = Request::builder()
            .uri("/js/app.js")
            .header(IF_MODIFIED_SINCE, "Thu, 01 Jan 1970 00:00:00 GMT")
            .body(())
            .unwrap();
        assert_eq!(files.handle(req).await.status(), StatusCode::OK);

        let req = Request::builder()
            .uri("/js/app.js")
            .header(IF_MODIFIED_SINCE, &last_modified)
            .header(IF_NONE_MATCH, "\"whatever\"")
            .body(())
            .unwrap();
        assert_eq!(files.handle(req).await.status(), StatusCode::OK);
    }
}
