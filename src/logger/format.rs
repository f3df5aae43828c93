//! Access log format module
//!
//! Supported formats:
//! - `common` (Common Log Format)
//! - `combined` (common plus referer and user agent)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Response};
use std::net::SocketAddr;
use std::time::Instant;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, captured when the request arrives and completed
/// once the response is built.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// e.g. `HTTP/1.1`
    pub version: String,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub status: u16,
    /// `None` when no body was sent
    pub body_bytes: Option<u64>,
    pub request_time_us: u64,
    started: Instant,
}

impl AccessLogEntry {
    pub fn begin<B>(remote_addr: SocketAddr, req: &Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            remote_addr: remote_addr.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: format!("{:?}", req.version()),
            referer: header(REFERER),
            user_agent: header(USER_AGENT),
            status: 0,
            body_bytes: None,
            request_time_us: 0,
            started: Instant::now(),
        }
    }

    /// Record the outcome of the request
    pub fn complete(&mut self, response: &Response<Full<Bytes>>) {
        self.status = response.status().as_u16();
        self.body_bytes = response.body().size_hint().exact().filter(|n| *n > 0);
        self.request_time_us =
            u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.request_uri(), self.version)
    }

    fn bytes_field(&self) -> String {
        self.body_bytes
            .map_or_else(|| "-".to_string(), |n| n.to_string())
    }

    /// Format the entry; unknown format names are treated as custom patterns
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "json" => self.format_json(),
            pattern => self.format_pattern(pattern),
        }
    }

    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.bytes_field(),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "version": self.version,
            "status": self.status,
            "body_bytes": self.body_bytes.unwrap_or(0),
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$variable` placeholders.
    ///
    /// Variables: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time` (seconds),
    /// `$status`, `$body_bytes_sent`, `$http_referer`, `$http_user_agent`.
    fn format_pattern(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longest names first so `$request` never eats `$request_uri`
        let vars = [
            ("$http_user_agent", self.user_agent.clone().unwrap_or_else(|| "-".into())),
            ("$body_bytes_sent", self.bytes_field()),
            ("$request_method", self.method.clone()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".into())),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$remote_addr", self.remote_addr.clone()),
            ("$request_uri", self.request_uri()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
        ];

        vars.iter()
            .fold(pattern.to_string(), |out, (name, value)| out.replace(name, value))
    }
}
