//! HTTP cache control module
//!
//! Cache-busting response headers and `Last-Modified` / `If-Modified-Since`
//! handling.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use std::time::SystemTime;

/// Headers that forbid clients and intermediaries from storing or reusing a
/// response, in the order they are sent.
pub const NO_CACHE_HEADERS: [(HeaderName, &str); 3] = [
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Append the cache-busting headers after whatever is already present
pub fn apply_no_cache_headers(headers: &mut HeaderMap) {
    for (name, value) in NO_CACHE_HEADERS {
        headers.append(name, HeaderValue::from_static(value));
    }
}

/// Format a timestamp for `Last-Modified`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Parse an `If-Modified-Since` value; unparseable dates are ignored
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Decide whether a conditional GET can be answered with 304.
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no
/// entity tags are issued, its presence always means "send the file".
/// Modification times are compared at whole-second precision.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    if_none_match: Option<&str>,
    modified: Option<SystemTime>,
) -> bool {
    if if_none_match.is_some() {
        return false;
    }
    let (Some(since), Some(modified)) = (if_modified_since.and_then(parse_http_date), modified)
    else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}
