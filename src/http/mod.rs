//! HTTP protocol layer module
//!
//! Header, date, MIME and response-building helpers shared by the handlers.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use cache::{apply_no_cache_headers, NO_CACHE_HEADERS};
pub use response::{
    build_304_response, build_404_response, build_501_response, build_error_response,
    build_file_response, build_html_response, build_redirect_response,
};
