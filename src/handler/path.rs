//! Request path translation
//!
//! Maps a URL path onto the served directory without ever leaving it.

use std::path::{Path, PathBuf};

/// Percent-decode a URL path; invalid UTF-8 sequences are replaced
pub fn decode_path(uri_path: &str) -> String {
    let bytes = urlencoding::decode_binary(uri_path.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Translate a URL path into a file system path under `root`.
///
/// The decoded path is normalized lexically: empty and `.` segments are
/// skipped, `..` removes the previous segment and stops at the root.
/// Segments that would be interpreted as separators or drive prefixes by
/// the platform are dropped.
pub fn translate_path(root: &Path, uri_path: &str) -> PathBuf {
    let decoded = decode_path(uri_path);
    let mut segments: Vec<&str> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_unsafe_segment(s) => {}
            s => segments.push(s),
        }
    }

    segments
        .into_iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

fn is_unsafe_segment(segment: &str) -> bool {
    segment.contains(['\\', '\0', ':'])
}
