//! Directory listing page

use crate::http::response::escape_html;
use std::io;
use std::path::Path;
use tokio::fs;

struct ListingEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

impl ListingEntry {
    fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }

    fn label(&self) -> String {
        // A link to a directory is shown as a link but still navigates into it
        let suffix = if self.is_symlink {
            "@"
        } else if self.is_dir {
            "/"
        } else {
            ""
        };
        format!("{}{suffix}", escape_html(&self.name))
    }
}

async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory gets a directory href
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the HTML listing of `dir`, titled with the decoded request path
pub async fn render_listing(dir: &Path, display_path: &str) -> io::Result<String> {
    let entries = read_entries(dir).await?;
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.href(),
            entry.label()
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}
