//! Content page discovery.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use ogcard_mdx::{parse_page, ParsedPage};

use crate::builder::BuildError;

/// A content page found in the docs directory.
#[derive(Debug, Clone)]
pub struct DocPage {
    /// Source file path
    pub source_path: PathBuf,

    /// Relative path from docs dir
    pub relative_path: PathBuf,

    /// Parsed page
    pub page: ParsedPage,
}

/// Find and parse every Markdown/MDX page under `docs_dir`.
///
/// Pages that cannot be read or whose front matter is malformed are logged
/// and left out. Results are ordered by relative path.
pub fn discover_pages(docs_dir: &Path) -> Result<Vec<DocPage>, BuildError> {
    if !docs_dir.is_dir() {
        return Err(BuildError::ReadError(format!(
            "Docs directory not found: {}",
            docs_dir.display()
        )));
    }

    let mut pages = Vec::new();

    for entry in WalkDir::new(docs_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "mdx" && ext != "md" {
            continue;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Skipping unreadable page {}: {}", path.display(), e);
                continue;
            }
        };

        let page = match parse_page(&content) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping page {}: {}", path.display(), e);
                continue;
            }
        };

        let relative_path = path
            .strip_prefix(docs_dir)
            .unwrap_or(path)
            .to_path_buf();

        pages.push(DocPage {
            source_path: path.to_path_buf(),
            relative_path,
            page,
        });
    }

    pages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(pages)
}
