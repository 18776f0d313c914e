//! Chapter index generation.
//!
//! Writes the JSON list of chapters the site's chapter listing renders.

use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use ogcard_render::naming::illustration_url;

use crate::builder::BuildError;
use crate::pages::{discover_pages, DocPage};

/// One chapter card in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub path: String,
    pub description: String,
}

/// Configuration for the chapter index.
#[derive(Debug, Clone)]
pub struct ChapterConfig {
    /// Source docs directory
    pub docs_dir: PathBuf,

    /// JSON file to write
    pub output_file: PathBuf,

    /// Page ids never listed as chapters
    pub exclude: Vec<String>,
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_file: PathBuf::from("src/data/chapters.json"),
            exclude: vec!["introduction".to_string(), "contributors".to_string()],
        }
    }
}

/// Result of writing the chapter index.
#[derive(Debug)]
pub struct ChapterReport {
    pub chapters: usize,
    pub output_file: PathBuf,
}

/// Build chapter entries from discovered pages, sorted by title.
///
/// Pages without an id, description or image, and excluded ids, are left out.
pub fn collect_chapters(pages: &[DocPage], exclude: &[String]) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = pages
        .iter()
        .filter_map(|page| {
            let fm = page.page.frontmatter.as_ref()?;
            let id = fm.id.as_deref().filter(|id| !id.is_empty())?;
            if exclude.iter().any(|e| e == id) {
                return None;
            }
            let image = fm.image.as_deref().filter(|v| !v.trim().is_empty())?;
            let description = fm.description.as_deref().filter(|v| !v.trim().is_empty())?;

            let title = fm
                .title
                .clone()
                .or_else(|| page.page.first_heading.clone())
                .unwrap_or_else(|| id.to_string());

            let path = fm
                .slug
                .clone()
                .unwrap_or_else(|| format!("/{id}"));

            Some(Chapter {
                id: id.to_string(),
                title,
                image_url: illustration_url(image),
                path,
                description: description.to_string(),
            })
        })
        .collect();

    chapters.sort_by(|a, b| compare_titles(&a.title, &b.title));
    chapters
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Scan the docs directory and write the chapter index.
pub fn write_chapter_index(config: &ChapterConfig) -> Result<ChapterReport, BuildError> {
    let pages = discover_pages(&config.docs_dir)?;
    let chapters = collect_chapters(&pages, &config.exclude);

    if let Some(parent) = config.output_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", parent.display(), e)))?;
        }
    }

    let json = serde_json::to_string_pretty(&chapters)
        .map_err(|e| BuildError::WriteError(e.to_string()))?;

    fs::write(&config.output_file, json).map_err(|e| {
        BuildError::WriteError(format!("{}: {}", config.output_file.display(), e))
    })?;

    Ok(ChapterReport {
        chapters: chapters.len(),
        output_file: config.output_file.clone(),
    })
}
