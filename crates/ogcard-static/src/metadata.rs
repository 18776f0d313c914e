//! Lookup from illustration file names to the page metadata that references them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ogcard_mdx::PageMetadata;
use ogcard_render::naming::illustration_for_image_ref;

use crate::builder::BuildError;
use crate::pages::{discover_pages, DocPage};

#[derive(Debug, Clone)]
struct Entry {
    source_path: PathBuf,
    metadata: PageMetadata,
}

/// Page metadata keyed by the illustration each page's card is rendered from.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    entries: HashMap<String, Entry>,
}

impl MetadataIndex {
    /// Scan `docs_dir` and index every page with valid card metadata.
    pub fn scan(docs_dir: &Path) -> Result<Self, BuildError> {
        let pages = discover_pages(docs_dir)?;
        Ok(Self::from_pages(&pages))
    }

    /// Index already discovered pages.
    ///
    /// Pages missing a required field, or whose `image` does not point at a
    /// card, are skipped. When several pages reference the same card the
    /// first one in path order wins.
    pub fn from_pages(pages: &[DocPage]) -> Self {
        let mut entries: HashMap<String, Entry> = HashMap::new();

        for page in pages {
            let metadata = match page.page.page_metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("No card metadata in {}: {}", page.source_path.display(), e);
                    continue;
                }
            };

            let Some(illustration) = illustration_for_image_ref(&metadata.image) else {
                tracing::debug!(
                    "Image of {} is not a social card: {}",
                    page.source_path.display(),
                    metadata.image
                );
                continue;
            };

            if let Some(existing) = entries.get(&illustration) {
                tracing::warn!(
                    "{} and {} both use {}; keeping the first",
                    existing.source_path.display(),
                    page.source_path.display(),
                    illustration
                );
                continue;
            }

            entries.insert(
                illustration,
                Entry {
                    source_path: page.source_path.clone(),
                    metadata,
                },
            );
        }

        Self { entries }
    }

    /// Metadata for an illustration file name such as `undraw_agile.svg`.
    pub fn lookup(&self, illustration: &str) -> Option<&PageMetadata> {
        self.entries.get(illustration).map(|e| &e.metadata)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
