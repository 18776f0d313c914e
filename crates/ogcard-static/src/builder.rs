//! Social card batch builder.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ogcard_render::naming::{is_illustration, output_file_name};
use ogcard_render::{CardText, ImageComposer, Rasterizer, Theme};

use crate::metadata::MetadataIndex;

/// Configuration for a social card build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the cover illustrations
    pub illustrations_dir: PathBuf,

    /// Output directory for generated cards
    pub output_dir: PathBuf,

    /// Content pages whose front matter references the cards
    pub docs_dir: PathBuf,

    /// Card colors and fonts
    pub theme: Theme,

    /// Extra directories to load fonts from
    pub font_dirs: Vec<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            illustrations_dir: PathBuf::from("static/img"),
            output_dir: PathBuf::from("static/img/social"),
            docs_dir: PathBuf::from("docs"),
            theme: Theme::default(),
            font_dirs: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildReport {
    /// Illustrations matching the naming convention
    pub found: usize,

    /// Cards written
    pub generated: usize,

    /// Illustrations no page references
    pub skipped: usize,

    /// Illustrations that failed to render or write
    pub failed: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read directory: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Per-illustration failure; logged, never aborts the batch.
#[derive(Debug, thiserror::Error)]
enum CardError {
    #[error("read failed: {0}")]
    Read(std::io::Error),

    #[error("{0}")]
    Render(#[from] ogcard_render::RenderError),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("write failed: {0}")]
    Write(std::io::Error),
}

enum Outcome {
    Generated(PathBuf),
    Skipped,
}

/// Generates one social card per referenced cover illustration.
pub struct SocialImageBuilder {
    config: BuildConfig,
    composer: Arc<ImageComposer>,
}

impl SocialImageBuilder {
    /// Create a new builder. Loads the font database.
    pub fn new(config: BuildConfig) -> Self {
        let rasterizer = Rasterizer::with_font_dirs(&config.font_dirs);
        let composer = Arc::new(ImageComposer::new(config.theme.clone(), rasterizer));
        Self { config, composer }
    }

    /// Render every referenced illustration, one at a time.
    ///
    /// Each render runs on the blocking pool and is awaited before the next
    /// file is read.
    pub async fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        if !tokio::fs::try_exists(&self.config.output_dir).await.unwrap_or(false) {
            tracing::info!("Creating output directory {}", self.config.output_dir.display());
        }
        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| {
                BuildError::WriteError(format!("{}: {}", self.config.output_dir.display(), e))
            })?;

        let illustrations = self.discover_illustrations().await?;
        tracing::info!("Found {} illustrations to process", illustrations.len());

        let docs_dir = self.config.docs_dir.clone();
        let index = tokio::task::spawn_blocking(move || MetadataIndex::scan(&docs_dir))
            .await
            .map_err(|e| BuildError::ReadError(format!("page scan failed: {}", e)))??;
        tracing::debug!("Indexed {} pages with card metadata", index.len());

        let mut report = BuildReport {
            found: illustrations.len(),
            generated: 0,
            skipped: 0,
            failed: 0,
            duration_ms: 0,
            output_dir: self.config.output_dir.clone(),
        };

        for name in &illustrations {
            match self.build_card(name, &index).await {
                Ok(Outcome::Generated(path)) => {
                    report.generated += 1;
                    tracing::info!("Generated {}", path.display());
                }
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!("Failed to process {}: {}", name, e);
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// File names of cover illustrations, sorted.
    async fn discover_illustrations(&self) -> Result<Vec<String>, BuildError> {
        let dir = &self.config.illustrations_dir;
        let read_error = |e: std::io::Error| BuildError::ReadError(format!("{}: {}", dir.display(), e));

        let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_file || !is_illustration(&name) {
                tracing::debug!("Ignoring {}", name);
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    async fn build_card(&self, name: &str, index: &MetadataIndex) -> Result<Outcome, CardError> {
        let Some(output_name) = output_file_name(name) else {
            return Ok(Outcome::Skipped);
        };

        let Some(metadata) = index.lookup(name) else {
            tracing::info!("Skipping {}: no page references it", name);
            return Ok(Outcome::Skipped);
        };

        tracing::info!("Processing {}", name);

        let source = tokio::fs::read_to_string(self.config.illustrations_dir.join(name))
            .await
            .map_err(CardError::Read)?;

        let text = CardText::new(&metadata.title, &metadata.description);
        let composer = Arc::clone(&self.composer);
        let png = tokio::task::spawn_blocking(move || composer.render_png(&source, &text)).await??;

        let output_path = self.config.output_dir.join(output_name);
        tokio::fs::write(&output_path, png)
            .await
            .map_err(CardError::Write)?;

        Ok(Outcome::Generated(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const ILLUSTRATION: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 200"><rect width="300" height="200" fill="#6c63ff"/></svg>"##;

    struct Site {
        _temp: TempDir,
        config: BuildConfig,
    }

    fn site() -> Site {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let config = BuildConfig {
            illustrations_dir: root.join("static/img"),
            output_dir: root.join("static/img/social"),
            docs_dir: root.join("docs"),
            ..Default::default()
        };
        fs::create_dir_all(&config.illustrations_dir).unwrap();
        fs::create_dir_all(&config.docs_dir).unwrap();
        Site {
            _temp: temp,
            config,
        }
    }

    fn page(config: &BuildConfig, file: &str, title: &str, description: &str, image: &str) {
        fs::write(
            config.docs_dir.join(file),
            format!("---\ntitle: \"{title}\"\ndescription: \"{description}\"\nimage: {image}\n---\n\n# {title}\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn generates_card_for_referenced_illustration() {
        let site = site();
        let config = &site.config;
        fs::write(config.illustrations_dir.join("undraw_example.svg"), ILLUSTRATION).unwrap();
        page(
            config,
            "example.md",
            "Short Title",
            "Short description.",
            "https://handbook.dev/img/social/undraw_example.png",
        );

        let report = SocialImageBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(report.found, 1);
        assert_eq!(report.generated, 1);
        let out = config.output_dir.join("undraw_example.png");
        let bytes = fs::read(&out).unwrap();
        assert!(!bytes.is_empty());
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (1200, 630));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn build_runs_as_spawned_task() {
        let site = site();
        let config = site.config.clone();
        fs::write(config.illustrations_dir.join("undraw_a.svg"), ILLUSTRATION).unwrap();
        fs::write(config.illustrations_dir.join("undraw_b.svg"), ILLUSTRATION).unwrap();
        page(&config, "a.md", "First", "One", "/img/social/undraw_a.png");
        page(&config, "b.md", "Second", "Two", "/img/social/undraw_b.png");

        let builder = SocialImageBuilder::new(config.clone());
        let report = tokio::spawn(async move { builder.build().await })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.generated, 2);
        assert!(config.output_dir.join("undraw_a.png").exists());
        assert!(config.output_dir.join("undraw_b.png").exists());
    }

    #[tokio::test]
    async fn ignores_files_outside_naming_convention() {
        let site = site();
        let config = &site.config;
        fs::write(config.illustrations_dir.join("logo.svg"), ILLUSTRATION).unwrap();
        fs::write(config.illustrations_dir.join("undraw_photo.png"), b"png").unwrap();
        page(config, "logo.md", "Logo", "The logo", "/img/social/logo.png");

        let report = SocialImageBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(report.found, 0);
        assert_eq!(fs::read_dir(&config.output_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn skips_illustrations_without_metadata() {
        let site = site();
        let config = &site.config;
        fs::write(config.illustrations_dir.join("undraw_orphan.svg"), ILLUSTRATION).unwrap();

        let report = SocialImageBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(report.found, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.generated, 0);
        assert!(!config.output_dir.join("undraw_orphan.png").exists());
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_batch() {
        let site = site();
        let config = &site.config;
        fs::write(config.illustrations_dir.join("undraw_broken.svg"), "<svg><g></svg>").unwrap();
        fs::write(config.illustrations_dir.join("undraw_fine.svg"), ILLUSTRATION).unwrap();
        page(config, "broken.md", "Broken", "Bad art", "/img/social/undraw_broken.png");
        page(config, "fine.md", "Fine", "Good art", "/img/social/undraw_fine.png");

        let report = SocialImageBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(report.found, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.generated, 1);
        assert!(config.output_dir.join("undraw_fine.png").exists());
        assert!(!config.output_dir.join("undraw_broken.png").exists());
    }

    #[tokio::test]
    async fn overwrites_existing_cards() {
        let site = site();
        let config = &site.config;
        fs::write(config.illustrations_dir.join("undraw_example.svg"), ILLUSTRATION).unwrap();
        page(config, "example.md", "Title", "Text", "/img/social/undraw_example.png");
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(config.output_dir.join("undraw_example.png"), b"stale").unwrap();

        let builder = SocialImageBuilder::new(config.clone());
        builder.build().await.unwrap();
        let report = builder.build().await.unwrap();

        assert_eq!(report.generated, 1);
        let bytes = fs::read(config.output_dir.join("undraw_example.png")).unwrap();
        assert_ne!(bytes, b"stale");
    }

    #[tokio::test]
    async fn missing_illustrations_dir_is_fatal() {
        let site = site();
        let config = BuildConfig {
            illustrations_dir: site.config.illustrations_dir.join("missing"),
            ..site.config.clone()
        };

        let result = SocialImageBuilder::new(config).build().await;

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }

    #[tokio::test]
    async fn output_dir_creation_failure_is_fatal() {
        let site = site();
        let blocker = site.config.docs_dir.join("blocker");
        fs::write(&blocker, "file").unwrap();
        let config = BuildConfig {
            output_dir: blocker.join("social"),
            ..site.config.clone()
        };

        let result = SocialImageBuilder::new(config).build().await;

        assert!(matches!(result, Err(BuildError::WriteError(_))));
    }
}
