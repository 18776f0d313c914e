//! Configuration file (ogcard.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use ogcard_render::Theme;
use ogcard_static::{BuildConfig, ChapterConfig};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub card: CardConfig,
    #[serde(default)]
    pub chapters: ChaptersConfig,
}

#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_illustrations")]
    pub illustrations: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_docs")]
    pub docs: PathBuf,
    #[serde(default = "default_chapters")]
    pub chapters: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            illustrations: default_illustrations(),
            output: default_output(),
            docs: default_docs(),
            chapters: default_chapters(),
        }
    }
}

/// Card theme overrides; unset fields keep the built-in theme.
#[derive(Debug, Deserialize, Default)]
pub struct CardConfig {
    pub gradient_start: Option<String>,
    pub gradient_end: Option<String>,
    pub title_color: Option<String>,
    pub description_color: Option<String>,
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ChaptersConfig {
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ChaptersConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
        }
    }
}

fn default_illustrations() -> PathBuf {
    PathBuf::from("static/img")
}
fn default_output() -> PathBuf {
    PathBuf::from("static/img/social")
}
fn default_docs() -> PathBuf {
    PathBuf::from("docs")
}
fn default_chapters() -> PathBuf {
    PathBuf::from("src/data/chapters.json")
}
fn default_exclude() -> Vec<String> {
    vec!["introduction".to_string(), "contributors".to_string()]
}

impl CardConfig {
    fn theme(&self) -> Theme {
        let defaults = Theme::default();
        Theme {
            gradient_start: self.gradient_start.clone().unwrap_or(defaults.gradient_start),
            gradient_end: self.gradient_end.clone().unwrap_or(defaults.gradient_end),
            title_color: self.title_color.clone().unwrap_or(defaults.title_color),
            description_color: self
                .description_color
                .clone()
                .unwrap_or(defaults.description_color),
            font_family: self.font_family.clone().unwrap_or(defaults.font_family),
        }
    }
}

impl ConfigFile {
    /// Social card build settings, with an optional output directory override.
    pub fn build_config(&self, output: Option<PathBuf>) -> BuildConfig {
        BuildConfig {
            illustrations_dir: self.paths.illustrations.clone(),
            output_dir: output.unwrap_or_else(|| self.paths.output.clone()),
            docs_dir: self.paths.docs.clone(),
            theme: self.card.theme(),
            font_dirs: self.card.font_dirs.clone(),
        }
    }

    /// Chapter index settings, with an optional output file override.
    pub fn chapter_config(&self, output: Option<PathBuf>) -> ChapterConfig {
        ChapterConfig {
            docs_dir: self.paths.docs.clone(),
            output_file: output.unwrap_or_else(|| self.paths.chapters.clone()),
            exclude: self.chapters.exclude.clone(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}
