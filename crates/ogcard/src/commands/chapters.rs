//! Chapter index command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ogcard_static::write_chapter_index;

use crate::config::load_config;

/// Run the chapters command.
pub fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let file_config = load_config(config_path)?;
    let config = file_config.chapter_config(output);

    let report = write_chapter_index(&config)?;

    tracing::info!(
        "Generated {} chapters in {}",
        report.chapters,
        report.output_file.display()
    );

    Ok(())
}
