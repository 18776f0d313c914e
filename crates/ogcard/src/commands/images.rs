//! Social card generation command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ogcard_static::SocialImageBuilder;

use crate::config::load_config;

/// Run the images command.
pub async fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Generating social media cover images...");

    let file_config = load_config(config_path)?;
    let config = file_config.build_config(output);

    let report = SocialImageBuilder::new(config).build().await?;

    if report.failed > 0 {
        tracing::warn!("{} illustrations failed to render", report.failed);
    }

    tracing::info!(
        "Generated {} of {} social images ({} skipped) in {}ms",
        report.generated,
        report.found,
        report.skipped,
        report.duration_ms
    );

    tracing::info!("Output: {}", report.output_dir.display());

    Ok(())
}
