//! Write a default configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'ogcard' to generate social images.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# ogcard configuration

[paths]
# Cover illustrations (undraw_*.svg)
illustrations = "static/img"

# Generated social cards
output = "static/img/social"

# Content pages with front matter
docs = "docs"

# Chapter index JSON
chapters = "src/data/chapters.json"

[card]
gradient_start = "#d0cdff"
gradient_end = "#9e98ff"
title_color = "#1c1e21"
description_color = "#3b3b58"
font_family = "Inter, 'Helvetica Neue', Arial, sans-serif"

# Extra directories with .ttf/.otf fonts
font_dirs = []

[chapters]
# Page ids left out of the chapter index
exclude = ["introduction", "contributors"]
"##;
