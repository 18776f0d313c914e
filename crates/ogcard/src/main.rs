//! ogcard CLI - social cards and chapter index for a documentation site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "ogcard")]
#[command(about = "Generate social preview cards and the chapter index for a documentation site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the ogcard.toml config file
    #[arg(short, long, default_value = "ogcard.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate social preview cards (default)
    Images {
        /// Output directory (defaults to config or "static/img/social")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the chapter index JSON
    Chapters {
        /// Output file (defaults to config or "src/data/chapters.json")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default ogcard.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command.unwrap_or(Commands::Images { output: None }) {
        Commands::Images { output } => {
            commands::images::run(&cli.config, output).await?;
        }
        Commands::Chapters { output } => {
            commands::chapters::run(&cli.config, output)?;
        }
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
    }

    Ok(())
}
