use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use migrator_core::{LegacyPattern, DEFAULT_LEGACY_PATTERN, DEFAULT_PRIVATE_PREFIX};
use migrator_engine::{MigrationConfig, Mode};

/// Move a legacy blog's RSS export into a static-site `source/` tree.
#[derive(Parser, Debug, Clone)]
#[command(name = "migrator", version, about)]
pub struct Cli {
    /// Emit redirect stubs at the old permalinks instead of posts
    #[arg(long)]
    pub links: bool,

    /// Path to the exported feed
    pub feed: PathBuf,

    /// Base path the new site is served under
    #[arg(default_value = "/")]
    pub base_path: String,

    /// Directory the `source/` tree is written into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Regex identifying URLs still hosted on the old platform
    #[arg(long, default_value = DEFAULT_LEGACY_PATTERN)]
    pub legacy_pattern: String,

    /// Link path prefix marking posts that were never public
    #[arg(long, default_value = DEFAULT_PRIVATE_PREFIX)]
    pub private_prefix: String,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also write logs to ./migrator.log
    #[arg(long)]
    pub log_file: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.links {
            Mode::Redirects
        } else {
            Mode::Posts
        }
    }

    pub fn to_config(&self) -> Result<MigrationConfig> {
        let legacy_pattern = LegacyPattern::new(&self.legacy_pattern)
            .context("--legacy-pattern is not a valid regex")?;
        let mut config = MigrationConfig::new(&self.feed)
            .with_base_path(&self.base_path)
            .with_output_root(&self.output_dir);
        config.legacy_pattern = legacy_pattern;
        config.private_prefix = self.private_prefix.clone();
        Ok(config)
    }
}
