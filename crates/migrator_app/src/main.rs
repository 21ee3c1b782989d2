mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_info, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use migrator_engine::run_migration;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli);

    let config = cli.to_config()?;
    let report = run_migration(&config, cli.mode())
        .with_context(|| format!("migrating {:?}", config.feed_path))?;

    if let Some(path) = &cli.report {
        let written = report
            .write_json(path)
            .with_context(|| format!("writing report to {:?}", path))?;
        engine_info!("Report written to {:?}", written);
    }
    Ok(())
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = if cli.log_file {
        LogDestination::Both(DEFAULT_LOG_FILE.into())
    } else {
        LogDestination::Terminal
    };
    engine_logging::initialize(destination, level);
}
