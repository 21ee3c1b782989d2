use engine_logging::{engine_info, engine_warn};
use migrator_core::PermalinkIndex;

use crate::config::{MigrationConfig, Mode};
use crate::feed::{load_feed, FeedError};
use crate::fetch::{BlockingDownloader, Download};
use crate::posts::emit_posts;
use crate::redirects::emit_redirects;
use crate::report::MigrationReport;
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("cannot start downloader: {0}")]
    Downloader(#[from] FetchError),
}

/// Loads the feed, indexes every permalink, then emits posts or redirect stubs.
///
/// Only a bad feed or an unusable downloader aborts the run; per-entry
/// problems end up in the returned report.
pub fn run_migration(config: &MigrationConfig, mode: Mode) -> Result<MigrationReport, MigrateError> {
    let entries = load_feed(&config.feed_path, &config.private_prefix)?;
    let index = PermalinkIndex::build(&entries, &config.layout);

    let mode_name = match mode {
        Mode::Posts => "posts",
        Mode::Redirects => "links",
    };
    let mut report = MigrationReport::new(mode_name);
    for duplicate in index.duplicates() {
        engine_warn!(
            "Duplicate slug {:?}: {:?} replaces {:?}; output files will collide",
            duplicate.slug,
            duplicate.kept_title,
            duplicate.replaced_title
        );
        report.duplicate_slugs.push(duplicate.slug.clone());
    }

    engine_info!(
        "Migrating {} entries into {:?} (base path {})",
        index.len(),
        config.output_root,
        config.layout.base_path
    );
    match mode {
        Mode::Posts => {
            let downloader = BlockingDownloader::with_settings(config.fetch.clone())?;
            emit_posts(&index, config, Some(&downloader as &dyn Download), &mut report);
        }
        Mode::Redirects => emit_redirects(&index, config, &mut report),
    }
    report.log_summary();
    Ok(report)
}
