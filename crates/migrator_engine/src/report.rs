use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use serde::Serialize;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::rewrite::RewriteStats;

/// Counters for one run, written as JSON on request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub mode: String,
    pub entries: usize,
    pub files_written: usize,
    pub failed_entries: usize,
    pub duplicate_slugs: Vec<String>,
    pub images: RewriteStats,
    pub sources: RewriteStats,
    pub posters: RewriteStats,
    pub links: RewriteStats,
    pub links_resolved: usize,
    pub links_unmatched: usize,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report path {0:?} has no file name")]
    InvalidPath(PathBuf),
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

impl MigrationReport {
    pub fn new(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            ..Self::default()
        }
    }

    /// Media references left pointing at the legacy host.
    pub fn unresolved_media(&self) -> usize {
        self.images.unresolved + self.sources.unresolved + self.posters.unresolved
    }

    pub fn log_summary(&self) {
        engine_info!(
            "{} run: {} entries, {} files written, {} images copied, {} media downloaded, {} posters stripped, {} anchors unwrapped, {} links resolved",
            self.mode,
            self.entries,
            self.files_written,
            self.images.copied,
            self.sources.downloaded,
            self.posters.cleared,
            self.images.unwrapped + self.sources.unwrapped + self.posters.unwrapped,
            self.links_resolved
        );
        if self.unresolved_media() > 0 || self.images.ambiguous > 0 {
            engine_warn!(
                "{} media references unresolved, {} resolved ambiguously",
                self.unresolved_media(),
                self.images.ambiguous
            );
        }
        if self.links_unmatched > 0 {
            engine_warn!("{} cross-post links had no match", self.links_unmatched);
        }
        if !self.duplicate_slugs.is_empty() {
            engine_warn!(
                "Duplicate slugs overwrote earlier posts: {:?}",
                self.duplicate_slugs
            );
        }
        if self.failed_entries > 0 {
            engine_warn!("{} entries failed to emit", self.failed_entries);
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<PathBuf, ReportError> {
        let (writer, filename) = match AtomicFileWriter::for_path(path) {
            Some(parts) => parts,
            None => return Err(ReportError::InvalidPath(path.to_path_buf())),
        };
        let json = serde_json::to_string_pretty(self)?;
        Ok(writer.write(&filename, &json)?)
    }
}
