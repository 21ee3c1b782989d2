use std::path::{Path, PathBuf};

use migrator_core::{LegacyPattern, SiteLayout, DEFAULT_PRIVATE_PREFIX};

use crate::fetch::FetchSettings;

/// Which artifacts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Post files plus relocated media.
    Posts,
    /// Redirect stubs from legacy slugs to migrated URLs.
    Redirects,
}

#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub feed_path: PathBuf,
    /// Root the site layout's relative directories are resolved against.
    pub output_root: PathBuf,
    pub layout: SiteLayout,
    pub legacy_pattern: LegacyPattern,
    pub private_prefix: String,
    pub fetch: FetchSettings,
}

impl MigrationConfig {
    pub fn new(feed_path: impl Into<PathBuf>) -> Self {
        Self {
            feed_path: feed_path.into(),
            output_root: PathBuf::from("."),
            layout: SiteLayout::default(),
            legacy_pattern: LegacyPattern::default(),
            private_prefix: DEFAULT_PRIVATE_PREFIX.to_string(),
            fetch: FetchSettings::for_media(),
        }
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.layout = SiteLayout {
            base_path: migrator_core::normalize_base_path(base_path),
            ..self.layout
        };
        self
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Directory containing the feed file; the export's uploads live beside it.
    pub fn feed_dir(&self) -> &Path {
        match self.feed_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}
