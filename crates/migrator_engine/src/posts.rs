//! Post mode: one front-matter + HTML file per entry, media relocated.

use std::path::PathBuf;

use engine_logging::{engine_error, engine_info};
use migrator_core::{FeedEntry, PermalinkEntry, PermalinkIndex};
use scraper::{Html, Selector};

use crate::config::MigrationConfig;
use crate::fetch::Download;
use crate::frontmatter::build_post_document;
use crate::links::CrossPostResolver;
use crate::persist::{ensure_output_dir, AtomicFileWriter};
use crate::report::MigrationReport;
use crate::rewrite::{Resolve, Rewriter};
use crate::types::EmitError;

/// `id` of the element the body is wrapped in while it is being rewritten.
pub const BODY_CONTAINER_ID: &str = "migrated-post-body";

/// Where one post's media comes from and goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocations {
    /// Original uploads from the export, searched for `img` sources.
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// `dest_dir` as served by the new site.
    pub server_dir: String,
}

impl MediaLocations {
    pub fn for_entry(config: &MigrationConfig, permalink: &PermalinkEntry<'_>) -> Self {
        let layout = &config.layout;
        let published = &permalink.entry.published;
        Self {
            source_dir: layout.media_source_dir(config.feed_dir(), published),
            dest_dir: layout.media_dir(&config.output_root, published, &permalink.path_slug),
            server_dir: layout.media_server_dir(published, &permalink.path_slug),
        }
    }
}

/// Emits every entry in feed order. Failures are logged and counted; the run continues.
pub fn emit_posts(
    index: &PermalinkIndex<'_>,
    config: &MigrationConfig,
    downloader: Option<&dyn Download>,
    report: &mut MigrationReport,
) {
    let rewriter = Rewriter::new(&config.legacy_pattern, downloader);
    for permalink in index.iter() {
        report.entries += 1;
        match emit_post(permalink, index, config, &rewriter, report) {
            Ok(path) => {
                engine_info!("Wrote {:?} -> {:?}", permalink.entry.title, path);
                report.files_written += 1;
                report.outputs.push(path);
            }
            Err(err) => {
                engine_error!("Failed to emit {:?}: {}", permalink.entry.title, err);
                report.failed_entries += 1;
            }
        }
    }
}

pub fn emit_post(
    permalink: &PermalinkEntry<'_>,
    index: &PermalinkIndex<'_>,
    config: &MigrationConfig,
    rewriter: &Rewriter<'_>,
    report: &mut MigrationReport,
) -> Result<PathBuf, EmitError> {
    let entry = permalink.entry;
    let post_path = config
        .output_root
        .join(&config.layout.posts_dir)
        .join(&permalink.file_name);
    let media = MediaLocations::for_entry(config, permalink);

    ensure_output_dir(&media.dest_dir).map_err(|source| EmitError::Persist {
        path: media.dest_dir.clone(),
        source,
    })?;

    let body = rewrite_post_body(entry, index, rewriter, &media, report);
    let document = build_post_document(entry, &body)?;

    let (writer, filename) = AtomicFileWriter::for_path(&post_path)
        .ok_or_else(|| EmitError::NoParent(post_path.clone()))?;
    writer
        .write(&filename, &document)
        .map_err(|source| EmitError::Persist {
            path: post_path.clone(),
            source,
        })
}

/// Runs the four rewriting passes over an entry's body and returns the new markup.
pub fn rewrite_post_body(
    entry: &FeedEntry,
    index: &PermalinkIndex<'_>,
    rewriter: &Rewriter<'_>,
    media: &MediaLocations,
    report: &mut MigrationReport,
) -> String {
    let wrapped = format!(
        "<div id=\"{BODY_CONTAINER_ID}\">{body}</div>",
        body = entry.body_html
    );
    let mut document = Html::parse_fragment(&wrapped);

    report.images += rewriter.rewrite(
        &mut document,
        "img",
        "src",
        Resolve::LocalSearch {
            source_dir: &media.source_dir,
            dest_dir: &media.dest_dir,
            server_dir: &media.server_dir,
        },
    );
    report.sources += rewriter.rewrite(
        &mut document,
        "source",
        "src",
        Resolve::Download {
            dest_dir: &media.dest_dir,
            server_dir: &media.server_dir,
        },
    );
    report.posters += rewriter.rewrite(&mut document, "video", "poster", Resolve::Suppress);

    let links = CrossPostResolver::new(index, entry);
    report.links += rewriter.rewrite(&mut document, "a", "href", Resolve::Transform(&links));
    report.links_resolved += links.resolved();
    report.links_unmatched += links.unmatched();

    container_html(&document)
}

fn container_html(document: &Html) -> String {
    Selector::parse(&format!("div#{BODY_CONTAINER_ID}"))
        .ok()
        .and_then(|selector| document.select(&selector).next().map(|c| c.inner_html()))
        .unwrap_or_default()
}
