//! Loads the legacy blog's RSS export into [`FeedEntry`] values.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use engine_logging::{engine_info, engine_warn};
use migrator_core::{Category, FeedEntry};
use rss::Channel;
use url::Url;

use crate::decode::{decode_feed, DecodeError};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("could not read feed {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("malformed feed: {0}")]
    Parse(#[from] rss::Error),
}

/// Reads, decodes and parses the feed at `path`, preserving item order.
pub fn load_feed(path: &Path, private_prefix: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let bytes = fs::read(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode_feed(&bytes)?;
    let entries = parse_feed(&decoded.xml, private_prefix)?;
    engine_info!(
        "Loaded {} entries from {:?} ({})",
        entries.len(),
        path,
        decoded.encoding_label
    );
    Ok(entries)
}

/// Parses an RSS document. Items without a usable link or date are skipped
/// with a warning; everything else becomes an entry.
pub fn parse_feed(xml: &str, private_prefix: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let channel = Channel::read_from(xml.as_bytes())?;
    let entries = channel
        .items()
        .iter()
        .enumerate()
        .filter_map(|(position, item)| entry_from_item(position, item, private_prefix))
        .collect();
    Ok(entries)
}

fn entry_from_item(position: usize, item: &rss::Item, private_prefix: &str) -> Option<FeedEntry> {
    let title = item
        .title()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("untitled");

    let link = match item.link().map(str::trim).map(Url::parse) {
        Some(Ok(link)) => link,
        Some(Err(err)) => {
            engine_warn!("Skipping item {} ({:?}): invalid link: {}", position, title, err);
            return None;
        }
        None => {
            engine_warn!("Skipping item {} ({:?}): no link", position, title);
            return None;
        }
    };

    let Some(published) = item.pub_date().and_then(parse_date) else {
        engine_warn!(
            "Skipping item {} ({:?}): missing or unparseable pubDate {:?}",
            position,
            title,
            item.pub_date()
        );
        return None;
    };

    let categories = item
        .categories()
        .iter()
        .map(|c| Category {
            name: c.name().trim().to_string(),
            domain: c.domain().map(str::to_string),
        })
        .collect();

    let body = item
        .content()
        .or_else(|| item.description())
        .unwrap_or_default();

    Some(FeedEntry::new(
        title,
        link,
        published,
        categories,
        body,
        private_prefix,
    ))
}

fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}
