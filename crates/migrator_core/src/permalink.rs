use std::collections::HashMap;

use url::Url;

use crate::entry::FeedEntry;
use crate::filename::sanitize_segment;
use crate::layout::SiteLayout;

/// The final non-empty path segment of a post link.
pub fn slug_from_link(link: &Url) -> Option<String> {
    link.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkEntry<'a> {
    pub entry: &'a FeedEntry,
    /// Slug as it appears in legacy links; the lookup key.
    pub slug: String,
    /// Slug made safe for file names and new URLs.
    pub path_slug: String,
    pub file_name: String,
    pub post_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSlug {
    pub slug: String,
    pub kept_title: String,
    pub replaced_title: String,
}

/// Slug lookup over every entry in the feed.
///
/// Built once, before any markup is rewritten, so a post can link to any other
/// post regardless of feed order. When two entries share a slug the later one
/// wins the lookup; the clash is recorded in [`PermalinkIndex::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct PermalinkIndex<'a> {
    entries: Vec<PermalinkEntry<'a>>,
    by_slug: HashMap<String, usize>,
    duplicates: Vec<DuplicateSlug>,
}

impl<'a> PermalinkIndex<'a> {
    pub fn build(entries: &'a [FeedEntry], layout: &SiteLayout) -> Self {
        let mut index = Self::default();
        for entry in entries {
            let slug =
                slug_from_link(&entry.link).unwrap_or_else(|| sanitize_segment(&entry.title));
            let path_slug = sanitize_segment(&slug);
            let permalink = PermalinkEntry {
                entry,
                file_name: layout.post_file_name(&entry.published, &path_slug),
                post_url: layout.post_url(&entry.published, &path_slug),
                slug: slug.clone(),
                path_slug,
            };

            let position = index.entries.len();
            if let Some(previous) = index.by_slug.insert(slug.clone(), position) {
                index.duplicates.push(DuplicateSlug {
                    slug,
                    kept_title: entry.title.clone(),
                    replaced_title: index.entries[previous].entry.title.clone(),
                });
            }
            index.entries.push(permalink);
        }
        index
    }

    pub fn get(&self, slug: &str) -> Option<&PermalinkEntry<'a>> {
        self.by_slug.get(slug).map(|&position| &self.entries[position])
    }

    /// Every entry in feed order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &PermalinkEntry<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicates(&self) -> &[DuplicateSlug] {
        &self.duplicates
    }
}
