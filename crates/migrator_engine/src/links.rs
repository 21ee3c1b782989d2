use std::cell::Cell;

use engine_logging::{engine_info, engine_warn};
use migrator_core::{resolve_cross_post_link, FeedEntry, LinkResolution, PermalinkIndex};
use scraper::ElementRef;

use crate::rewrite::AttributeTransform;

/// Rewrites links to other legacy posts into their migrated URLs.
///
/// Unmatched and external links keep their original `href`.
pub struct CrossPostResolver<'i, 'a> {
    index: &'i PermalinkIndex<'a>,
    current: &'i FeedEntry,
    resolved: Cell<usize>,
    unmatched: Cell<usize>,
}

impl<'i, 'a> CrossPostResolver<'i, 'a> {
    pub fn new(index: &'i PermalinkIndex<'a>, current: &'i FeedEntry) -> Self {
        Self {
            index,
            current,
            resolved: Cell::new(0),
            unmatched: Cell::new(0),
        }
    }

    pub fn resolved(&self) -> usize {
        self.resolved.get()
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched.get()
    }
}

impl AttributeTransform for CrossPostResolver<'_, '_> {
    fn transform(&self, _element: ElementRef<'_>, value: &str) -> Option<String> {
        match resolve_cross_post_link(value, &self.current.link, self.index) {
            LinkResolution::External => Some(value.to_string()),
            LinkResolution::Resolved { href, title } => {
                engine_info!("Linked {:?} -> {:?} ({})", self.current.title, title, href);
                self.resolved.set(self.resolved.get() + 1);
                Some(href)
            }
            LinkResolution::NoMatch { slug } => {
                engine_warn!(
                    "No match for link {} (slug {:?}) in {:?}",
                    value,
                    slug,
                    self.current.title
                );
                self.unmatched.set(self.unmatched.get() + 1);
                Some(value.to_string())
            }
        }
    }
}
