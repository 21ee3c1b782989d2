use url::Url;

use crate::permalink::{slug_from_link, PermalinkIndex};

/// Outcome of looking at one `href` inside a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// Not a link back into the legacy blog; keep as is.
    External,
    /// Points at another migrated post.
    Resolved { href: String, title: String },
    /// Same host, but no post carries this slug.
    NoMatch { slug: String },
}

/// Maps a link to another post on the legacy blog onto that post's new URL.
///
/// Only links on the same host as `current_link` are considered. The fragment,
/// if any, survives the rewrite.
pub fn resolve_cross_post_link(
    href: &str,
    current_link: &Url,
    index: &PermalinkIndex<'_>,
) -> LinkResolution {
    let Ok(url) = Url::parse(href.trim()) else {
        return LinkResolution::External;
    };
    if url.host_str() != current_link.host_str() {
        return LinkResolution::External;
    }
    let Some(slug) = slug_from_link(&url) else {
        return LinkResolution::NoMatch {
            slug: String::new(),
        };
    };

    match index.get(&slug) {
        Some(target) => {
            let mut href = target.post_url.clone();
            if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
                href.push('#');
                href.push_str(fragment);
            }
            LinkResolution::Resolved {
                href,
                title: target.entry.title.clone(),
            }
        }
        None => LinkResolution::NoMatch { slug },
    }
}
