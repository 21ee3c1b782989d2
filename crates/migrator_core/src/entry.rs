use chrono::{DateTime, FixedOffset};
use url::Url;

/// Category domain that marks a category as a user-facing tag.
pub const TAG_DOMAIN: &str = "tag";

/// Link path prefix the legacy host used for posts that were never public.
pub const DEFAULT_PRIVATE_PREFIX: &str = "/private";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub domain: Option<String>,
}

impl Category {
    pub fn is_tag(&self) -> bool {
        self.domain.as_deref() == Some(TAG_DOMAIN)
    }
}

/// One post as recorded in the feed export. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: Url,
    pub published: DateTime<FixedOffset>,
    pub categories: Vec<Category>,
    pub body_html: String,
    pub private: bool,
}

impl FeedEntry {
    /// Builds an entry, deriving the privacy flag from the link path.
    pub fn new(
        title: impl Into<String>,
        link: Url,
        published: DateTime<FixedOffset>,
        categories: Vec<Category>,
        body_html: impl Into<String>,
        private_prefix: &str,
    ) -> Self {
        let private = is_private_link(&link, private_prefix);
        Self {
            title: title.into(),
            link,
            published,
            categories,
            body_html: body_html.into(),
            private,
        }
    }

    /// Names of the categories whose domain is `tag`, in feed order.
    pub fn tags(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.is_tag())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn is_published(&self) -> bool {
        !self.private
    }
}

fn is_private_link(link: &Url, private_prefix: &str) -> bool {
    !private_prefix.is_empty() && link.path().starts_with(private_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2013-05-01T10:00:00+00:00").unwrap()
    }

    #[test]
    fn private_prefix_marks_entry_unpublished() {
        let link = Url::parse("http://old.example.com/private/abc").unwrap();
        let entry = FeedEntry::new("t", link, date(), Vec::new(), "", DEFAULT_PRIVATE_PREFIX);
        assert!(entry.private);
        assert!(!entry.is_published());
    }

    #[test]
    fn public_link_is_published() {
        let link = Url::parse("http://old.example.com/p/my-post").unwrap();
        let entry = FeedEntry::new("t", link, date(), Vec::new(), "", DEFAULT_PRIVATE_PREFIX);
        assert!(entry.is_published());
    }

    #[test]
    fn only_tag_domain_categories_are_tags() {
        let link = Url::parse("http://old.example.com/p/x").unwrap();
        let categories = vec![
            Category {
                name: "rust".into(),
                domain: Some("tag".into()),
            },
            Category {
                name: "Uncategorized".into(),
                domain: Some("category".into()),
            },
            Category {
                name: "bare".into(),
                domain: None,
            },
        ];
        let entry = FeedEntry::new("t", link, date(), categories, "", DEFAULT_PRIVATE_PREFIX);
        assert_eq!(entry.tags(), vec!["rust".to_string()]);
    }
}
