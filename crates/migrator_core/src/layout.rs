use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, FixedOffset};

/// Where things live in the target site's source tree, and the public base
/// path the site is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Always starts and ends with `/`.
    pub base_path: String,
    pub posts_dir: PathBuf,
    pub images_dir: PathBuf,
    /// `images_dir` as seen from the web server, relative to `base_path`.
    pub images_url: String,
    pub redirects_dir: PathBuf,
    pub stylesheet: String,
    /// Directory beside the feed holding the export's original uploads.
    pub media_source_dir: PathBuf,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            posts_dir: PathBuf::from("source/_posts"),
            images_dir: PathBuf::from("source/images/posts"),
            images_url: "images/posts".to_string(),
            redirects_dir: PathBuf::from("source"),
            stylesheet: "stylesheets/screen.css".to_string(),
            media_source_dir: PathBuf::from("image"),
        }
    }
}

impl SiteLayout {
    pub fn with_base_path(base_path: &str) -> Self {
        Self {
            base_path: normalize_base_path(base_path),
            ..Self::default()
        }
    }

    /// `YYYY-MM-DD-slug`, shared by the post file and its media directory.
    pub fn post_stem(&self, published: &DateTime<FixedOffset>, slug: &str) -> String {
        format!("{}-{slug}", published.format("%Y-%m-%d"))
    }

    pub fn post_file_name(&self, published: &DateTime<FixedOffset>, slug: &str) -> String {
        format!("{}.html", self.post_stem(published, slug))
    }

    pub fn post_path(&self, root: &Path, published: &DateTime<FixedOffset>, slug: &str) -> PathBuf {
        root.join(&self.posts_dir)
            .join(self.post_file_name(published, slug))
    }

    /// Public URL path of a migrated post: `<base>YYYY/MM/DD/slug/`.
    pub fn post_url(&self, published: &DateTime<FixedOffset>, slug: &str) -> String {
        format!(
            "{}{:04}/{:02}/{:02}/{slug}/",
            self.base_path,
            published.year(),
            published.month(),
            published.day()
        )
    }

    pub fn media_dir(&self, root: &Path, published: &DateTime<FixedOffset>, slug: &str) -> PathBuf {
        root.join(&self.images_dir)
            .join(self.post_stem(published, slug))
    }

    /// Server-side directory the rewritten media attributes point into.
    pub fn media_server_dir(&self, published: &DateTime<FixedOffset>, slug: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_path,
            self.images_url.trim_matches('/'),
            self.post_stem(published, slug)
        )
    }

    /// Date-organised directory of original uploads: `<feed dir>/image/YYYY/MM`.
    pub fn media_source_dir(&self, feed_dir: &Path, published: &DateTime<FixedOffset>) -> PathBuf {
        feed_dir
            .join(&self.media_source_dir)
            .join(format!("{:04}", published.year()))
            .join(format!("{:02}", published.month()))
    }

    pub fn redirect_path(&self, root: &Path, slug: &str) -> PathBuf {
        root.join(&self.redirects_dir).join(slug).join("index.html")
    }

    pub fn stylesheet_url(&self) -> String {
        format!("{}{}", self.base_path, self.stylesheet.trim_start_matches('/'))
    }
}

/// Normalises a base path so it always starts and ends with `/`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn may_first() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc2822("Wed, 01 May 2013 10:00:00 -0700").unwrap()
    }

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("/blog"), "/blog/");
        assert_eq!(normalize_base_path("blog/"), "/blog/");
        assert_eq!(normalize_base_path(" /a/b "), "/a/b/");
    }

    #[test]
    fn post_paths_follow_date_template() {
        let layout = SiteLayout::with_base_path("/blog");
        let date = may_first();
        assert_eq!(
            layout.post_path(Path::new("out"), &date, "my-post"),
            PathBuf::from("out/source/_posts/2013-05-01-my-post.html")
        );
        assert_eq!(layout.post_url(&date, "my-post"), "/blog/2013/05/01/my-post/");
    }

    #[test]
    fn media_locations_share_post_stem() {
        let layout = SiteLayout::default();
        let date = may_first();
        assert_eq!(
            layout.media_dir(Path::new("."), &date, "x"),
            PathBuf::from("./source/images/posts/2013-05-01-x")
        );
        assert_eq!(layout.media_server_dir(&date, "x"), "/images/posts/2013-05-01-x");
        assert_eq!(
            layout.media_source_dir(Path::new("export"), &date),
            PathBuf::from("export/image/2013/05")
        );
    }

    #[test]
    fn redirect_stub_lives_under_slug() {
        let layout = SiteLayout::with_base_path("/blog");
        assert_eq!(
            layout.redirect_path(Path::new(""), "my-post"),
            PathBuf::from("source/my-post/index.html")
        );
        assert_eq!(layout.stylesheet_url(), "/blog/stylesheets/screen.css");
    }
}
