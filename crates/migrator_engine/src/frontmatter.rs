use migrator_core::FeedEntry;
use serde::Serialize;

/// Header block of a migrated post. Field order is the order written.
#[derive(Debug, Serialize)]
pub struct FrontMatter<'a> {
    pub layout: &'a str,
    pub title: &'a str,
    pub date: String,
    pub comments: bool,
    pub categories: Vec<String>,
    pub published: bool,
}

impl<'a> FrontMatter<'a> {
    pub fn for_entry(entry: &'a FeedEntry) -> Self {
        Self {
            layout: "post",
            title: &entry.title,
            date: entry.published.format("%Y-%m-%d %H:%M:%S %z").to_string(),
            comments: true,
            categories: entry.tags(),
            published: entry.is_published(),
        }
    }
}

/// `---`, YAML front matter, `---`, then the rewritten body.
pub fn build_post_document(entry: &FeedEntry, body_html: &str) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(&FrontMatter::for_entry(entry))?;
    Ok(format!(
        "---\n{yaml}---\n{body}\n",
        yaml = yaml,
        body = body_html.trim()
    ))
}
