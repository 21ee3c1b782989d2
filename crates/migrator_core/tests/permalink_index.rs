use std::sync::Once;

use chrono::DateTime;
use migrator_core::{
    slug_from_link, FeedEntry, PermalinkIndex, SiteLayout, DEFAULT_PRIVATE_PREFIX,
};
use pretty_assertions::assert_eq;
use url::Url;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn entry(title: &str, link: &str, date: &str) -> FeedEntry {
    FeedEntry::new(
        title,
        Url::parse(link).unwrap(),
        DateTime::parse_from_rfc2822(date).unwrap(),
        Vec::new(),
        "",
        DEFAULT_PRIVATE_PREFIX,
    )
}

#[test]
fn slug_is_last_non_empty_segment() {
    init_logging();
    let link = Url::parse("http://old.example.com/p/my-post/").unwrap();
    assert_eq!(slug_from_link(&link).as_deref(), Some("my-post"));

    let bare = Url::parse("http://old.example.com/").unwrap();
    assert_eq!(slug_from_link(&bare), None);
}

#[test]
fn index_computes_file_name_and_url() {
    init_logging();
    let entries = vec![entry(
        "My Post",
        "http://old.example.com/p/my-post",
        "Wed, 01 May 2013 10:00:00 +0000",
    )];
    let layout = SiteLayout::with_base_path("/blog");
    let index = PermalinkIndex::build(&entries, &layout);

    let found = index.get("my-post").expect("indexed");
    assert_eq!(found.file_name, "2013-05-01-my-post.html");
    assert_eq!(found.post_url, "/blog/2013/05/01/my-post/");
    assert_eq!(found.entry.title, "My Post");
    assert_eq!(index.len(), 1);
    assert!(index.duplicates().is_empty());
}

#[test]
fn duplicate_slugs_keep_later_entry_and_are_reported() {
    init_logging();
    let entries = vec![
        entry("First", "http://a.example.com/same", "Tue, 01 Jan 2013 00:00:00 +0000"),
        entry("Second", "http://a.example.com/same", "Fri, 01 Feb 2013 00:00:00 +0000"),
    ];
    let index = PermalinkIndex::build(&entries, &SiteLayout::default());

    assert_eq!(index.get("same").unwrap().entry.title, "Second");
    assert_eq!(index.len(), 2);
    let duplicates = index.duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].slug, "same");
    assert_eq!(duplicates[0].kept_title, "Second");
    assert_eq!(duplicates[0].replaced_title, "First");
}

#[test]
fn iteration_preserves_feed_order() {
    init_logging();
    let entries = vec![
        entry("B", "http://a.example.com/b", "Tue, 01 Jan 2013 00:00:00 +0000"),
        entry("A", "http://a.example.com/a", "Fri, 01 Feb 2013 00:00:00 +0000"),
    ];
    let index = PermalinkIndex::build(&entries, &SiteLayout::default());
    let slugs: Vec<_> = index.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["b", "a"]);
}

#[test]
fn unsafe_slug_is_sanitized_for_paths_only() {
    init_logging();
    let entries = vec![entry(
        "Odd",
        "http://a.example.com/p/what%3F",
        "Tue, 01 Jan 2013 00:00:00 +0000",
    )];
    let index = PermalinkIndex::build(&entries, &SiteLayout::default());
    let found = index.get("what%3F").expect("raw slug is the key");
    assert_eq!(found.path_slug, "what%3F");
    assert_eq!(found.file_name, "2013-01-01-what%3F.html");
}
