mod common;

use migrator_engine::{load_feed, parse_feed, FeedError};
use pretty_assertions::assert_eq;

#[test]
fn entries_keep_feed_order_and_skip_undated_items() {
    let entries = parse_feed(&common::sample_feed(), "/private").unwrap();
    let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Second: with link", "My Post", "Secret"]);
}

#[test]
fn entry_fields_come_from_the_item() {
    let entries = parse_feed(&common::sample_feed(), "/private").unwrap();
    let second = &entries[0];
    assert_eq!(second.link.as_str(), "http://me.posterous.com/second-post");
    assert_eq!(second.published.to_rfc3339(), "2013-06-02T08:00:00+00:00");
    assert_eq!(second.tags(), vec!["rust".to_string()]);
    assert_eq!(second.categories.len(), 2);
    assert!(second.body_html.contains("foo.scaled1000.jpg"));
    assert!(second.is_published());
}

#[test]
fn private_entries_fall_back_to_description() {
    let entries = parse_feed(&common::sample_feed(), "/private").unwrap();
    let secret = &entries[2];
    assert!(secret.private);
    assert_eq!(secret.body_html, "plain description body");
}

#[test]
fn load_feed_reports_missing_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let err = load_feed(&temp.path().join("nope.xml"), "/private").unwrap_err();
    assert!(matches!(err, FeedError::Io { .. }));
}

#[test]
fn malformed_feed_is_an_error() {
    let err = parse_feed("<rss><channel><item>", "/private").unwrap_err();
    assert!(matches!(err, FeedError::Parse(_)));
}
