#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// RSS export in the shape the legacy host produced.
pub fn sample_feed() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
<channel>
<title>Old blog</title>
<link>http://me.posterous.com</link>
<description>export</description>
<item>
  <title>Second: with link</title>
  <link>http://me.posterous.com/second-post</link>
  <pubDate>Sun, 02 Jun 2013 08:00:00 +0000</pubDate>
  <category domain="tag"><![CDATA[rust]]></category>
  <category domain="category"><![CDATA[Uncategorized]]></category>
  <content:encoded><![CDATA[<p>See <a href="http://me.posterous.com/my-post#pics">the first</a> and <a href="http://me.posterous.com/missing">gone</a>.</p>
<p><a href="http://me.posterous.com/getfile/full.jpg"><img src="http://files.posterous.com/99/foo.scaled1000.jpg" alt="foo"></a></p>
<video poster="http://files.posterous.com/poster.jpg" controls></video>]]></content:encoded>
</item>
<item>
  <title>My Post</title>
  <link>http://me.posterous.com/my-post</link>
  <pubDate>Wed, 01 May 2013 10:00:00 +0000</pubDate>
  <category domain="tag"><![CDATA[travel]]></category>
  <content:encoded><![CDATA[<p>Hello <a href="http://example.com/">world</a></p>]]></content:encoded>
</item>
<item>
  <title>Secret</title>
  <link>http://me.posterous.com/private/abcdef</link>
  <pubDate>Mon, 01 Apr 2013 09:00:00 +0000</pubDate>
  <description>plain description body</description>
</item>
<item>
  <title>No date</title>
  <link>http://me.posterous.com/undated</link>
</item>
</channel>
</rss>
"#
    .to_string()
}

pub fn write_export(dir: &Path) -> std::path::PathBuf {
    let feed_path = dir.join("wordpress_export_1.xml");
    fs::write(&feed_path, sample_feed()).unwrap();
    let images = dir.join("image").join("2013").join("06");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("foo_bar.jpg"), b"jpeg bytes").unwrap();
    fs::write(images.join("unrelated.png"), b"png bytes").unwrap();
    feed_path
}
