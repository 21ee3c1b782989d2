//! Link mode: a meta-refresh stub at each legacy slug pointing at the migrated post.

use std::path::PathBuf;

use engine_logging::{engine_error, engine_info};
use html_escape::{encode_double_quoted_attribute, encode_text};
use migrator_core::{PermalinkEntry, PermalinkIndex, SiteLayout};

use crate::config::MigrationConfig;
use crate::persist::AtomicFileWriter;
use crate::report::MigrationReport;
use crate::types::EmitError;

pub fn emit_redirects(
    index: &PermalinkIndex<'_>,
    config: &MigrationConfig,
    report: &mut MigrationReport,
) {
    for permalink in index.iter() {
        report.entries += 1;
        match emit_redirect(permalink, config) {
            Ok(path) => {
                engine_info!("Redirect {:?} -> {}", path, permalink.post_url);
                report.files_written += 1;
                report.outputs.push(path);
            }
            Err(err) => {
                engine_error!("Failed to write redirect for {:?}: {}", permalink.slug, err);
                report.failed_entries += 1;
            }
        }
    }
}

pub fn emit_redirect(
    permalink: &PermalinkEntry<'_>,
    config: &MigrationConfig,
) -> Result<PathBuf, EmitError> {
    let path = config
        .layout
        .redirect_path(&config.output_root, &permalink.path_slug);
    let html = render_redirect_stub(&config.layout, &permalink.entry.title, &permalink.post_url);
    let (writer, filename) =
        AtomicFileWriter::for_path(&path).ok_or_else(|| EmitError::NoParent(path.clone()))?;
    writer
        .write(&filename, &html)
        .map_err(|source| EmitError::Persist {
            path: path.clone(),
            source,
        })
}

/// Self-contained HTML page that sends the browser to `target`.
pub fn render_redirect_stub(layout: &SiteLayout, title: &str, target: &str) -> String {
    let title = encode_text(title);
    let target = encode_double_quoted_attribute(target);
    let stylesheet_url = layout.stylesheet_url();
    let stylesheet = encode_double_quoted_attribute(&stylesheet_url);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta http-equiv="refresh" content="0;url={target}">
<link rel="canonical" href="{target}">
<link rel="stylesheet" href="{stylesheet}" type="text/css">
</head>
<body>
<p>This post has moved to <a href="{target}">{title}</a>.</p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_escapes_title_and_links_stylesheet() {
        let layout = SiteLayout::with_base_path("/blog");
        let html = render_redirect_stub(&layout, "Fish & <Chips>", "/blog/2013/05/01/x/");
        assert!(html.contains("content=\"0;url=/blog/2013/05/01/x/\""));
        assert!(html.contains("<a href=\"/blog/2013/05/01/x/\">Fish &amp; &lt;Chips&gt;</a>"));
        assert!(html.contains("href=\"/blog/stylesheets/screen.css\""));
    }

    #[test]
    fn stub_escapes_quotes_in_target() {
        let layout = SiteLayout::default();
        let html = render_redirect_stub(&layout, "Say \"hi\"", "/2013/05/01/a\"b/");
        assert!(html.contains("href=\"/2013/05/01/a&quot;b/\""));
        assert!(html.contains("<title>Say \"hi\"</title>"));
    }
}
