//! Relocates legacy-hosted media and links inside a parsed post body.
//!
//! Every `tag[attr]` whose value matches the legacy host pattern is resolved
//! according to a [`Resolve`] strategy and rewritten in place. Lightbox
//! anchors the legacy host wrapped around media are dropped on the way.

use std::ops::AddAssign;
use std::path::Path;

use ego_tree::NodeId;
use engine_logging::{engine_debug, engine_warn};
use migrator_core::{LegacyPattern, ResourceName};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::fetch::Download;
use crate::locate::{find_local_resource, LocalMatch};
use crate::persist::{copy_into_dir, AtomicFileWriter};

/// Caller-supplied rewrite for an attribute value.
///
/// `None` or an empty string removes the attribute; anything else replaces
/// the value verbatim.
pub trait AttributeTransform {
    fn transform(&self, element: ElementRef<'_>, value: &str) -> Option<String>;
}

/// How a matched attribute gets its new value.
#[derive(Clone, Copy)]
pub enum Resolve<'a> {
    /// Copy the original upload from `source_dir` into `dest_dir`.
    LocalSearch {
        source_dir: &'a Path,
        dest_dir: &'a Path,
        server_dir: &'a str,
    },
    /// Download the legacy URL into `dest_dir`.
    Download {
        dest_dir: &'a Path,
        server_dir: &'a str,
    },
    /// Ask an [`AttributeTransform`] for the new value.
    Transform(&'a dyn AttributeTransform),
    /// Remove the attribute.
    Suppress,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RewriteStats {
    pub matched: usize,
    pub rewritten: usize,
    pub cleared: usize,
    pub copied: usize,
    pub downloaded: usize,
    pub unresolved: usize,
    pub ambiguous: usize,
    pub unwrapped: usize,
}

impl AddAssign for RewriteStats {
    fn add_assign(&mut self, other: Self) {
        self.matched += other.matched;
        self.rewritten += other.rewritten;
        self.cleared += other.cleared;
        self.copied += other.copied;
        self.downloaded += other.downloaded;
        self.unresolved += other.unresolved;
        self.ambiguous += other.ambiguous;
        self.unwrapped += other.unwrapped;
    }
}

enum Outcome {
    Set(String),
    Clear,
    Skip,
}

pub struct Rewriter<'a> {
    pattern: &'a LegacyPattern,
    downloader: Option<&'a dyn Download>,
}

impl<'a> Rewriter<'a> {
    pub fn new(pattern: &'a LegacyPattern, downloader: Option<&'a dyn Download>) -> Self {
        Self {
            pattern,
            downloader,
        }
    }

    pub fn rewrite(
        &self,
        document: &mut Html,
        tag: &str,
        attr: &str,
        resolve: Resolve<'_>,
    ) -> RewriteStats {
        let mut stats = RewriteStats::default();
        let Ok(selector) = Selector::parse(&format!("{tag}[{attr}]")) else {
            engine_warn!("Cannot build selector for {}[{}]", tag, attr);
            return stats;
        };

        let targets: Vec<(NodeId, String)> = document
            .select(&selector)
            .filter_map(|element| {
                let value = element.value().attr(attr)?;
                self.pattern
                    .is_match(value)
                    .then(|| (element.id(), value.trim().to_string()))
            })
            .collect();

        for (id, value) in targets {
            stats.matched += 1;
            let outcome = match resolve {
                Resolve::Transform(transform) => {
                    let Some(element) = document.tree.get(id).and_then(ElementRef::wrap) else {
                        continue;
                    };
                    match transform.transform(element, &value) {
                        Some(new_value) if !new_value.is_empty() => Outcome::Set(new_value),
                        _ => Outcome::Clear,
                    }
                }
                Resolve::Suppress => Outcome::Clear,
                Resolve::Download {
                    dest_dir,
                    server_dir,
                } => self.download(&value, dest_dir, server_dir, &mut stats),
                Resolve::LocalSearch {
                    source_dir,
                    dest_dir,
                    server_dir,
                } => self.copy_local(&value, source_dir, dest_dir, server_dir, &mut stats),
            };

            match outcome {
                Outcome::Set(new_value) => {
                    if new_value != value {
                        stats.rewritten += 1;
                    }
                    set_attribute(document, id, attr, &new_value);
                }
                Outcome::Clear => {
                    stats.cleared += 1;
                    remove_attribute(document, id, attr);
                }
                Outcome::Skip => {
                    stats.unresolved += 1;
                    continue;
                }
            }

            if self.unwrap_legacy_anchor(document, id) {
                stats.unwrapped += 1;
            }
        }
        stats
    }

    fn download(
        &self,
        value: &str,
        dest_dir: &Path,
        server_dir: &str,
        stats: &mut RewriteStats,
    ) -> Outcome {
        let Some(name) = ResourceName::from_url(value) else {
            engine_warn!("Cannot derive a file name from {}", value);
            return Outcome::Skip;
        };
        let Some(downloader) = self.downloader else {
            engine_warn!("No downloader configured; leaving {} in place", value);
            return Outcome::Skip;
        };

        let output = match downloader.download(value) {
            Ok(output) => output,
            Err(err) => {
                engine_warn!("Download of {} failed: {}", value, err);
                return Outcome::Skip;
            }
        };
        let meta = &output.metadata;
        engine_debug!(
            "Fetched {} ({:?}, {} bytes, {} redirects) for {}",
            meta.final_url,
            meta.content_type,
            meta.byte_len,
            meta.redirect_count,
            meta.original_url
        );
        let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
        match writer.write_bytes(&name.name, &output.bytes) {
            Ok(path) => {
                engine_debug!("Downloaded {} to {:?}", value, path);
                stats.downloaded += 1;
                Outcome::Set(server_path(server_dir, &name.name))
            }
            Err(err) => {
                engine_warn!("Could not save {} into {:?}: {}", value, dest_dir, err);
                Outcome::Skip
            }
        }
    }

    fn copy_local(
        &self,
        value: &str,
        source_dir: &Path,
        dest_dir: &Path,
        server_dir: &str,
        stats: &mut RewriteStats,
    ) -> Outcome {
        let Some(name) = ResourceName::from_url(value) else {
            engine_warn!("Cannot derive a file name from {}", value);
            return Outcome::Skip;
        };

        let chosen = match find_local_resource(source_dir, &name) {
            Ok(LocalMatch::Unique(path)) => path,
            Ok(LocalMatch::Ambiguous { chosen, candidates }) => {
                engine_warn!(
                    "Several local files match {} ({}): {:?}; using {:?}",
                    name.name,
                    value,
                    candidates,
                    chosen
                );
                stats.ambiguous += 1;
                chosen
            }
            Ok(LocalMatch::NotFound) => {
                engine_warn!("No local file in {:?} matches {} ({})", source_dir, name.name, value);
                return Outcome::Skip;
            }
            Err(err) => {
                engine_warn!("Cannot search {:?} for {}: {}", source_dir, name.name, err);
                return Outcome::Skip;
            }
        };

        match copy_into_dir(&chosen, dest_dir) {
            Ok(copied) => {
                stats.copied += 1;
                let file_name = copied
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.name.clone());
                Outcome::Set(server_path(server_dir, &file_name))
            }
            Err(err) => {
                engine_warn!("Could not copy {:?} into {:?}: {}", chosen, dest_dir, err);
                Outcome::Skip
            }
        }
    }

    /// Replaces a legacy lightbox `<a>` directly around `id` with the element itself.
    fn unwrap_legacy_anchor(&self, document: &mut Html, id: NodeId) -> bool {
        let parent_id = {
            let Some(parent) = document.tree.get(id).and_then(|node| node.parent()) else {
                return false;
            };
            let Some(anchor) = ElementRef::wrap(parent) else {
                return false;
            };
            if !anchor.value().name().eq_ignore_ascii_case("a") {
                return false;
            }
            match anchor.value().attr("href") {
                Some(href) if self.pattern.is_match(href) => parent.id(),
                _ => return false,
            }
        };

        let Some(mut anchor) = document.tree.get_mut(parent_id) else {
            return false;
        };
        anchor.insert_id_before(id);
        anchor.detach();
        true
    }
}

fn set_attribute(document: &mut Html, id: NodeId, attr: &str, value: &str) {
    let Some(mut node) = document.tree.get_mut(id) else {
        return;
    };
    if let Node::Element(element) = node.value() {
        for (name, current) in element.attrs.iter_mut() {
            if &*name.local == attr {
                current.clear();
                current.push_slice(value);
            }
        }
    }
}

fn remove_attribute(document: &mut Html, id: NodeId, attr: &str) {
    let Some(mut node) = document.tree.get_mut(id) else {
        return;
    };
    if let Node::Element(element) = node.value() {
        element.attrs.retain(|(name, _)| &*name.local != attr);
    }
}

/// URL-escaped `server_dir/file_name`. Slashes survive; `%`, spaces and
/// other unsafe characters in the file name are percent-encoded.
pub(crate) fn server_path(server_dir: &str, file_name: &str) -> String {
    let raw = format!(
        "{}/{}",
        server_dir.trim_end_matches('/'),
        file_name.replace('%', "%25")
    );
    match Url::parse("http://localhost/") {
        Ok(mut url) => {
            url.set_path(&raw);
            url.path().to_string()
        }
        Err(_) => raw,
    }
}
