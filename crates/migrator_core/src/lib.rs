//! Migrator core: pure domain model for moving a legacy blog export into a
//! static-site source tree. Nothing in this crate touches the filesystem or
//! the network.
mod crosslink;
mod entry;
mod filename;
mod layout;
mod legacy;
mod permalink;

pub use crosslink::{resolve_cross_post_link, LinkResolution};
pub use entry::{Category, FeedEntry, DEFAULT_PRIVATE_PREFIX, TAG_DOMAIN};
pub use filename::sanitize_segment;
pub use layout::{normalize_base_path, SiteLayout};
pub use legacy::{LegacyPattern, PatternError, ResourceName, DEFAULT_LEGACY_PATTERN};
pub use permalink::{slug_from_link, DuplicateSlug, PermalinkEntry, PermalinkIndex};
