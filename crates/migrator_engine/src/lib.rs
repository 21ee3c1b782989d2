//! Migrator engine: feed loading, media relocation and file emission.
mod config;
mod decode;
mod engine;
mod feed;
mod fetch;
mod frontmatter;
mod links;
mod locate;
mod persist;
mod posts;
mod redirects;
mod report;
mod rewrite;
mod types;

pub use config::{MigrationConfig, Mode};
pub use decode::{decode_feed, DecodeError, DecodedFeed};
pub use engine::{run_migration, MigrateError};
pub use feed::{load_feed, parse_feed, FeedError};
pub use fetch::{
    BlockingDownloader, Download, FetchSettings, Fetcher, ReqwestFetcher, MEDIA_CONTENT_TYPES,
};
pub use frontmatter::{build_post_document, FrontMatter};
pub use links::CrossPostResolver;
pub use locate::{find_local_resource, LocalMatch};
pub use persist::{copy_into_dir, ensure_output_dir, AtomicFileWriter, PersistError};
pub use posts::{emit_post, emit_posts, rewrite_post_body, MediaLocations, BODY_CONTAINER_ID};
pub use redirects::{emit_redirect, emit_redirects, render_redirect_stub};
pub use report::{MigrationReport, ReportError};
pub use rewrite::{AttributeTransform, Resolve, RewriteStats, Rewriter};
pub use types::{EmitError, FailureKind, FetchError, FetchMetadata, FetchOutput};
