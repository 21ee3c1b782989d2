use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Accepted `Content-Type`s; `type/*` matches a whole family, empty accepts anything.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            redirect_limit: 10,
            max_bytes: 512 * 1024 * 1024,
            allowed_content_types: Vec::new(),
        }
    }
}

/// `Content-Type` families accepted for media pulled off the legacy host.
pub const MEDIA_CONTENT_TYPES: &[&str] = &[
    "image/*",
    "video/*",
    "audio/*",
    "application/octet-stream",
];

impl FetchSettings {
    /// Defaults restricted to media payloads, so error pages are never saved as media.
    pub fn for_media() -> Self {
        Self {
            allowed_content_types: MEDIA_CONTENT_TYPES.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// Synchronous download used by the rewriter; one resource at a time.
pub trait Download {
    fn download(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(
        &self,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.settings.allowed_content_types.is_empty() {
            return true;
        }
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings.allowed_content_types.iter().any(|allowed| {
            match allowed.strip_suffix("/*") {
                Some(family) => ct
                    .split_once('/')
                    .is_some_and(|(top, _)| top.eq_ignore_ascii_case(family)),
                None => allowed.eq_ignore_ascii_case(ct),
            }
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        engine_debug!("Fetched {} bytes from {}", bytes.len(), final_url);

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: redirect_counter.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

/// Drives an async [`Fetcher`] to completion on a private current-thread
/// runtime, so each download blocks the caller until it finishes.
///
/// Must not be used from inside another tokio runtime.
pub struct BlockingDownloader {
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<dyn Fetcher>,
}

impl BlockingDownloader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| FetchError::new(FailureKind::Runtime, err.to_string()))?;
        Ok(Self { runtime, fetcher })
    }

    pub fn with_settings(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::new(Arc::new(ReqwestFetcher::new(settings)))
    }
}

impl Download for BlockingDownloader {
    fn download(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.runtime.block_on(self.fetcher.fetch(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher_allowing(types: &[&str]) -> ReqwestFetcher {
        ReqwestFetcher::new(FetchSettings {
            allowed_content_types: types.iter().map(|t| t.to_string()).collect(),
            ..FetchSettings::default()
        })
    }

    #[test]
    fn empty_allow_list_accepts_everything() {
        assert!(fetcher_allowing(&[]).is_content_type_allowed("application/octet-stream"));
    }

    #[test]
    fn media_settings_accept_media_only() {
        let fetcher = ReqwestFetcher::new(FetchSettings::for_media());
        assert!(fetcher.is_content_type_allowed("image/gif"));
        assert!(fetcher.is_content_type_allowed("video/quicktime"));
        assert!(fetcher.is_content_type_allowed("audio/mpeg"));
        assert!(fetcher.is_content_type_allowed("application/octet-stream"));
        assert!(!fetcher.is_content_type_allowed("text/html; charset=utf-8"));
        assert!(!fetcher.is_content_type_allowed("application/json"));
    }

    #[test]
    fn family_wildcard_matches_subtypes() {
        let fetcher = fetcher_allowing(&["image/*", "video/mp4"]);
        assert!(fetcher.is_content_type_allowed("image/jpeg"));
        assert!(fetcher.is_content_type_allowed("IMAGE/png; charset=binary"));
        assert!(fetcher.is_content_type_allowed("video/mp4"));
        assert!(!fetcher.is_content_type_allowed("video/quicktime"));
        assert!(!fetcher.is_content_type_allowed("text/html"));
    }
}
