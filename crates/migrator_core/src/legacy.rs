use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use thiserror::Error;
use url::Url;

/// URLs still served by the platform being migrated away from.
pub const DEFAULT_LEGACY_PATTERN: &str = r"^https?://([^/]*\.)?posterous\.com/";

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid legacy host pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Matcher for attribute values that point at the legacy host.
#[derive(Debug, Clone)]
pub struct LegacyPattern {
    regex: Regex,
}

impl LegacyPattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value.trim())
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for LegacyPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_LEGACY_PATTERN).expect("default legacy pattern is valid"),
        }
    }
}

/// Short local name for a legacy-hosted resource.
///
/// `http://x.posterous.com/99/foo.scaled1000.jpg` becomes `foo.jpg` with stem
/// `foo` and extension `jpg`: the size infix the host appended to resized
/// copies is dropped so the name lines up with the original upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    pub name: String,
    pub stem: String,
    pub extension: Option<String>,
}

impl ResourceName {
    pub fn from_url(value: &str) -> Option<Self> {
        let segment = last_segment(value)?;
        let (stem, extension) = match segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                (stem.to_string(), Some(ext.to_string()))
            }
            _ => (segment.clone(), None),
        };
        let stem = size_suffix().replace(&stem, "").into_owned();
        if stem.is_empty() {
            return None;
        }
        let name = match &extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.clone(),
        };
        Some(Self {
            name,
            stem,
            extension,
        })
    }
}

/// Collapses whitespace and underscores into single `_`.
pub(crate) fn normalize_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_sep = false;
    for c in input.chars() {
        if c.is_whitespace() || c == '_' {
            if !prev_sep {
                out.push('_');
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
    out
}

impl ResourceName {
    /// Whitespace-normalised stem, used for fuzzy file-name matching.
    pub fn normalized_stem(&self) -> String {
        normalize_whitespace(&self.stem)
    }

    /// True when `file_stem` contains this resource's stem once both are normalised.
    pub fn stem_matches(&self, file_stem: &str) -> bool {
        normalize_whitespace(file_stem).contains(&self.normalized_stem())
    }

    pub fn extension_matches(&self, file_extension: Option<&str>) -> bool {
        match (&self.extension, file_extension) {
            (Some(ours), Some(theirs)) => ours.eq_ignore_ascii_case(theirs),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Last non-empty path segment, percent-decoded. Decoded path separators
/// become `_` so the result stays a single file name.
fn last_segment(value: &str) -> Option<String> {
    let value = value.trim();
    let path = match Url::parse(value) {
        Ok(url) => url.path().to_string(),
        Err(_) => value
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let segment = path.rsplit('/').find(|segment| !segment.is_empty())?;
    let decoded = percent_decode_str(segment)
        .decode_utf8_lossy()
        .replace(['/', '\\'], "_");
    (!decoded.trim().is_empty()).then_some(decoded)
}

fn size_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(r"\.(?:scaled|thumb)\d*$").expect("size suffix regex"))
}
