use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFeed {
    pub xml: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode raw feed bytes into UTF-8 using: BOM -> XML declaration -> chardetng fallback.
///
/// The returned document's XML declaration, if it names an encoding, is
/// rewritten to `UTF-8` so downstream parsers do not decode it a second time.
pub fn decode_feed(bytes: &[u8]) -> Result<DecodedFeed, DecodeError> {
    let encoding = detect_encoding(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
            message: "decoding error".into(),
        });
    }
    Ok(DecodedFeed {
        xml: declare_utf8(&text),
        encoding_label: encoding.name().to_string(),
    })
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(label) = declared_encoding(bytes) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return enc;
        }
    }

    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// The `encoding="..."` value from a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let decl = declaration(&head)?;
    let (_, rest) = decl.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let end = value.find(quote)?;
    Some(value[..end].trim().to_string())
}

fn declaration(text: &str) -> Option<&str> {
    let start = text.find("<?xml")?;
    if !text[..start].trim().is_empty() {
        return None;
    }
    let end = text[start..].find("?>")?;
    Some(&text[start..start + end + 2])
}

fn declare_utf8(text: &str) -> String {
    let text = text.trim_start_matches('\u{feff}');
    let Some(decl) = declaration(text) else {
        return text.to_string();
    };
    if !decl.contains("encoding") {
        return text.to_string();
    }
    let rest = &text[text.find(decl).unwrap_or(0) + decl.len()..];
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{rest}")
}
