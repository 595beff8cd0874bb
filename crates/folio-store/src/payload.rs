//! Inline image payloads.
//!
//! The upload form sends images as data URLs
//! (`data:image/png;base64,iVBORw0...`). Bare base64 strings, and strings
//! carrying anything before a `;base64,` marker, are accepted too.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::{StoreError, StoreResult};

/// Standard alphabet; padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Extension used when the payload names no (known) image type.
const FALLBACK_EXTENSION: &str = "jpg";

/// A decoded payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    /// MIME type from the data URL header, lowercased.
    pub mime: Option<String>,
    /// File extension chosen for the blob.
    pub extension: &'static str,
}

/// Decode an inline payload into raw image bytes.
///
/// `limit` bounds the decoded size. Oversized payloads are rejected from
/// their encoded length before any decoding happens.
pub fn decode_payload(payload: &str, limit: u64) -> StoreResult<DecodedImage> {
    let payload = payload.trim();
    let (mime, data) = split_header(payload)?;

    let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if data.is_empty() {
        return Err(StoreError::Payload("payload has no data segment".into()));
    }

    // Exact for well-formed input; checked before paying for the decode.
    let padding = data.bytes().rev().take_while(|b| *b == b'=').count() as u64;
    let expected = (data.len() as u64 * 3 / 4).saturating_sub(padding);
    if expected > limit {
        return Err(StoreError::PayloadTooLarge {
            size: expected,
            limit,
        });
    }

    let bytes = LENIENT_BASE64
        .decode(data.as_bytes())
        .map_err(|e| StoreError::Payload(format!("invalid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(StoreError::Payload("payload decodes to zero bytes".into()));
    }
    if bytes.len() as u64 > limit {
        return Err(StoreError::PayloadTooLarge {
            size: bytes.len() as u64,
            limit,
        });
    }

    let extension = mime
        .as_deref()
        .and_then(extension_for_mime)
        .unwrap_or(FALLBACK_EXTENSION);

    Ok(DecodedImage {
        bytes,
        mime,
        extension,
    })
}

/// Split a payload into its optional MIME type and its data segment.
fn split_header(payload: &str) -> StoreResult<(Option<String>, &str)> {
    let Some(rest) = payload.strip_prefix("data:") else {
        let data = payload
            .rsplit_once(";base64,")
            .map_or(payload, |(_, data)| data);
        return Ok((None, data));
    };

    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| StoreError::Payload("data URL has no ',' separator".into()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(StoreError::Payload("data URL is not base64-encoded".into()));
    }
    if mime.is_empty() {
        return Ok((None, data));
    }
    if !mime.starts_with("image/") {
        return Err(StoreError::Payload(format!("not an image type: {mime}")));
    }
    Ok((Some(mime), data))
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let ext = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        "image/bmp" => "bmp",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        _ => return None,
    };
    Some(ext)
}
