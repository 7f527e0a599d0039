//! MIME type resolution for attachment parts.
//!
//! Priority: explicit non-generic type, then the data-URI prefix, then the
//! decoded magic bytes of the payload, then [`DEFAULT_MIME_TYPE`]. Every
//! table is checked in order, first match wins.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Fallback when nothing better is known.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Known `data:` URI prefixes, in match order.
const DATA_URI_PREFIXES: &[(&str, &str)] = &[
    ("data:image/png", "image/png"),
    ("data:image/jpeg", "image/jpeg"),
    ("data:image/jpg", "image/jpeg"),
    ("data:image/webp", "image/webp"),
    ("data:image/gif", "image/gif"),
    ("data:image/heic", "image/heic"),
    ("data:image/heif", "image/heif"),
    ("data:application/pdf", "application/pdf"),
    ("data:text/plain", "text/plain"),
    ("data:text/csv", "text/csv"),
    ("data:text/markdown", "text/markdown"),
    ("data:audio/mpeg", "audio/mpeg"),
    ("data:audio/wav", "audio/wav"),
    ("data:video/mp4", "video/mp4"),
];

/// Magic byte signatures `(offset, bytes, mime)`, in match order.
const MAGIC_SIGNATURES: &[(usize, &[u8], &str)] = &[
    (0, b"\x89PNG\r\n\x1a\n", "image/png"),
    (0, b"\xff\xd8\xff", "image/jpeg"),
    (0, b"GIF87a", "image/gif"),
    (0, b"GIF89a", "image/gif"),
    (0, b"%PDF", "application/pdf"),
    (8, b"WEBP", "image/webp"),
    (8, b"WAVE", "audio/wav"),
];

/// Base64 characters decoded for sniffing; 16 chars give 12 bytes.
const SNIFF_CHARS: usize = 16;

/// The base64 payload of an attachment: everything after the first comma of
/// a data URI, or the whole string otherwise.
pub fn payload_of(data: &str) -> &str {
    if data.starts_with("data:") {
        data.split_once(',').map_or("", |(_, payload)| payload)
    } else {
        data
    }
}

/// Resolve the MIME type of an attachment.
pub fn resolve_mime_type(explicit: Option<&str>, data: &str) -> String {
    if let Some(mime) = explicit.map(str::trim).filter(|m| is_specific(m)) {
        return mime.to_string();
    }
    from_data_uri(data)
        .or_else(|| sniff(payload_of(data)))
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

fn is_specific(mime: &str) -> bool {
    !mime.is_empty() && !mime.eq_ignore_ascii_case(DEFAULT_MIME_TYPE)
}

fn from_data_uri(data: &str) -> Option<&'static str> {
    let lower = data.get(..64).unwrap_or(data).to_ascii_lowercase();
    DATA_URI_PREFIXES.iter().find_map(|(prefix, mime)| {
        let rest = lower.strip_prefix(*prefix)?;
        matches!(rest.chars().next(), Some(';' | ',')).then_some(*mime)
    })
}

fn sniff(payload: &str) -> Option<&'static str> {
    let head = payload.trim_start();
    let take = head.len().min(SNIFF_CHARS) / 4 * 4;
    let bytes = STANDARD.decode(head.get(..take)?).ok()?;
    MAGIC_SIGNATURES.iter().find_map(|(offset, magic, mime)| {
        bytes
            .get(*offset..offset + magic.len())
            .filter(|window| window == magic)
            .map(|_| *mime)
    })
}
