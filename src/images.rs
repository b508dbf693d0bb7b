//! Image reference normalization.
//!
//! Image fields are persisted as relative storage keys (`uploads/...`). Clients
//! may send any of: a bare key, a key with a leading slash, a legacy absolute
//! URL (old hosts, ports or bucket names included), an already-proxied
//! `/api/images/...` URL, or a base64 data URI. Responses turn keys back into
//! proxy URLs served by this backend.

use crate::error::AppError;

pub const KEY_PREFIX: &str = "uploads/";
const PROXY_SEGMENT: &str = "api/images/";

/// What to do with a `data:` URI at a given call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataUriPolicy {
    /// Keep it as-is (legacy content stored inline).
    Allow,
    /// Refuse it with a 400.
    Reject,
}

pub fn is_data_uri(input: &str) -> bool {
    input.trim_start().starts_with("data:")
}

/// Canonical storage key for an image reference, or `None` for empty input and data URIs.
///
/// The result always starts with `uploads/`, never with a slash, and
/// `normalize_to_key(&normalize_to_key(x)?) == normalize_to_key(x)`.
pub fn normalize_to_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || is_data_uri(trimmed) {
        return None;
    }

    let path = strip_origin(trimmed);
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    if segments.is_empty() {
        return None;
    }

    // Anything before an `uploads` segment is a host-era prefix (bucket name,
    // `/api/images`, CDN folder) that is not part of the key.
    let relevant = match segments.iter().position(|s| *s == "uploads") {
        Some(idx) => &segments[idx + 1..],
        None => {
            let mut rest = &segments[..];
            while rest.len() >= 2 && rest[0] == "api" && rest[1] == "images" {
                rest = &rest[2..];
            }
            rest
        }
    };
    if relevant.is_empty() {
        return None;
    }

    Some(format!("{KEY_PREFIX}{}", relevant.join("/")))
}

/// Drop `scheme://host[:port]` (or a protocol-relative `//host`) and keep the path.
fn strip_origin(input: &str) -> &str {
    let after_scheme = if let Some(pos) = input.find("://") {
        let scheme = &input[..pos];
        if scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
            Some(&input[pos + 3..])
        } else {
            None
        }
    } else {
        input.strip_prefix("//")
    };

    match after_scheme {
        Some(rest) => match rest.find('/') {
            Some(slash) => &rest[slash..],
            None => "",
        },
        None => input,
    }
}

/// Client-facing URL for a canonical key.
pub fn proxy_url(api_base: &str, key: &str) -> String {
    format!(
        "{}/{PROXY_SEGMENT}{}",
        api_base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

/// Normalize an incoming image reference for persistence.
///
/// Empty input clears the field (`Ok(None)`).
pub fn for_storage(input: &str, policy: DataUriPolicy) -> Result<Option<String>, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if is_data_uri(trimmed) {
        return match policy {
            DataUriPolicy::Allow => Ok(Some(trimmed.to_string())),
            DataUriPolicy::Reject => Err(AppError::Validation(vec![
                "ไม่รองรับรูปภาพแบบ base64 กรุณาอัปโหลดไฟล์".to_string(),
            ])),
        };
    }
    normalize_to_key(trimmed)
        .map(Some)
        .ok_or_else(|| AppError::Validation(vec!["รูปแบบที่อยู่รูปภาพไม่ถูกต้อง".to_string()]))
}

/// Presentation transform for a stored value: keys become proxy URLs,
/// data URIs are returned unchanged.
pub fn for_display(stored: &str, api_base: &str) -> String {
    if is_data_uri(stored) {
        return stored.to_string();
    }
    match normalize_to_key(stored) {
        Some(key) => proxy_url(api_base, &key),
        None => String::new(),
    }
}

pub fn display_opt(stored: Option<&str>, api_base: &str) -> Option<String> {
    stored
        .filter(|s| !s.trim().is_empty())
        .map(|s| for_display(s, api_base))
}

/// Keys accepted by the image proxy: already canonical and under `uploads/`.
pub fn is_safe_key(key: &str) -> bool {
    key.starts_with(KEY_PREFIX)
        && normalize_to_key(key).as_deref() == Some(key)
        && !key.contains('\\')
        && !key.contains('\0')
}
