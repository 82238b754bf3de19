//! Normalization and validation of URLs submitted for shortening.

use url::Url;

/// Reasons a submitted URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    Malformed(String),
}

impl UrlNormalizationError {
    /// Short reason tag reported in error details.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Normalizes a raw URL into the form that is stored and deduplicated on.
///
/// # Rules
///
/// 1. The input must be non-empty (it is not trimmed)
/// 2. ASCII control characters (tab, CR, LF, ...) anywhere are rejected, since
///    the parser would silently strip them while the stored string keeps them
/// 3. Without an `http://` or `https://` prefix, `http://` is prepended
/// 4. The result must parse as an absolute URL with a host
///
/// The returned string is the prefixed input itself, not the parser's
/// re-serialization, so `example.com` becomes `http://example.com` without a
/// trailing slash.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for an empty input and
/// [`UrlNormalizationError::Malformed`] when the prefixed string does not parse.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
/// assert_eq!(
///     normalize_url("https://openai.com/research").unwrap(),
///     "https://openai.com/research"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    if input.bytes().any(|b| b.is_ascii_control()) {
        return Err(UrlNormalizationError::Malformed(
            "contains control characters".to_string(),
        ));
    }

    let normalized = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    let parsed =
        Url::parse(&normalized).map_err(|e| UrlNormalizationError::Malformed(e.to_string()))?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::Malformed("missing host".to_string()));
    }

    Ok(normalized)
}
