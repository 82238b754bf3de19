//! Composition of public short URLs from request metadata.

use crate::AppError;
use axum::http::{HeaderMap, header};

/// Header set by reverse proxies to report the client-facing scheme.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Extracts the `Host` header verbatim, port included.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the header is missing, empty or not valid
/// UTF-8.
pub fn extract_host(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?
        .trim();

    if host.is_empty() {
        return Err(AppError::bad_request(
            "Invalid Host header",
            serde_json::json!({}),
        ));
    }

    Ok(host.to_string())
}

/// Reports whether the client connection was encrypted.
///
/// The server itself only speaks plain HTTP, so this is `true` only when a
/// trusted proxy in front of it says the client used HTTPS.
pub fn is_encrypted(headers: &HeaderMap, behind_proxy: bool) -> bool {
    behind_proxy
        && headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

/// Builds `{scheme}://{host}`.
pub fn base_url(host: &str, encrypted: bool) -> String {
    let scheme = if encrypted { "https" } else { "http" };
    format!("{scheme}://{host}")
}

/// Builds `{base}/{code}`.
pub fn short_url(base: &str, code: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn test_extract_host_keeps_port() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:8080"));

        assert_eq!(extract_host(&headers).unwrap(), "localhost:8080");
    }

    #[test]
    fn test_extract_host_missing() {
        let headers = HeaderMap::new();
        let result = extract_host(&headers);

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_base_url_scheme() {
        assert_eq!(base_url("host", false), "http://host");
        assert_eq!(base_url("host:3000", true), "https://host:3000");
    }

    #[test]
    fn test_short_url() {
        assert_eq!(short_url("http://host", "aB3dE9"), "http://host/aB3dE9");
        assert_eq!(short_url("http://host/", "aB3dE9"), "http://host/aB3dE9");
    }

    #[test]
    fn test_forwarded_proto_requires_trusted_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("https"));

        assert!(is_encrypted(&headers, true));
        assert!(!is_encrypted(&headers, false));
    }

    #[test]
    fn test_forwarded_proto_first_hop_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("HTTPS, http"));
        assert!(is_encrypted(&headers, true));

        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("http"));
        assert!(!is_encrypted(&headers, true));

        assert!(!is_encrypted(&HeaderMap::new(), true));
    }
}
