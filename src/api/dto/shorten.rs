//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Mapping;

/// Longest URL accepted for shortening.
pub const MAX_URL_LENGTH: u64 = 2048;

/// Request to shorten a single URL.
///
/// A missing `url` field deserializes to an empty string and is rejected by the
/// link service like any other empty input.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(max = MAX_URL_LENGTH, message = "URL is too long"))]
    pub url: String,
}

/// Result of a shortening request, for both new and existing mappings.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
}

impl ShortenResponse {
    pub fn new(mapping: Mapping, short_url: String) -> Self {
        Self {
            original_url: mapping.original_url,
            short_code: mapping.short_code,
            short_url,
        }
    }
}
