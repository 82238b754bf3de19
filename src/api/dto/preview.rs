//! DTO for the preview endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Mapping;

/// Current state of a mapping, shown instead of redirecting.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl From<Mapping> for PreviewResponse {
    fn from(mapping: Mapping) -> Self {
        Self {
            short_code: mapping.short_code,
            original_url: mapping.original_url,
            created_at: mapping.created_at,
            click_count: mapping.click_count,
        }
    }
}
