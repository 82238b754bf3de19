//! Mapping entity representing a short code to URL association.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted short code mapping.
///
/// `id` is assigned by the store. `original_url`, `short_code` and `created_at`
/// never change after creation; `click_count` only grows through atomic increments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
            click_count,
        }
    }
}

/// Input data for inserting a new mapping.
///
/// The click counter of a freshly inserted mapping always starts at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

impl NewMapping {
    /// Materializes the persisted form once the store has assigned an id.
    pub fn into_mapping(self, id: i64) -> Mapping {
        Mapping::new(id, self.original_url, self.short_code, self.created_at, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let now = Utc::now();
        let mapping = Mapping::new(
            1,
            "https://example.com".to_string(),
            "abc123".to_string(),
            now,
            7,
        );

        assert_eq!(mapping.id, 1);
        assert_eq!(mapping.original_url, "https://example.com");
        assert_eq!(mapping.short_code, "abc123");
        assert_eq!(mapping.created_at, now);
        assert_eq!(mapping.click_count, 7);
    }

    #[test]
    fn test_new_mapping_starts_with_zero_clicks() {
        let now = Utc::now();
        let new_mapping = NewMapping {
            original_url: "https://rust-lang.org".to_string(),
            short_code: "xYz789".to_string(),
            created_at: now,
        };

        let mapping = new_mapping.into_mapping(42);

        assert_eq!(mapping.id, 42);
        assert_eq!(mapping.short_code, "xYz789");
        assert_eq!(mapping.created_at, now);
        assert_eq!(mapping.click_count, 0);
    }
}
