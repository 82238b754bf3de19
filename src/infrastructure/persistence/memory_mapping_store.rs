//! In-process implementation of the mapping store.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingStore, StoreSummary};
use crate::error::AppError;

/// A mapping store kept in process memory.
///
/// Used for local development (`STORE_BACKEND=memory`) and tests. Data is lost on
/// restart. Each operation holds the lock for its whole duration, which gives the
/// same per-record atomicity as the PostgreSQL store.
#[derive(Default)]
pub struct MemoryMappingStore {
    mappings: Mutex<Vec<Mapping>>,
}

impl MemoryMappingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Mapping>>, AppError> {
        self.mappings
            .lock()
            .map_err(|_| AppError::persistence("Memory store is poisoned", json!({})))
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .find(|m| m.original_url == url)
            .cloned())
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        Ok(self.lock()?.iter().find(|m| m.short_code == code).cloned())
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let mut mappings = self.lock()?;

        if mappings
            .iter()
            .any(|m| m.short_code == new_mapping.short_code)
        {
            return Err(AppError::persistence(
                "Unique constraint violation",
                json!({ "constraint": "short_code" }),
            ));
        }

        let id = mappings.len() as i64 + 1;
        let mapping = new_mapping.into_mapping(id);
        mappings.push(mapping.clone());

        Ok(mapping)
    }

    async fn increment_click_count(&self, code: &str, delta: i64) -> Result<(), AppError> {
        let mut mappings = self.lock()?;

        let mapping = mappings
            .iter_mut()
            .find(|m| m.short_code == code)
            .ok_or_else(|| AppError::not_found("Short code not found", json!({ "code": code })))?;
        mapping.click_count += delta;

        Ok(())
    }

    async fn summary(&self) -> Result<StoreSummary, AppError> {
        let mappings = self.lock()?;

        Ok(StoreSummary {
            mappings: mappings.len() as i64,
            total_clicks: mappings.iter().map(|m| m.click_count).sum(),
        })
    }

    async fn ping(&self) -> bool {
        self.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_mapping(url: &str, code: &str) -> NewMapping {
        NewMapping {
            original_url: url.to_string(),
            short_code: code.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = MemoryMappingStore::new();

        let first = store.insert(new_mapping("http://a.com", "aaaaaa")).await.unwrap();
        let second = store.insert(new_mapping("http://b.com", "bbbbbb")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.click_count, 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryMappingStore::new();
        store.insert(new_mapping("http://a.com", "dup123")).await.unwrap();

        let result = store.insert(new_mapping("http://b.com", "dup123")).await;

        assert!(matches!(result, Err(AppError::Persistence { .. })));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_original_url_and_code() {
        let store = MemoryMappingStore::new();
        store.insert(new_mapping("http://a.com", "aaaaaa")).await.unwrap();

        let by_url = store.find_by_original_url("http://a.com").await.unwrap();
        let by_code = store.find_by_short_code("aaaaaa").await.unwrap();

        assert_eq!(by_url, by_code);
        assert!(store.find_by_short_code("zzzzzz").await.unwrap().is_none());
        assert!(store.find_by_original_url("http://b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_click_count() {
        let store = MemoryMappingStore::new();
        store.insert(new_mapping("http://a.com", "aaaaaa")).await.unwrap();

        store.increment_click_count("aaaaaa", 1).await.unwrap();
        store.increment_click_count("aaaaaa", 2).await.unwrap();

        let mapping = store.find_by_short_code("aaaaaa").await.unwrap().unwrap();
        assert_eq!(mapping.click_count, 3);

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.mappings, 1);
        assert_eq!(summary.total_clicks, 3);
    }

    #[tokio::test]
    async fn test_increment_unknown_code() {
        let store = MemoryMappingStore::new();

        let result = store.increment_click_count("nope00", 1).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
