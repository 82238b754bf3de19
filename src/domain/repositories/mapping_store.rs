//! Storage capability consumed by the link service and the click worker.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Aggregate numbers reported by the admin tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub mappings: i64,
    pub total_clicks: i64,
}

/// Key-value persistence for [`Mapping`] records.
///
/// Implementations must make [`MappingStore::insert`] and
/// [`MappingStore::increment_click_count`] atomic per record; callers hold no
/// locks of their own.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryMappingStore`] - in-process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Finds a mapping by exact original URL match.
    ///
    /// When several mappings share the URL, the oldest one is returned.
    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>, AppError>;

    /// Finds a mapping by exact short code match.
    async fn find_by_short_code(&self, code: &str) -> Result<Option<Mapping>, AppError>;

    /// Persists a new mapping and returns it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the write fails, including a
    /// duplicate short code.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError>;

    /// Atomically adds `delta` to the click counter of `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping has that code.
    async fn increment_click_count(&self, code: &str, delta: i64) -> Result<(), AppError>;

    /// Counts mappings and clicks across the whole store.
    async fn summary(&self) -> Result<StoreSummary, AppError>;

    /// Returns `true` if the backend answers.
    async fn ping(&self) -> bool;
}
