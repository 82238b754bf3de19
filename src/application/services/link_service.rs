//! Short code allocation, resolution and preview.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingStore;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_reserved};
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_url};

/// Number of generated candidates tried before allocation gives up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// Outcome of [`LinkService::shorten_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new mapping was allocated and persisted.
    Created(Mapping),
    /// The URL had already been shortened; the stored mapping is returned as is.
    Existing(Mapping),
}

impl Shortened {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn mapping(&self) -> &Mapping {
        match self {
            Self::Created(m) | Self::Existing(m) => m,
        }
    }

    pub fn into_mapping(self) -> Mapping {
        match self {
            Self::Created(m) | Self::Existing(m) => m,
        }
    }
}

/// Service for creating and resolving short codes.
///
/// Holds the process-wide store handle and the sending half of the click queue.
/// Every store call made on behalf of a request is bounded by `store_timeout`.
/// Click increments are handed to [`crate::domain::click_worker::run_click_worker`]
/// and never awaited.
pub struct LinkService {
    store: Arc<dyn MappingStore>,
    click_sender: mpsc::Sender<ClickEvent>,
    store_timeout: Duration,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        store: Arc<dyn MappingStore>,
        click_sender: mpsc::Sender<ClickEvent>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            click_sender,
            store_timeout,
        }
    }

    /// Returns the mapping for `raw_url`, allocating one if the URL is new.
    ///
    /// The URL is normalized first (`http://` is prepended when no http(s) scheme
    /// is present). A URL that is already stored returns its existing mapping
    /// without generating a code.
    ///
    /// Two concurrent first-time calls for the same URL can both miss the lookup
    /// and create two mappings with different codes. The store does not enforce
    /// URL uniqueness, so this window is left open.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty or malformed
    /// - [`AppError::AllocationExhausted`] if every candidate code collided
    /// - [`AppError::RandomSource`] if the entropy source failed
    /// - [`AppError::Persistence`] if the store failed or timed out
    pub async fn shorten_url(&self, raw_url: &str) -> Result<Shortened, AppError> {
        let original_url = normalize_url(raw_url).map_err(|e| match e {
            UrlNormalizationError::Empty => {
                AppError::bad_request("URL is required", json!({ "reason": e.reason() }))
            }
            UrlNormalizationError::Malformed(ref detail) => AppError::bad_request(
                "Invalid URL format",
                json!({ "reason": e.reason(), "detail": detail }),
            ),
        })?;

        if let Some(existing) = self
            .bounded(self.store.find_by_original_url(&original_url))
            .await?
        {
            debug!(code = %existing.short_code, "URL already shortened");
            return Ok(Shortened::Existing(existing));
        }

        let short_code = self.allocate_code().await?;

        let new_mapping = NewMapping {
            original_url,
            short_code,
            created_at: Utc::now(),
        };

        let mapping = self.bounded(self.store.insert(new_mapping)).await?;
        info!(code = %mapping.short_code, url = %mapping.original_url, "Created mapping");

        Ok(Shortened::Created(mapping))
    }

    /// Looks up `code` for redirection and schedules a click increment.
    ///
    /// The returned mapping reflects the state before this visit is counted. The
    /// increment is best-effort: if the click queue is full or closed it is dropped,
    /// and its eventual success or failure is never reported here.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `code` is empty
    /// - [`AppError::NotFound`] if no mapping has that code
    /// - [`AppError::Persistence`] if the lookup failed or timed out
    pub async fn resolve_url(&self, code: &str) -> Result<Mapping, AppError> {
        let mapping = self.find_by_code(code).await?;
        self.record_click(&mapping.short_code);
        Ok(mapping)
    }

    /// Looks up `code` for display without counting a click.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve_url`].
    pub async fn preview_url(&self, code: &str) -> Result<Mapping, AppError> {
        self.find_by_code(code).await
    }

    /// Returns `true` while the click worker is still receiving events.
    pub fn click_queue_open(&self) -> bool {
        !self.click_sender.is_closed()
    }

    /// Remaining free slots in the click queue.
    pub fn click_queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }

    /// Reports whether the store answers.
    pub async fn store_available(&self) -> bool {
        tokio::time::timeout(self.store_timeout, self.store.ping())
            .await
            .unwrap_or(false)
    }

    async fn find_by_code(&self, code: &str) -> Result<Mapping, AppError> {
        if code.is_empty() {
            return Err(AppError::bad_request(
                "Short code is required",
                json!({ "reason": "empty" }),
            ));
        }

        self.bounded(self.store.find_by_short_code(code))
            .await?
            .ok_or_else(|| AppError::not_found("Short code not found", json!({ "code": code })))
    }

    /// Draws candidates until one is unused, up to [`MAX_ALLOCATION_ATTEMPTS`].
    ///
    /// Reserved route names count as collisions.
    async fn allocate_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let candidate = generate_code()?;

            if is_reserved(&candidate) {
                debug!(attempt, code = %candidate, "Skipping reserved short code");
                continue;
            }

            if self
                .bounded(self.store.find_by_short_code(&candidate))
                .await?
                .is_none()
            {
                return Ok(candidate);
            }

            debug!(attempt, code = %candidate, "Short code collision");
        }

        Err(AppError::allocation_exhausted(
            "Failed to generate unique short code",
            json!({ "attempts": MAX_ALLOCATION_ATTEMPTS }),
        ))
    }

    fn record_click(&self, code: &str) {
        match self.click_sender.try_send(ClickEvent::visit(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(code = %event.short_code, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(code = %event.short_code, "Click queue closed, dropping click");
            }
        }
    }

    /// Applies the per-call store deadline.
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.store_timeout, operation)
            .await
            .map_err(|_| {
                AppError::persistence(
                    "Store operation timed out",
                    json!({ "timeout_secs": self.store_timeout.as_secs() }),
                )
            })?
    }
}
