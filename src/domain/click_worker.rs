//! Background worker applying click counter increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::MappingStore;

/// Tuning knobs for [`run_click_worker`].
#[derive(Debug, Clone, Copy)]
pub struct ClickWorkerSettings {
    /// Maximum number of increments in flight at once.
    pub concurrency: usize,
    /// Deadline for a single increment, independent of any request.
    pub timeout: Duration,
}

impl Default for ClickWorkerSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Consumes click events until every sender is dropped.
///
/// Each event becomes a detached task that increments the counter under its own
/// timeout. Failures and timeouts are logged and dropped; nothing is reported back
/// to the request that produced the event.
///
/// Once the channel closes, the worker waits for the increments still in flight
/// and then returns.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    store: Arc<dyn MappingStore>,
    settings: ClickWorkerSettings,
) {
    let concurrency = settings.concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let store = store.clone();
        tokio::spawn(async move {
            let _permit = permit;
            apply_click(store.as_ref(), &event, settings.timeout).await;
        });
    }

    // Wait for in-flight increments by reclaiming every permit.
    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn apply_click(store: &dyn MappingStore, event: &ClickEvent, timeout: Duration) {
    match tokio::time::timeout(
        timeout,
        store.increment_click_count(&event.short_code, event.delta),
    )
    .await
    {
        Ok(Ok(())) => debug!(code = %event.short_code, "Click recorded"),
        Ok(Err(e)) => warn!(code = %event.short_code, "Failed to record click: {}", e),
        Err(_) => warn!(
            code = %event.short_code,
            "Click increment timed out after {:?}", timeout
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Mapping, NewMapping};
    use crate::domain::repositories::{MockMappingStore, StoreSummary};
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_worker_applies_every_event() {
        let mut store = MockMappingStore::new();
        store
            .expect_increment_click_count()
            .withf(|code, delta| code == "abc123" && *delta == 1)
            .times(3)
            .returning(|_, _| Ok(()));

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(
            rx,
            Arc::new(store),
            ClickWorkerSettings::default(),
        ));

        for _ in 0..3 {
            tx.send(ClickEvent::visit("abc123")).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_survives_store_errors() {
        let mut store = MockMappingStore::new();
        store
            .expect_increment_click_count()
            .times(2)
            .returning(|code, _| {
                Err(AppError::not_found(
                    "Short code not found",
                    json!({ "code": code }),
                ))
            });

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(
            rx,
            Arc::new(store),
            ClickWorkerSettings {
                concurrency: 1,
                timeout: Duration::from_secs(1),
            },
        ));

        tx.send(ClickEvent::visit("gone01")).await.unwrap();
        tx.send(ClickEvent::visit("gone02")).await.unwrap();
        drop(tx);

        worker.await.unwrap();
    }

    /// Store that hangs on one code and counts increments for the others.
    struct HangingStore {
        applied: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MappingStore for HangingStore {
        async fn find_by_original_url(&self, _url: &str) -> Result<Option<Mapping>, AppError> {
            Ok(None)
        }

        async fn find_by_short_code(&self, _code: &str) -> Result<Option<Mapping>, AppError> {
            Ok(None)
        }

        async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
            Ok(new_mapping.into_mapping(1))
        }

        async fn increment_click_count(&self, code: &str, _delta: i64) -> Result<(), AppError> {
            if code == "stuck1" {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.applied.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn summary(&self) -> Result<StoreSummary, AppError> {
            Ok(StoreSummary::default())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_drops_timed_out_increment() {
        let store = Arc::new(HangingStore {
            applied: AtomicUsize::new(0),
        });

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(
            rx,
            store.clone(),
            ClickWorkerSettings {
                concurrency: 2,
                timeout: Duration::from_secs(5),
            },
        ));

        tx.send(ClickEvent::visit("stuck1")).await.unwrap();
        tx.send(ClickEvent::visit("abc123")).await.unwrap();
        drop(tx);

        worker.await.unwrap();

        // Only the increment that finished in time was applied.
        assert_eq!(store.applied.load(Ordering::SeqCst), 1);
    }
}
