mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use snip::application::services::LinkService;
use snip::domain::click_worker::{ClickWorkerSettings, run_click_worker};
use snip::domain::repositories::MappingStore;
use snip::infrastructure::persistence::MemoryMappingStore;

#[tokio::test]
async fn test_concurrent_resolves_are_all_counted() {
    let store = Arc::new(MemoryMappingStore::new());
    let (tx, rx) = mpsc::channel(1000);
    let worker = tokio::spawn(run_click_worker(
        rx,
        store.clone(),
        ClickWorkerSettings {
            concurrency: 8,
            timeout: Duration::from_secs(5),
        },
    ));

    let service = Arc::new(LinkService::new(
        store.clone(),
        tx,
        Duration::from_secs(5),
    ));
    let code = service
        .shorten_url("https://example.com/popular")
        .await
        .unwrap()
        .into_mapping()
        .short_code;

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let service = service.clone();
            let code = code.clone();
            tokio::spawn(async move { service.resolve_url(&code).await.unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    // Closing the queue lets the worker finish its in-flight increments.
    drop(service);
    worker.await.unwrap();

    let mapping = store.find_by_short_code(&code).await.unwrap().unwrap();
    assert_eq!(mapping.click_count, 100);
}

#[tokio::test]
async fn test_resolve_returns_count_before_visit() {
    let app = common::spawn_app();
    let code = app.shorten("https://example.com").await;

    app.server.get(&format!("/{code}")).await;
    app.wait_for_clicks(&code, 1).await;

    let (tx, _rx) = mpsc::channel(1);
    let service = LinkService::new(app.store.clone(), tx, Duration::from_secs(5));

    let mapping = service.resolve_url(&code).await.unwrap();
    assert_eq!(mapping.click_count, 1);
}

#[tokio::test]
async fn test_resolve_succeeds_when_click_queue_is_full() {
    let store = Arc::new(MemoryMappingStore::new());
    let (tx, _rx) = mpsc::channel(1);
    let service = LinkService::new(store.clone(), tx, Duration::from_secs(5));

    let code = service
        .shorten_url("https://example.com")
        .await
        .unwrap()
        .into_mapping()
        .short_code;

    // Nobody drains the queue, so only the first click fits.
    for _ in 0..5 {
        let mapping = service.resolve_url(&code).await.unwrap();
        assert_eq!(mapping.original_url, "https://example.com");
    }
}
