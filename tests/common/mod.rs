#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use snip::application::services::LinkService;
use snip::domain::click_worker::{ClickWorkerSettings, run_click_worker};
use snip::domain::entities::Mapping;
use snip::domain::repositories::MappingStore;
use snip::infrastructure::persistence::MemoryMappingStore;
use snip::routes::service_routes;
use snip::state::AppState;

pub const HOST: &str = "sho.rt";

/// Server wired to an in-memory store with a live click worker.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryMappingStore>,
    pub worker: JoinHandle<()>,
}

pub fn create_test_state(store: Arc<dyn MappingStore>) -> (AppState, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(100);
    let worker = tokio::spawn(run_click_worker(
        rx,
        store.clone(),
        ClickWorkerSettings::default(),
    ));

    let link_service = Arc::new(LinkService::new(store, tx, Duration::from_secs(5)));
    (AppState::new(link_service, false), worker)
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryMappingStore::new());
    let (state, worker) = create_test_state(store.clone());

    let app = service_routes().with_state(state);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        store,
        worker,
    }
}

impl TestApp {
    /// Shortens `url` through the API and returns the short code.
    pub async fn shorten(&self, url: &str) -> String {
        let response = self
            .server
            .post("/shorten")
            .add_header("Host", HOST)
            .json(&serde_json::json!({ "url": url }))
            .await;

        let body: serde_json::Value = response.json();
        body["short_code"].as_str().unwrap().to_string()
    }

    pub async fn mapping(&self, code: &str) -> Mapping {
        self.store.find_by_short_code(code).await.unwrap().unwrap()
    }

    /// Polls the store until `code` has `expected` clicks recorded.
    pub async fn wait_for_clicks(&self, code: &str, expected: i64) -> Mapping {
        for _ in 0..200 {
            let mapping = self.mapping(code).await;
            if mapping.click_count >= expected {
                return mapping;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.mapping(code).await
    }
}
