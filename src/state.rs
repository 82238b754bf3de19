//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// Trust `X-Forwarded-Proto` when deciding the scheme of short URLs.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, behind_proxy: bool) -> Self {
        Self {
            link_service,
            behind_proxy,
        }
    }
}
