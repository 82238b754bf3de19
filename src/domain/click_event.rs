//! Click event model for asynchronous click counting.

/// A pending click counter increment.
///
/// Created by [`crate::application::services::LinkService::resolve_url`] and sent
/// over a bounded channel to [`crate::domain::click_worker::run_click_worker`], so
/// the redirect response never waits for the store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub short_code: String,
    pub delta: i64,
}

impl ClickEvent {
    /// A single visit to `short_code`.
    pub fn visit(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            delta: 1,
        }
    }
}
