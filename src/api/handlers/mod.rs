//! HTTP request handlers for API endpoints.

pub mod health;
pub mod preview;
pub mod redirect;
pub mod shorten;

pub use health::health_handler;
pub use preview::{missing_code_handler, preview_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
