//! Application layer services implementing business logic.
//!
//! Services consume the domain's [`crate::domain::repositories::MappingStore`]
//! capability and expose plain operations to the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening, resolution and preview

pub mod services;
