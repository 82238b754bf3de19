//! Infrastructure layer for external integrations.
//!
//! Provides concrete implementations of the domain's
//! [`crate::domain::repositories::MappingStore`] capability.

pub mod persistence;
