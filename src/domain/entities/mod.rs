//! Core domain entities.
//!
//! The service persists a single entity, [`Mapping`]. Creation goes through the
//! separate [`NewMapping`] input struct so that store-owned fields (`id`,
//! `click_count`) can never be set by callers.

pub mod mapping;

pub use mapping::{Mapping, NewMapping};
