//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - The persisted [`entities::Mapping`] record
//! - [`repositories`] - The [`repositories::MappingStore`] capability
//! - [`click_event`] - Pending click counter increments
//! - [`click_worker`] - Background worker applying those increments
//!
//! # Click Processing Flow
//!
//! 1. A redirect resolves a short code through the link service
//! 2. A [`click_event::ClickEvent`] is offered to a bounded channel (never awaited)
//! 3. [`click_worker::run_click_worker`] applies it as a detached, time-boxed task
//! 4. The counter is bumped atomically via [`repositories::MappingStore`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
