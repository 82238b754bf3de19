//! Repository trait definitions for the domain layer.
//!
//! The core only depends on the [`MappingStore`] capability. Implementations live
//! in `crate::infrastructure::persistence`; a `mockall` mock is generated for unit
//! tests.

pub mod mapping_store;

pub use mapping_store::{MappingStore, StoreSummary};

#[cfg(test)]
pub use mapping_store::MockMappingStore;
