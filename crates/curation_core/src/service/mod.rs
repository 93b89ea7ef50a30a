//! Curation command and hook implementations.
//!
//! # Responsibility
//! - Implement each command on top of host service traits only.
//! - Catch and log per-item failures so batches keep going.
//!
//! # Invariants
//! - Services keep no state between invocations.
//! - Validation services only append to the provided warning collection.

pub mod cache;
pub mod data_pack;
pub mod requirements;
pub mod validation;
