//! Curation domain model as seen by the extension.
//!
//! # Responsibility
//! - Mirror the subset of host curation fields the extension reads/patches.
//! - Define the warning collection shape shared with the host UI layer.
//!
//! # Invariants
//! - Curation records are host-owned; the extension only patches fields.
//! - Absent optional fields are `None`, never sentinel strings.

pub mod curation;
pub mod warnings;
