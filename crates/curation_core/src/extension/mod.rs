//! Extension kernel contracts.
//!
//! This module defines extension manifests, runtime capability gates and the
//! in-process command/hook table the host dispatches through.

pub mod capability;
pub mod kernel;
pub mod manifest;
