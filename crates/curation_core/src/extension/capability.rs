//! Runtime capability declarations gating which host services a command may use.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host service family a handler needs at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuntimeCapability {
    /// Curation store and platform catalog access.
    Curation,
    /// Filesystem and archive extraction access.
    File,
    /// Modal and file-open dialogs.
    Dialog,
    /// OS shell execution.
    Shell,
}

impl RuntimeCapability {
    /// Stable string id used in manifest declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Curation => RUNTIME_CAPABILITY_CURATION,
            Self::File => RUNTIME_CAPABILITY_FILE,
            Self::Dialog => RUNTIME_CAPABILITY_DIALOG,
            Self::Shell => RUNTIME_CAPABILITY_SHELL,
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Curation => "Read and patch curation metadata and look up platforms.",
            Self::File => "Read, extract and copy files inside curation folders.",
            Self::Dialog => "Show progress modals and file-open dialogs.",
            Self::Shell => "Run fixed OS shell commands such as cache clearing.",
        }
    }
}

impl Display for RuntimeCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const RUNTIME_CAPABILITY_CURATION: &str = "curation";
pub const RUNTIME_CAPABILITY_FILE: &str = "file";
pub const RUNTIME_CAPABILITY_DIALOG: &str = "dialog";
pub const RUNTIME_CAPABILITY_SHELL: &str = "shell";

const SUPPORTED_RUNTIME_CAPABILITY_STRINGS: &[&str] = &[
    RUNTIME_CAPABILITY_CURATION,
    RUNTIME_CAPABILITY_FILE,
    RUNTIME_CAPABILITY_DIALOG,
    RUNTIME_CAPABILITY_SHELL,
];

/// Returns supported runtime capability declaration strings.
pub fn supported_runtime_capability_strings() -> &'static [&'static str] {
    SUPPORTED_RUNTIME_CAPABILITY_STRINGS
}

/// Parses one runtime capability from a manifest string value.
pub fn parse_runtime_capability(value: &str) -> Result<RuntimeCapability, RuntimeCapabilityError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(RuntimeCapabilityError::EmptyCapability);
    }

    match normalized {
        RUNTIME_CAPABILITY_CURATION => Ok(RuntimeCapability::Curation),
        RUNTIME_CAPABILITY_FILE => Ok(RuntimeCapability::File),
        RUNTIME_CAPABILITY_DIALOG => Ok(RuntimeCapability::Dialog),
        RUNTIME_CAPABILITY_SHELL => Ok(RuntimeCapability::Shell),
        other => Err(RuntimeCapabilityError::UnsupportedCapability(
            other.to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCapabilityError {
    EmptyCapability,
    UnsupportedCapability(String),
}

impl Display for RuntimeCapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCapability => write!(f, "runtime capability value must not be empty"),
            Self::UnsupportedCapability(value) => {
                write!(f, "runtime capability is unsupported: {value}")
            }
        }
    }
}

impl Error for RuntimeCapabilityError {}
