//! Extension manifest declaration and validation.

use crate::extension::capability::{
    parse_runtime_capability, RuntimeCapability, RuntimeCapabilityError,
};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hook fired before the host generates warnings for one curation.
pub const HOOK_WILL_GEN_CURATION_WARNINGS: &str = "curation.will_gen_warnings";

const SUPPORTED_HOOKS: &[&str] = &[HOOK_WILL_GEN_CURATION_WARNINGS];

/// Returns hook ids an extension may subscribe to.
pub fn supported_hooks() -> &'static [&'static str] {
    SUPPORTED_HOOKS
}

/// Declarative extension manifest.
///
/// Every command the extension registers at activation must be declared
/// here, and every runtime capability its handlers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionManifest {
    /// Stable extension identifier, e.g. `core-curation`.
    pub id: String,
    /// Manifest semantic version string (`major.minor.patch`).
    pub version: String,
    /// Contributed command ids, each prefixed with `<id>.`.
    pub commands: Vec<String>,
    /// Subscribed host hook ids.
    pub hooks: Vec<String>,
    /// Declared runtime capabilities (`curation|file|dialog|shell`).
    pub runtime_capabilities: Vec<String>,
}

impl ExtensionManifest {
    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ManifestValidationError::EmptyId);
        }
        if !is_valid_identifier(id) {
            return Err(ManifestValidationError::InvalidId(self.id.clone()));
        }

        if self.version.trim().is_empty() {
            return Err(ManifestValidationError::EmptyVersion);
        }
        if !is_semver_triplet(self.version.trim()) {
            return Err(ManifestValidationError::InvalidVersion(
                self.version.clone(),
            ));
        }

        if self.commands.is_empty() && self.hooks.is_empty() {
            return Err(ManifestValidationError::MissingContributions);
        }

        let mut seen_commands = BTreeSet::<&str>::new();
        for command in &self.commands {
            let command = command.trim();
            let suffix = command
                .strip_prefix(id)
                .and_then(|rest| rest.strip_prefix('.'));
            match suffix {
                Some(suffix) if is_valid_identifier(suffix) => {}
                _ => return Err(ManifestValidationError::InvalidCommandId(command.to_string())),
            }
            if !seen_commands.insert(command) {
                return Err(ManifestValidationError::DuplicateCommand(
                    command.to_string(),
                ));
            }
        }

        let mut seen_hooks = BTreeSet::<&str>::new();
        for hook in &self.hooks {
            let hook = hook.trim();
            if !supported_hooks().contains(&hook) {
                return Err(ManifestValidationError::UnsupportedHook(hook.to_string()));
            }
            if !seen_hooks.insert(hook) {
                return Err(ManifestValidationError::DuplicateHook(hook.to_string()));
            }
        }

        let mut seen_capabilities = BTreeSet::new();
        for value in &self.runtime_capabilities {
            let capability = parse_runtime_capability(value)
                .map_err(ManifestValidationError::InvalidRuntimeCapability)?;
            if !seen_capabilities.insert(capability) {
                return Err(ManifestValidationError::DuplicateRuntimeCapability(
                    capability,
                ));
            }
        }

        Ok(())
    }

    /// Parsed runtime capabilities; unparsable entries are ignored.
    pub fn runtime_capability_set(&self) -> BTreeSet<RuntimeCapability> {
        self.runtime_capabilities
            .iter()
            .filter_map(|value| parse_runtime_capability(value).ok())
            .collect()
    }

    pub fn declares_command(&self, command_id: &str) -> bool {
        self.commands
            .iter()
            .any(|command| command.trim() == command_id)
    }

    pub fn declares_hook(&self, hook_id: &str) -> bool {
        self.hooks.iter().any(|hook| hook.trim() == hook_id)
    }
}

fn is_valid_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    let mut prev_separator = false;
    for c in chars {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_separator = false;
            continue;
        }
        if c == '.' || c == '_' || c == '-' {
            if prev_separator {
                return false;
            }
            prev_separator = true;
            continue;
        }
        return false;
    }
    !prev_separator
}

fn is_semver_triplet(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValidationError {
    EmptyId,
    InvalidId(String),
    EmptyVersion,
    InvalidVersion(String),
    MissingContributions,
    InvalidCommandId(String),
    DuplicateCommand(String),
    UnsupportedHook(String),
    DuplicateHook(String),
    InvalidRuntimeCapability(RuntimeCapabilityError),
    DuplicateRuntimeCapability(RuntimeCapability),
}

impl Display for ManifestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "manifest id must not be empty"),
            Self::InvalidId(value) => write!(f, "manifest id is invalid: {value}"),
            Self::EmptyVersion => write!(f, "manifest version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "manifest version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::MissingContributions => {
                write!(f, "manifest must contribute at least one command or hook")
            }
            Self::InvalidCommandId(value) => write!(
                f,
                "command id is invalid: {value} (expected `<extension id>.<name>`)"
            ),
            Self::DuplicateCommand(value) => write!(f, "command id is duplicated: {value}"),
            Self::UnsupportedHook(value) => write!(f, "hook is unsupported: {value}"),
            Self::DuplicateHook(value) => write!(f, "hook is duplicated: {value}"),
            Self::InvalidRuntimeCapability(err) => write!(f, "{err}"),
            Self::DuplicateRuntimeCapability(value) => {
                write!(f, "runtime capability is duplicated: {value}")
            }
        }
    }
}

impl Error for ManifestValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRuntimeCapability(err) => Some(err),
            _ => None,
        }
    }
}
