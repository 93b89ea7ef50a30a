//! Curation warning codes and the host warning collection.

use serde::{Deserialize, Serialize};

/// Field name used for launch-command warnings.
pub const FIELD_LAUNCH_COMMAND: &str = "launchCommand";
/// Field name used for documentation warnings.
pub const FIELD_NOTES: &str = "notes";

/// Machine-readable warning code consumed by the host UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// Launch command URL uses a protocol other than `http`.
    NotHttp,
    /// Launch command URL points at a file missing from the content folder.
    NonExistentFile,
    /// Hacked/partial status without explanatory notes.
    DocumentStatus,
}

impl WarningCode {
    /// Stable string code. Spelling is fixed by the host localization keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotHttp => "ilc_notHttp",
            Self::NonExistentFile => "ilc_nonExistant",
            Self::DocumentStatus => "documentStatus",
        }
    }
}

/// Host-provided warning collection: two parallel lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationWarnings {
    pub written_warnings: Vec<String>,
    pub field_warnings: Vec<String>,
}

impl CurationWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one warning code and its field, keeping both lists aligned.
    pub fn push(&mut self, code: WarningCode, field: &str) {
        self.written_warnings.push(code.as_str().to_string());
        self.field_warnings.push(field.to_string());
    }

    pub fn len(&self) -> usize {
        self.written_warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written_warnings.is_empty()
    }

    /// Iterates `(code, field)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.written_warnings
            .iter()
            .zip(self.field_warnings.iter())
            .map(|(code, field)| (code.as_str(), field.as_str()))
    }
}
