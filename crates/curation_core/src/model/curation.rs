//! Curation record model.
//!
//! # Responsibility
//! - Define the curation snapshot handed to commands and hooks.
//! - Define the metadata patch applied through the curation store.
//!
//! # Invariants
//! - `folder` is stable for the curation lifetime and assigned by the host.
//! - `platforms = None` means "no platform list", which differs from an
//!   empty list only in how it is persisted back.

use serde::{Deserialize, Serialize};

/// Platform tag record as stored in the host platform catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Host catalog id.
    pub id: i64,
    /// Primary alias name, e.g. `HTML5`.
    pub name: String,
}

impl Platform {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Game metadata fields of one curation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationGame {
    pub title: Option<String>,
    /// Launch executable path, relative to the launcher root.
    pub application_path: Option<String>,
    /// Ordered platform tags.
    pub platforms: Option<Vec<Platform>>,
    /// Raw launch command; may be a URL with protocol.
    pub launch_command: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl CurationGame {
    /// Returns whether a platform with the given primary alias is present.
    pub fn has_platform(&self, name: &str) -> bool {
        self.platforms
            .as_ref()
            .is_some_and(|platforms| platforms.iter().any(|platform| platform.name == name))
    }

    /// `None` and `""` both count as empty notes.
    pub fn notes_is_empty(&self) -> bool {
        self.notes.as_deref().map_or(true, str::is_empty)
    }
}

/// Curation snapshot owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationState {
    /// Opaque host-assigned identifier.
    pub folder: String,
    /// Game identifier this curation is bound to, when created from one.
    pub game_id: Option<String>,
    pub game: CurationGame,
}

impl CurationState {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            game_id: None,
            game: CurationGame::default(),
        }
    }
}

/// Partial metadata update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationMetaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
}

impl CurationMetaPatch {
    pub fn application_path(value: impl Into<String>) -> Self {
        Self {
            application_path: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn platforms(value: Vec<Platform>) -> Self {
        Self {
            platforms: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.application_path.is_none() && self.platforms.is_none()
    }

    /// Applies this patch onto a game snapshot.
    pub fn apply_to(&self, game: &mut CurationGame) {
        if let Some(path) = &self.application_path {
            game.application_path = Some(path.clone());
        }
        if let Some(platforms) = &self.platforms {
            game.platforms = Some(platforms.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CurationGame, CurationMetaPatch, CurationState, Platform};

    #[test]
    fn notes_absent_or_blank_count_as_empty() {
        let mut game = CurationGame::default();
        assert!(game.notes_is_empty());
        game.notes = Some(String::new());
        assert!(game.notes_is_empty());
        game.notes = Some("uses a patched swf".to_string());
        assert!(!game.notes_is_empty());
    }

    #[test]
    fn has_platform_matches_primary_alias_exactly() {
        let game = CurationGame {
            platforms: Some(vec![Platform::new(1, "Flash"), Platform::new(2, "HTML5")]),
            ..CurationGame::default()
        };
        assert!(game.has_platform("HTML5"));
        assert!(!game.has_platform("html5"));
        assert!(!CurationGame::default().has_platform("HTML5"));
    }

    #[test]
    fn patch_only_overwrites_present_fields() {
        let mut game = CurationGame {
            application_path: Some("old.exe".to_string()),
            platforms: Some(vec![Platform::new(1, "Flash")]),
            ..CurationGame::default()
        };
        CurationMetaPatch::application_path("new.exe").apply_to(&mut game);
        assert_eq!(game.application_path.as_deref(), Some("new.exe"));
        assert_eq!(game.platforms.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn serializes_with_host_field_names() {
        let mut curation = CurationState::new("folder-1");
        curation.game.application_path = Some("FPSoftware\\x.exe".to_string());
        let json = serde_json::to_value(&curation).expect("curation should serialize");
        assert_eq!(json["game"]["applicationPath"], "FPSoftware\\x.exe");
        assert!(json["game"]["launchCommand"].is_null());

        let patch = serde_json::to_value(CurationMetaPatch::platforms(vec![]))
            .expect("patch should serialize");
        assert!(patch.get("applicationPath").is_none());
    }
}
