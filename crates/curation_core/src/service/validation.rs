//! Curation warning checks run before the host renders warnings.
//!
//! # Responsibility
//! - Validate launch-command URLs against the curation content folder.
//! - Flag hacked/partial curations that lack explanatory notes.
//!
//! # Invariants
//! - Checks never fail; ambiguous input yields no warning.
//! - The only side effect is appending to the passed-in warning collection.

use crate::host::{CurationStore, FileSystem, HostServices};
use crate::model::curation::{CurationGame, CurationState};
use crate::model::warnings::{CurationWarnings, WarningCode, FIELD_LAUNCH_COMMAND, FIELD_NOTES};
use std::path::{Path, PathBuf};

/// Name of the content directory inside every curation folder.
pub const CONTENT_DIR_NAME: &str = "content";

/// Status substrings that require explanatory notes.
const DOCUMENTED_STATUS_MARKERS: &[&str] = &["Hacked", "Partial"];

const EXPECTED_PROTOCOL: &str = "http";
const PROTOCOL_SEPARATOR: &str = "://";

/// Returns `<curation path>/content` for one curation folder.
pub fn content_folder(store: &dyn CurationStore, folder: &str) -> PathBuf {
    store.curation_path(folder).join(CONTENT_DIR_NAME)
}

/// Extracts the first token of a launch command.
///
/// Scans left to right; the first of these to match wins:
/// - a run of characters that are neither whitespace nor quotes,
/// - a non-empty `"..."` span, yielding its inner text,
/// - any other quoted span (`'...'` or `""`), yielding it quotes included.
///
/// An opening quote without a closing partner is skipped.
pub fn first_launch_token(launch_command: &str) -> Option<&str> {
    for (start, c) in launch_command.char_indices() {
        if c.is_whitespace() {
            continue;
        }

        if c == '"' || c == '\'' {
            let inner_start = start + c.len_utf8();
            if let Some(len) = launch_command[inner_start..].find(c) {
                let inner_end = inner_start + len;
                if c == '"' && len > 0 {
                    return Some(&launch_command[inner_start..inner_end]);
                }
                return Some(&launch_command[start..inner_end + c.len_utf8()]);
            }
            continue;
        }

        let end = launch_command[start..]
            .find(|ch: char| ch.is_whitespace() || ch == '"' || ch == '\'')
            .map_or(launch_command.len(), |len| start + len);
        return Some(&launch_command[start..end]);
    }
    None
}

/// Returns the scheme before the first `://` that has at least one
/// character in front of it.
pub fn url_protocol(token: &str) -> Option<&str> {
    token
        .match_indices(PROTOCOL_SEPARATOR)
        .find(|(index, _)| *index > 0)
        .map(|(index, _)| &token[..index])
}

/// Maps a launch URL onto the file it should reference inside the content
/// folder: query dropped for file-like endings, percent-decoded, scheme
/// stripped.
pub fn resolve_launch_path(content_folder: &Path, url: &str) -> PathBuf {
    let ends_in_file = url
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'));
    let target = if ends_in_file {
        url.split_once('?').map_or(url, |(head, _)| head)
    } else {
        url
    };

    let decoded = percent_decode(target);
    let relative = strip_url_prefix(&decoded);

    let mut path = content_folder.to_path_buf();
    for segment in relative.split(|c: char| c == '/' || std::path::is_separator(c)) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        path.push(segment);
    }
    path
}

/// Percent-decodes `value` as UTF-8, falling back to Latin-1 when the
/// decoded bytes are not valid UTF-8. `%uXXXX` escapes are left as-is.
fn percent_decode(value: &str) -> String {
    let bytes = urlencoding::decode_binary(value.as_bytes()).into_owned();
    match String::from_utf8(bytes) {
        Ok(decoded) => decoded,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

fn strip_url_prefix(value: &str) -> &str {
    if let Some(index) = value.find(PROTOCOL_SEPARATOR) {
        let scheme = &value[..index];
        if !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return &value[index + PROTOCOL_SEPARATOR.len()..];
        }
    }
    value.strip_prefix("//").unwrap_or(value)
}

/// Warnings for one launch command. Commands without a URL protocol are
/// not checked.
pub fn launch_command_warnings(
    content_folder: &Path,
    launch_command: &str,
    files: &dyn FileSystem,
) -> Vec<WarningCode> {
    let mut warnings = Vec::new();
    let Some(token) = first_launch_token(launch_command) else {
        return warnings;
    };
    let Some(protocol) = url_protocol(token) else {
        return warnings;
    };

    if protocol != EXPECTED_PROTOCOL {
        warnings.push(WarningCode::NotHttp);
    }
    if !files.exists(&resolve_launch_path(content_folder, token)) {
        warnings.push(WarningCode::NonExistentFile);
    }
    warnings
}

/// `DocumentStatus` when a hacked/partial status comes without notes.
pub fn documentation_warning(game: &CurationGame) -> Option<WarningCode> {
    let status = game.status.as_deref().filter(|status| !status.is_empty())?;
    let needs_notes = DOCUMENTED_STATUS_MARKERS
        .iter()
        .any(|marker| status.contains(marker));
    (needs_notes && game.notes_is_empty()).then_some(WarningCode::DocumentStatus)
}

/// Appends every warning for `curation` to the host collection.
pub fn append_curation_warnings(
    host: &HostServices<'_>,
    curation: &CurationState,
    warnings: &mut CurationWarnings,
) {
    let game = &curation.game;
    if let Some(launch_command) = game
        .launch_command
        .as_deref()
        .filter(|command| !command.is_empty())
    {
        let folder = content_folder(host.curations, &curation.folder);
        for code in launch_command_warnings(&folder, launch_command, host.files) {
            warnings.push(code, FIELD_LAUNCH_COMMAND);
        }
    }

    if let Some(code) = documentation_warning(game) {
        warnings.push(code, FIELD_NOTES);
    }
}
