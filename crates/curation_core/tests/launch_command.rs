mod common;

use common::TestHost;
use curation_core::service::validation::{append_curation_warnings, launch_command_warnings};
use curation_core::{CurationState, CurationWarnings, StdFileSystem, WarningCode};
use std::path::Path;

fn content_with(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for file in files {
        let path = dir.path().join(file);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("parent dir");
        std::fs::write(path, b"x").expect("write content file");
    }
    dir
}

fn warnings_for(content: &Path, launch_command: &str) -> Vec<WarningCode> {
    launch_command_warnings(content, launch_command, &StdFileSystem)
}

#[test]
fn http_url_to_missing_file_warns_non_existent() {
    let content = content_with(&[]);
    assert_eq!(
        warnings_for(content.path(), "http://game.swf?x=1"),
        vec![WarningCode::NonExistentFile]
    );
}

#[test]
fn http_url_to_present_file_is_clean() {
    let content = content_with(&["game.swf", "www.example.com/dir/my game.swf"]);
    assert!(warnings_for(content.path(), "http://game.swf?x=1").is_empty());
    assert!(warnings_for(
        content.path(),
        "\"http://www.example.com/dir/my%20game.swf\" -fullscreen"
    )
    .is_empty());
}

#[test]
fn non_http_protocol_warns_regardless_of_existence() {
    let present = content_with(&["game.swf"]);
    assert_eq!(
        warnings_for(present.path(), "ftp://game.swf"),
        vec![WarningCode::NotHttp]
    );

    let missing = content_with(&[]);
    assert_eq!(
        warnings_for(missing.path(), "ftp://game.swf"),
        vec![WarningCode::NotHttp, WarningCode::NonExistentFile]
    );
    assert_eq!(
        warnings_for(missing.path(), "https://game.swf"),
        vec![WarningCode::NotHttp, WarningCode::NonExistentFile]
    );
}

#[test]
fn commands_without_protocol_are_not_checked() {
    let content = content_with(&[]);
    assert!(warnings_for(content.path(), "game.exe").is_empty());
    assert!(warnings_for(content.path(), "\"Games\\My Game\\game.exe\" -w").is_empty());
    assert!(warnings_for(content.path(), "").is_empty());
    assert!(warnings_for(content.path(), "\"\" http://game.swf").is_empty());
}

#[test]
fn single_quoted_token_keeps_its_quotes() {
    let content = content_with(&["game.swf"]);
    assert_eq!(
        warnings_for(content.path(), "'http://game.swf' -w"),
        vec![WarningCode::NotHttp, WarningCode::NonExistentFile]
    );
}

#[test]
fn non_utf8_escapes_decode_as_latin1() {
    let content = content_with(&["caf\u{e9}.swf"]);
    assert!(warnings_for(content.path(), "http://caf%E9.swf").is_empty());
    assert!(warnings_for(content.path(), "http://caf%C3%A9.swf").is_empty());
}

#[cfg(not(windows))]
#[test]
fn backslash_in_url_is_not_a_directory_separator() {
    let content = content_with(&["host\\game.swf"]);
    assert!(warnings_for(content.path(), "http://host\\game.swf").is_empty());
    assert_eq!(
        warnings_for(content_with(&["host/game.swf"]).path(), "http://host\\game.swf"),
        vec![WarningCode::NonExistentFile]
    );
}

#[test]
fn only_the_first_token_is_validated() {
    let content = content_with(&["game.swf"]);
    assert!(warnings_for(content.path(), "http://game.swf ftp://missing.swf").is_empty());
}

#[test]
fn hook_tags_launch_command_and_notes_fields() {
    let host = TestHost::new();
    let mut curation = CurationState::new("c1");
    curation.game.launch_command = Some("ftp://missing.swf".to_string());
    curation.game.status = Some("Hacked".to_string());
    host.curations.insert(curation.clone());

    let mut warnings = CurationWarnings::new();
    append_curation_warnings(&host.services(), &curation, &mut warnings);

    let pairs: Vec<_> = warnings.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("ilc_notHttp", "launchCommand"),
            ("ilc_nonExistant", "launchCommand"),
            ("documentStatus", "notes"),
        ]
    );
}

#[test]
fn hook_resolves_against_curation_content_folder() {
    let host = TestHost::new();
    let mut curation = CurationState::new("c1");
    curation.game.launch_command = Some("http://host.example/index.html?lang=en".to_string());
    host.curations.insert(curation.clone());

    let mut warnings = CurationWarnings::new();
    append_curation_warnings(&host.services(), &curation, &mut warnings);
    assert_eq!(warnings.len(), 1);

    let file = host
        .scratch("Curations")
        .join("c1")
        .join("content")
        .join("host.example")
        .join("index.html");
    std::fs::create_dir_all(file.parent().expect("parent")).expect("content dir");
    std::fs::write(&file, b"<html></html>").expect("write index");

    let mut warnings = CurationWarnings::new();
    append_curation_warnings(&host.services(), &curation, &mut warnings);
    assert!(warnings.is_empty());
}

#[test]
fn documentation_warning_respects_notes() {
    let host = TestHost::new();
    let mut curation = CurationState::new("c1");
    curation.game.status = Some("Hacked".to_string());

    let mut warnings = CurationWarnings::new();
    append_curation_warnings(&host.services(), &curation, &mut warnings);
    assert_eq!(
        warnings.iter().collect::<Vec<_>>(),
        vec![("documentStatus", "notes")]
    );

    curation.game.notes = Some("Removed sitelock.".to_string());
    let mut warnings = CurationWarnings::new();
    append_curation_warnings(&host.services(), &curation, &mut warnings);
    assert!(warnings.is_empty());
}
