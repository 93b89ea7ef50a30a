//! Data-pack migration into curation content folders.
//!
//! # Responsibility
//! - Pick zipped data packs through host dialogs.
//! - Extract each pack and merge its `content/` tree into a curation.
//!
//! # Invariants
//! - One failing pack never stops the remaining packs.
//! - The migration progress modal is closed on every exit path.
//! - Extraction directories are fresh per pack and are left in place.

use crate::host::{
    FileFilter, HostResult, HostServices, ModalGuard, ModalRequest, OpenDialogOptions,
};
use crate::model::curation::CurationState;
use crate::service::validation::{content_folder, CONTENT_DIR_NAME};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// `<36-char game id>.zip`
static DATA_PACK_FILE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.{36})\.zip$").expect("valid data pack regex"));

pub const DATA_PACK_TEMP_PREFIX: &str = "core-curation-pack-";
const MIGRATE_DIALOG_TITLE: &str = "Select Data Packs";
const LOAD_DIALOG_TITLE: &str = "Select Data Pack";
const MIGRATE_MODAL_MESSAGE: &str = "Migrating Data Packs...";

/// Game id encoded in a data-pack file name, if the name matches.
pub fn data_pack_game_id(archive: &Path) -> Option<String> {
    let name = archive.file_name()?.to_str()?;
    DATA_PACK_FILE_NAME_RE
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDataPack {
    pub archive: PathBuf,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDataPack {
    pub archive: PathBuf,
    pub error: String,
}

/// Per-archive outcome of a data-pack command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPackReport {
    pub loaded: Vec<LoadedDataPack>,
    /// Archives whose file name is not a data-pack name.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedDataPack>,
}

impl DataPackReport {
    fn record(&mut self, archive: &Path, folder: &str, result: HostResult<()>) {
        match result {
            Ok(()) => self.loaded.push(LoadedDataPack {
                archive: archive.to_path_buf(),
                folder: folder.to_string(),
            }),
            Err(err) => {
                error!(
                    "event=data_pack_load module=data_pack status=error archive={} folder={folder} error={err}",
                    archive.display()
                );
                self.failed.push(FailedDataPack {
                    archive: archive.to_path_buf(),
                    error: err.to_string(),
                });
            }
        }
    }
}

/// Extracts `archive` to a fresh temp dir and merges its `content/` into
/// the curation's content folder, then refreshes the curation.
pub fn install_data_pack(host: &HostServices<'_>, archive: &Path, folder: &str) -> HostResult<()> {
    let extracted = host.files.make_temp_dir(DATA_PACK_TEMP_PREFIX)?;
    host.archives.extract(archive, &extracted)?;
    host.files.copy_dir_all(
        &extracted.join(CONTENT_DIR_NAME),
        &content_folder(host.curations, folder),
    )?;
    host.curations.refresh_content(folder)?;
    debug!(
        "event=data_pack_load module=data_pack status=ok archive={} folder={folder} extracted={}",
        archive.display(),
        extracted.display()
    );
    Ok(())
}

/// Migrates every selected `<game id>.zip` into a curation bound to that id.
pub fn migrate_data_packs(host: &HostServices<'_>) -> DataPackReport {
    let mut report = DataPackReport::default();
    let archives = match host.dialogs.show_open_dialog(&OpenDialogOptions {
        title: MIGRATE_DIALOG_TITLE.to_string(),
        multi_select: true,
        filters: vec![FileFilter::zip()],
    }) {
        Ok(archives) => archives,
        Err(err) => {
            error!("event=data_pack_migrate module=data_pack status=error step=dialog error={err}");
            return report;
        }
    };
    if archives.is_empty() {
        debug!("event=data_pack_migrate module=data_pack status=cancelled");
        return report;
    }

    let _modal = match ModalGuard::open(
        host.dialogs,
        &ModalRequest {
            message: MIGRATE_MODAL_MESSAGE.to_string(),
            loader: true,
        },
    ) {
        Ok(modal) => Some(modal),
        Err(err) => {
            warn!("event=data_pack_migrate module=data_pack status=degraded step=modal error={err}");
            None
        }
    };

    for archive in &archives {
        let Some(game_id) = data_pack_game_id(archive) else {
            debug!(
                "event=data_pack_migrate module=data_pack status=skipped archive={}",
                archive.display()
            );
            report.skipped.push(archive.clone());
            continue;
        };

        let result = host
            .curations
            .new_curation_from_game(&game_id, true)
            .and_then(|curation| {
                install_data_pack(host, archive, &curation.folder).map(|()| curation.folder)
            });
        match result {
            Ok(folder) => report.record(archive, &folder, Ok(())),
            Err(err) => report.record(archive, &game_id, Err(err)),
        }
    }

    info!(
        "event=data_pack_migrate module=data_pack status=ok selected={} loaded={} skipped={} failed={}",
        archives.len(),
        report.loaded.len(),
        report.skipped.len(),
        report.failed.len()
    );
    report
}

/// Loads one user-chosen zip into `curation`, with no file name check.
pub fn load_data_pack(host: &HostServices<'_>, curation: &CurationState) -> DataPackReport {
    let mut report = DataPackReport::default();
    let archives = match host.dialogs.show_open_dialog(&OpenDialogOptions {
        title: LOAD_DIALOG_TITLE.to_string(),
        multi_select: false,
        filters: vec![FileFilter::zip()],
    }) {
        Ok(archives) => archives,
        Err(err) => {
            error!("event=data_pack_load module=data_pack status=error step=dialog error={err}");
            return report;
        }
    };
    let Some(archive) = archives.first() else {
        debug!("event=data_pack_load module=data_pack status=cancelled");
        return report;
    };

    let result = install_data_pack(host, archive, &curation.folder);
    report.record(archive, &curation.folder, result);
    report
}
