//! Legacy browser path and HTML5 platform normalization.
//!
//! # Invariants
//! - Only curations using a known legacy browser path are touched.
//! - The HTML5 platform is appended at most once per curation.
//! - Lookup failures skip the curation; they never abort the batch.

use crate::host::{CurationStore, PlatformCatalog};
use crate::model::curation::CurationMetaPatch;
use log::{debug, info, warn};

/// Obsolete Basilisk browser executable.
pub const BASILISK_APPLICATION_PATH: &str = "FPSoftware\\Basilisk-Portable\\Basilisk-Portable.exe";
/// Successor browser executable.
pub const FPNAVIGATOR_APPLICATION_PATH: &str = "FPSoftware\\fpnavigator-portable\\FPNavigator.exe";
/// Application paths whose curations must carry the HTML5 platform.
pub const HTML5_APPLICATION_PATHS: &[&str] =
    &[FPNAVIGATOR_APPLICATION_PATH, BASILISK_APPLICATION_PATH];
pub const HTML5_PLATFORM_NAME: &str = "HTML5";

/// Outcome of one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementsReport {
    /// Folders whose application path was swapped to FPNavigator.
    pub path_fixed: Vec<String>,
    /// Folders that received the HTML5 platform.
    pub platform_added: Vec<String>,
    /// Folders that could not be looked up.
    pub missing: Vec<String>,
}

/// Normalizes legacy browser curations among `selected` folders.
///
/// Does nothing when the catalog has no HTML5 platform.
pub fn fix_requirements(
    curations: &dyn CurationStore,
    platforms: &dyn PlatformCatalog,
    selected: &[String],
) -> RequirementsReport {
    let mut report = RequirementsReport::default();
    let html5 = match platforms.find_platform_by_name(HTML5_PLATFORM_NAME) {
        Ok(Some(platform)) => platform,
        Ok(None) => {
            debug!("event=fix_requirements module=requirements status=skipped reason=no_html5_platform");
            return report;
        }
        Err(err) => {
            warn!("event=fix_requirements module=requirements status=skipped reason=platform_lookup_failed error={err}");
            return report;
        }
    };

    for folder in selected {
        let curation = match curations.get_curation(folder) {
            Ok(Some(curation)) => curation,
            Ok(None) => {
                report.missing.push(folder.clone());
                continue;
            }
            Err(err) => {
                warn!("event=fix_requirements module=requirements status=skipped folder={folder} error={err}");
                report.missing.push(folder.clone());
                continue;
            }
        };
        let game = &curation.game;
        let application_path = game.application_path.as_deref();

        if application_path == Some(BASILISK_APPLICATION_PATH) {
            let patch = CurationMetaPatch::application_path(FPNAVIGATOR_APPLICATION_PATH);
            match curations.set_curation_game_meta(&curation.folder, &patch) {
                Ok(()) => report.path_fixed.push(curation.folder.clone()),
                Err(err) => warn!(
                    "event=fix_requirements module=requirements status=error step=path folder={folder} error={err}"
                ),
            }
        }

        let uses_html5_browser =
            application_path.is_some_and(|path| HTML5_APPLICATION_PATHS.contains(&path));
        if uses_html5_browser && !game.has_platform(HTML5_PLATFORM_NAME) {
            let mut updated = game.platforms.clone().unwrap_or_default();
            updated.push(html5.clone());
            let patch = CurationMetaPatch::platforms(updated);
            match curations.set_curation_game_meta(&curation.folder, &patch) {
                Ok(()) => report.platform_added.push(curation.folder.clone()),
                Err(err) => warn!(
                    "event=fix_requirements module=requirements status=error step=platforms folder={folder} error={err}"
                ),
            }
        }
    }

    info!(
        "event=fix_requirements module=requirements status=ok selected={} path_fixed={} platform_added={} missing={}",
        selected.len(),
        report.path_fixed.len(),
        report.platform_added.len(),
        report.missing.len()
    );
    report
}
