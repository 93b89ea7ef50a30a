//! Core curation extension for the game launcher.
//! Normalizes legacy browser curations, validates launch commands, loads
//! data packs, and clears the browser cache through host services.

pub mod activation;
pub mod db;
pub mod extension;
pub mod host;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use activation::{
    activate, activate_with, deactivate, manifest, ActivationOptions, COMMAND_CLEAR_WININET_CACHE,
    COMMAND_FIX_REQUIREMENTS, COMMAND_LOAD_DATA_PACK, COMMAND_MIGRATE_DATA_PACKS, EXTENSION_ID,
};
pub use extension::capability::{RuntimeCapability, RuntimeCapabilityError};
pub use extension::kernel::{
    CommandArgs, Disposable, ExtensionContext, ExtensionKernelError, ExtensionRegistry,
    WillGenCurationWarningsEvent,
};
pub use extension::manifest::{
    ExtensionManifest, ManifestValidationError, HOOK_WILL_GEN_CURATION_WARNINGS,
};
pub use host::{
    ArchiveExtractor, CurationStore, DialogHandle, DialogService, FileFilter, FileSystem,
    HostError, HostResult, HostServices, ModalGuard, ModalRequest, OpenDialogOptions,
    PlatformCatalog, ShellCommand, ShellRunner, StdFileSystem, StdShellRunner,
    ZipArchiveExtractor,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::curation::{CurationGame, CurationMetaPatch, CurationState, Platform};
pub use model::warnings::{CurationWarnings, WarningCode};
pub use repo::curation_repo::SqliteCurationStore;
pub use repo::platform_repo::SqlitePlatformCatalog;
pub use service::data_pack::{DataPackReport, FailedDataPack, LoadedDataPack};
pub use service::requirements::RequirementsReport;

/// Minimal health-check API for host integration checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
