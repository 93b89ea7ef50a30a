//! Host service contracts consumed by the extension.
//!
//! # Responsibility
//! - Describe every host capability the commands call into.
//! - Bundle borrowed service handles for one command/hook invocation.
//!
//! # Invariants
//! - Implementations own all persisted state; the extension keeps none.
//! - Calls are synchronous and serialized by the host per user action.

use crate::db::DbError;
use crate::model::curation::{CurationMetaPatch, CurationState, Platform};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod archive;
pub mod files;
pub mod shell;

pub use archive::ZipArchiveExtractor;
pub use files::StdFileSystem;
pub use shell::{ShellCommand, StdShellRunner};

pub type HostResult<T> = Result<T, HostError>;

/// Failure reported by a host service call.
#[derive(Debug)]
pub enum HostError {
    Io(std::io::Error),
    Archive(zip::result::ZipError),
    Db(DbError),
    /// Host could not find the requested record.
    NotFound(String),
    /// Host-specific failure without a structured cause.
    Other(String),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Archive(err) => write!(f, "archive error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(value) => write!(f, "not found: {value}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Archive(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Other(_) => None,
        }
    }
}

impl From<std::io::Error> for HostError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<zip::result::ZipError> for HostError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value)
    }
}

impl From<DbError> for HostError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for HostError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<walkdir::Error> for HostError {
    fn from(value: walkdir::Error) -> Self {
        Self::Io(value.into())
    }
}

/// Curation store owned by the host.
pub trait CurationStore {
    /// Returns the curation for `folder`, or `None` when unknown.
    fn get_curation(&self, folder: &str) -> HostResult<Option<CurationState>>;
    /// Overwrites the present fields of `patch` on the curation's game meta.
    fn set_curation_game_meta(&self, folder: &str, patch: &CurationMetaPatch) -> HostResult<()>;
    /// Absolute directory of one curation.
    fn curation_path(&self, folder: &str) -> PathBuf;
    /// Creates a curation bound to `game_id`; with `reuse_existing`, returns
    /// the curation already bound to that id instead.
    fn new_curation_from_game(&self, game_id: &str, reuse_existing: bool)
        -> HostResult<CurationState>;
    /// Recomputes derived state after content files changed.
    fn refresh_content(&self, folder: &str) -> HostResult<()>;
}

/// Platform catalog lookup.
pub trait PlatformCatalog {
    fn find_platform_by_name(&self, name: &str) -> HostResult<Option<Platform>>;
}

/// Handle of an open modal dialog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DialogHandle(pub String);

/// Non-interactive progress modal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalRequest {
    pub message: String,
    /// Shows an indeterminate progress bar.
    pub loader: bool,
}

/// File filter entry for open dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn zip() -> Self {
        Self {
            name: "Zip Archive".to_string(),
            extensions: vec!["zip".to_string()],
        }
    }
}

/// Native file-open dialog options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialogOptions {
    pub title: String,
    pub multi_select: bool,
    pub filters: Vec<FileFilter>,
}

/// Dialog system of the host UI.
pub trait DialogService {
    fn open_modal(&self, request: &ModalRequest) -> HostResult<DialogHandle>;
    fn cancel_modal(&self, handle: &DialogHandle);
    /// Returns chosen paths; empty when the user cancelled.
    fn show_open_dialog(&self, options: &OpenDialogOptions) -> HostResult<Vec<PathBuf>>;
}

/// Zip extraction utility.
pub trait ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> HostResult<()>;
}

/// Filesystem operations used by data-pack commands and validation.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    /// Copies `src` recursively into `dest`, overwriting existing files.
    fn copy_dir_all(&self, src: &Path, dest: &Path) -> HostResult<()>;
    /// Creates a fresh, uniquely named temporary directory.
    fn make_temp_dir(&self, prefix: &str) -> HostResult<PathBuf>;
}

/// OS shell execution.
pub trait ShellRunner {
    fn run(&self, command: &ShellCommand) -> HostResult<()>;
}

/// Borrowed host services for one invocation.
#[derive(Clone, Copy)]
pub struct HostServices<'a> {
    pub curations: &'a dyn CurationStore,
    pub platforms: &'a dyn PlatformCatalog,
    pub dialogs: &'a dyn DialogService,
    pub archives: &'a dyn ArchiveExtractor,
    pub files: &'a dyn FileSystem,
    pub shell: &'a dyn ShellRunner,
}

/// Cancels a modal dialog when dropped.
pub struct ModalGuard<'a> {
    dialogs: &'a dyn DialogService,
    handle: DialogHandle,
}

impl<'a> ModalGuard<'a> {
    pub fn open(dialogs: &'a dyn DialogService, request: &ModalRequest) -> HostResult<Self> {
        let handle = dialogs.open_modal(request)?;
        Ok(Self { dialogs, handle })
    }

    pub fn handle(&self) -> &DialogHandle {
        &self.handle
    }
}

impl Drop for ModalGuard<'_> {
    fn drop(&mut self) {
        self.dialogs.cancel_modal(&self.handle);
    }
}
