#![allow(dead_code)]

use curation_core::{
    CurationMetaPatch, CurationState, CurationStore, DialogHandle, DialogService, HostError,
    HostResult, HostServices, ModalRequest, OpenDialogOptions, Platform, PlatformCatalog,
    ShellCommand, ShellRunner, StdFileSystem, ZipArchiveExtractor,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// In-memory curation store rooted at a real directory.
pub struct MemoryCurations {
    root: PathBuf,
    curations: RefCell<BTreeMap<String, CurationState>>,
    pub patches: RefCell<Vec<(String, CurationMetaPatch)>>,
    pub refreshed: RefCell<Vec<String>>,
    pub fail_create_for: RefCell<Vec<String>>,
    next_folder: Cell<u32>,
}

impl MemoryCurations {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            curations: RefCell::new(BTreeMap::new()),
            patches: RefCell::new(Vec::new()),
            refreshed: RefCell::new(Vec::new()),
            fail_create_for: RefCell::new(Vec::new()),
            next_folder: Cell::new(0),
        }
    }

    pub fn insert(&self, curation: CurationState) {
        std::fs::create_dir_all(self.root.join(&curation.folder)).expect("curation dir");
        self.curations
            .borrow_mut()
            .insert(curation.folder.clone(), curation);
    }

    pub fn get(&self, folder: &str) -> CurationState {
        self.curations
            .borrow()
            .get(folder)
            .cloned()
            .expect("curation should exist")
    }

    pub fn all(&self) -> Vec<CurationState> {
        self.curations.borrow().values().cloned().collect()
    }
}

impl CurationStore for MemoryCurations {
    fn get_curation(&self, folder: &str) -> HostResult<Option<CurationState>> {
        Ok(self.curations.borrow().get(folder).cloned())
    }

    fn set_curation_game_meta(&self, folder: &str, patch: &CurationMetaPatch) -> HostResult<()> {
        let mut curations = self.curations.borrow_mut();
        let curation = curations
            .get_mut(folder)
            .ok_or_else(|| HostError::NotFound(folder.to_string()))?;
        patch.apply_to(&mut curation.game);
        self.patches
            .borrow_mut()
            .push((folder.to_string(), patch.clone()));
        Ok(())
    }

    fn curation_path(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    fn new_curation_from_game(
        &self,
        game_id: &str,
        reuse_existing: bool,
    ) -> HostResult<CurationState> {
        if self.fail_create_for.borrow().iter().any(|id| id == game_id) {
            return Err(HostError::Other(format!("cannot create curation for {game_id}")));
        }
        if reuse_existing {
            let existing = self
                .curations
                .borrow()
                .values()
                .find(|curation| curation.game_id.as_deref() == Some(game_id))
                .cloned();
            if let Some(existing) = existing {
                return Ok(existing);
            }
        }

        let index = self.next_folder.get() + 1;
        self.next_folder.set(index);
        let mut curation = CurationState::new(format!("curation-{index}"));
        curation.game_id = Some(game_id.to_string());
        self.insert(curation.clone());
        Ok(curation)
    }

    fn refresh_content(&self, folder: &str) -> HostResult<()> {
        self.refreshed.borrow_mut().push(folder.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPlatforms {
    platforms: Vec<Platform>,
}

impl MemoryPlatforms {
    pub fn with(names: &[&str]) -> Self {
        Self {
            platforms: names
                .iter()
                .enumerate()
                .map(|(index, name)| Platform::new(index as i64 + 1, *name))
                .collect(),
        }
    }
}

impl PlatformCatalog for MemoryPlatforms {
    fn find_platform_by_name(&self, name: &str) -> HostResult<Option<Platform>> {
        Ok(self
            .platforms
            .iter()
            .find(|platform| platform.name == name)
            .cloned())
    }
}

/// Dialogs returning queued selections and recording modal lifecycle.
#[derive(Default)]
pub struct ScriptedDialogs {
    selections: RefCell<VecDeque<Vec<PathBuf>>>,
    pub requests: RefCell<Vec<OpenDialogOptions>>,
    pub opened: RefCell<Vec<DialogHandle>>,
    pub cancelled: RefCell<Vec<DialogHandle>>,
}

impl ScriptedDialogs {
    pub fn queue(&self, selection: Vec<PathBuf>) {
        self.selections.borrow_mut().push_back(selection);
    }
}

impl DialogService for ScriptedDialogs {
    fn open_modal(&self, _request: &ModalRequest) -> HostResult<DialogHandle> {
        let handle = DialogHandle(format!("modal-{}", self.opened.borrow().len() + 1));
        self.opened.borrow_mut().push(handle.clone());
        Ok(handle)
    }

    fn cancel_modal(&self, handle: &DialogHandle) {
        self.cancelled.borrow_mut().push(handle.clone());
    }

    fn show_open_dialog(&self, options: &OpenDialogOptions) -> HostResult<Vec<PathBuf>> {
        self.requests.borrow_mut().push(options.clone());
        Ok(self.selections.borrow_mut().pop_front().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct RecordingShell {
    pub commands: RefCell<Vec<ShellCommand>>,
    pub fail: Cell<bool>,
}

impl ShellRunner for RecordingShell {
    fn run(&self, command: &ShellCommand) -> HostResult<()> {
        self.commands.borrow_mut().push(command.clone());
        if self.fail.get() {
            return Err(HostError::Other("shell failed".to_string()));
        }
        Ok(())
    }
}

/// Mock host with real filesystem and zip services.
pub struct TestHost {
    pub dir: tempfile::TempDir,
    pub curations: MemoryCurations,
    pub platforms: MemoryPlatforms,
    pub dialogs: ScriptedDialogs,
    pub shell: RecordingShell,
    files: StdFileSystem,
    archives: ZipArchiveExtractor,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_platforms(&["Flash", "HTML5"])
    }

    pub fn with_platforms(names: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let curations = MemoryCurations::new(&dir.path().join("Curations"));
        Self {
            dir,
            curations,
            platforms: MemoryPlatforms::with(names),
            dialogs: ScriptedDialogs::default(),
            shell: RecordingShell::default(),
            files: StdFileSystem,
            archives: ZipArchiveExtractor,
        }
    }

    pub fn services(&self) -> HostServices<'_> {
        HostServices {
            curations: &self.curations,
            platforms: &self.platforms,
            dialogs: &self.dialogs,
            archives: &self.archives,
            files: &self.files,
            shell: &self.shell,
        }
    }

    /// Path of a scratch file under the host temp dir.
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Writes a zip at `path` with `(entry name, body)` pairs.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("zip parent dir");
    }
    let file = std::fs::File::create(path).expect("create zip");
    let mut writer = ZipWriter::new(file);
    for (name, body) in entries {
        writer
            .start_file(*name, FileOptions::default())
            .expect("start zip entry");
        writer.write_all(body).expect("write zip entry");
    }
    writer.finish().expect("finish zip");
}
