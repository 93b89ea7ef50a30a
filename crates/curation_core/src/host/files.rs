//! Standard-library filesystem adapter.
//!
//! # Invariants
//! - `copy_dir_all` overwrites files that already exist at the destination.
//! - `make_temp_dir` directories outlive this process; callers own cleanup.

use super::{FileSystem, HostError, HostResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn copy_dir_all(&self, src: &Path, dest: &Path) -> HostResult<()> {
        if !src.is_dir() {
            return Err(HostError::NotFound(format!(
                "source directory `{}`",
                src.display()
            )));
        }

        std::fs::create_dir_all(dest)?;
        for entry in WalkDir::new(src).min_depth(1) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|err| HostError::Other(format!("unexpected walk entry: {err}")))?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    fn make_temp_dir(&self, prefix: &str) -> HostResult<PathBuf> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        Ok(dir.keep())
    }
}
