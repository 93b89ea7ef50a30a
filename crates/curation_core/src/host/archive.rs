//! Zip-backed archive extraction.

use super::{ArchiveExtractor, HostResult};
use log::{debug, error};
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use zip::ZipArchive;

/// Extracts zip archives with the `zip` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveExtractor;

impl ArchiveExtractor for ZipArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> HostResult<()> {
        let started_at = Instant::now();
        debug!(
            "event=archive_extract module=host status=start archive={} dest={}",
            archive.display(),
            dest.display()
        );

        let result = extract_zip(archive, dest);

        match &result {
            Ok(()) => debug!(
                "event=archive_extract module=host status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=archive_extract module=host status=error duration_ms={} archive={} error={}",
                started_at.elapsed().as_millis(),
                archive.display(),
                err
            ),
        }
        result
    }
}

fn extract_zip(archive: &Path, dest: &Path) -> HostResult<()> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    std::fs::create_dir_all(dest)?;
    zip.extract(dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ZipArchiveExtractor;
    use crate::host::{ArchiveExtractor, HostError};
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    #[test]
    fn extracts_nested_entries() {
        let dir = tempfile::tempdir().expect("temp dir");
        let archive_path = dir.path().join("pack.zip");
        let file = std::fs::File::create(&archive_path).expect("create archive");
        let mut writer = ZipWriter::new(file);
        writer
            .start_file("content/game.swf", FileOptions::default())
            .expect("start entry");
        writer.write_all(b"swf").expect("write entry");
        writer.finish().expect("finish archive");

        let dest = dir.path().join("out");
        ZipArchiveExtractor
            .extract(&archive_path, &dest)
            .expect("extraction should succeed");
        let body = std::fs::read(dest.join("content").join("game.swf")).expect("read entry");
        assert_eq!(body, b"swf");
    }

    #[test]
    fn rejects_non_zip_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let bogus = dir.path().join("bogus.zip");
        std::fs::write(&bogus, b"not a zip").expect("write bogus");

        let err = ZipArchiveExtractor
            .extract(&bogus, &dir.path().join("out"))
            .expect_err("non-zip input must fail");
        assert!(matches!(err, HostError::Archive(_)));
    }
}
