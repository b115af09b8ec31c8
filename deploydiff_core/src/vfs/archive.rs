use super::manifest::parse_main_attributes;
use deploydiff_common::{ArchiveError, ArchiveKind, ArchiveReader, MANIFEST_LOCATION};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::trace;
use zip::ZipArchive;

/// Reads JAR and ZIP archives.
///
/// A directory is accepted as an exploded archive when reading the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarReader;

impl JarReader {
    pub fn new() -> Self {
        Self
    }

    fn open_archive(&self, path: &Path) -> Result<ZipArchive<File>, ArchiveError> {
        let file = File::open(path)?;
        ZipArchive::new(file).map_err(|e| ArchiveError::InvalidArchive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn read_manifest(&self, path: &Path) -> Result<(ArchiveKind, String), ArchiveError> {
        if path.is_dir() {
            let manifest = path.join(MANIFEST_LOCATION);
            let content = fs::read_to_string(&manifest)
                .map_err(|e| invalid_manifest(ArchiveKind::Directory, path, e.to_string()))?;
            return Ok((ArchiveKind::Directory, content));
        }

        let mut archive = self.open_archive(path)?;
        let mut entry = archive
            .by_name(MANIFEST_LOCATION)
            .map_err(|e| invalid_manifest(ArchiveKind::File, path, e.to_string()))?;
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| invalid_manifest(ArchiveKind::File, path, e.to_string()))?;
        Ok((ArchiveKind::File, content))
    }
}

fn invalid_manifest(kind: ArchiveKind, path: &Path, reason: String) -> ArchiveError {
    ArchiveError::InvalidManifest {
        kind,
        path: path.to_path_buf(),
        resource: MANIFEST_LOCATION,
        reason,
    }
}

/// Fails unless `path` is an existing regular file.
pub fn require_file(path: &Path) -> Result<(), ArchiveError> {
    if !path.exists() {
        return Err(ArchiveError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ArchiveError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

impl ArchiveReader for JarReader {
    fn entry_names(&self, archive: &Path) -> Result<Vec<String>, ArchiveError> {
        require_file(archive)?;
        let mut zip = self.open_archive(archive)?;
        let mut names = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let entry = zip.by_index(i).map_err(|e| ArchiveError::InvalidArchive {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn manifest_attributes(&self, archive: &Path) -> Result<BTreeMap<String, String>, ArchiveError> {
        if !archive.exists() {
            return Err(ArchiveError::NotFound(archive.to_path_buf()));
        }
        let (kind, content) = self.read_manifest(archive)?;
        trace!(
            "Reading manifest from '{}':\n{}",
            archive.display(),
            content
                .lines()
                .map(|line| format!("\t{}", line))
                .collect::<Vec<_>>()
                .join("\n")
                .trim_end()
        );
        parse_main_attributes(&content).map_err(|reason| invalid_manifest(kind, archive, reason))
    }
}
