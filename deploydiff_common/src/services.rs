use crate::{ArchiveError, Coordinates, DeployDiffError, Dependency, ResolveError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Location of the manifest inside a packaged archive
pub const MANIFEST_LOCATION: &str = "META-INF/MANIFEST.MF";

/// Lists the immediate children of a directory.
///
/// Implementations fail on a missing or unreadable directory; the order of the
/// returned paths is whatever the underlying listing yields.
pub trait DirectoryLister: Send + Sync {
    /// Lists files and directories directly under `directory`
    fn list(&self, directory: &Path) -> Result<Vec<PathBuf>, DeployDiffError>;

    /// Lists the subdirectories directly under `directory`
    fn list_directories(&self, directory: &Path) -> Result<Vec<PathBuf>, DeployDiffError> {
        Ok(self
            .list(directory)?
            .into_iter()
            .filter(|path| path.is_dir())
            .collect())
    }
}

/// Reads the content of packaged archives
pub trait ArchiveReader: Send + Sync {
    /// Returns the name of every entry, in archive order
    fn entry_names(&self, archive: &Path) -> Result<Vec<String>, ArchiveError>;

    /// Returns the main attributes of the archive manifest
    fn manifest_attributes(&self, archive: &Path) -> Result<BTreeMap<String, String>, ArchiveError>;
}

/// Resolves the dependencies a module declares
pub trait DependencyResolver: Send + Sync {
    /// Resolves `coordinates` against the repository rooted at `repository`
    fn resolve(
        &self,
        coordinates: &Coordinates,
        repository: &Path,
    ) -> Result<Vec<Dependency>, ResolveError>;
}

/// Returns the final path segment of each path.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect()
}
