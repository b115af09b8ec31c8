use deploydiff_common::{DeployDiffError, DirectoryLister};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory listing backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLister;

impl LocalLister {
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryLister for LocalLister {
    fn list(&self, directory: &Path) -> Result<Vec<PathBuf>, DeployDiffError> {
        if !directory.is_dir() {
            return Err(DeployDiffError::MissingDirectory(directory.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(directory)? {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}
