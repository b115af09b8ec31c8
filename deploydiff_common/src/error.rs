use std::path::PathBuf;
use thiserror::Error;

/// Structural failures that abort a diff run.
///
/// Content discrepancies are never reported through this type: they are
/// values of the report tree (see [`crate::Diff`], [`crate::ModuleDiff`]).
#[derive(Error, Debug)]
pub enum DeployDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Invalid '{directory}', expected only '{expected}', but got {found:?}")]
    UnexpectedDirectory {
        directory: PathBuf,
        expected: String,
        found: Vec<String>,
    },

    #[error("Unexpected archive for '{module}': {file_name}")]
    UnexpectedArchive { module: String, file_name: String },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DeployDiffError>;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Invalid archive '{path}': {reason}")]
    InvalidArchive { path: PathBuf, reason: String },

    #[error("Invalid {kind} '{path}', cannot read {resource}: {reason}")]
    InvalidManifest {
        kind: ArchiveKind,
        path: PathBuf,
        resource: &'static str,
        reason: String,
    },
}

/// How an archive is laid out on disk, used to qualify manifest failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    File,
    Directory,
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveKind::File => f.write_str("archive file"),
            ArchiveKind::Directory => f.write_str("archive directory structure"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pom '{coordinates}' could not be resolved: {path} not found")]
    PomNotFound { coordinates: String, path: PathBuf },

    #[error("Parent pom '{parent}' of '{coordinates}' could not be resolved")]
    ParentNotFound { coordinates: String, parent: String },

    #[error("Invalid pom '{path}': {reason}")]
    InvalidPom { path: PathBuf, reason: String },
}
