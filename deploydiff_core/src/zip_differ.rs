use crate::deployment::GroupDeployment;
use crate::diff::diff;
use crate::vfs::archive::require_file;
use deploydiff_common::{
    ArchiveError, ArchiveReader, BundleConfig, BundleDiff, Diff, MismatchFilter,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

const VERSION_PLACEHOLDER: &str = "{version}";

/// Flat entry comparison of two zip files
pub struct ZipDiffer<'a> {
    left: PathBuf,
    right: PathBuf,
    reader: &'a dyn ArchiveReader,
}

impl<'a> ZipDiffer<'a> {
    pub fn new(
        left: impl Into<PathBuf>,
        right: impl Into<PathBuf>,
        reader: &'a dyn ArchiveReader,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            reader,
        }
    }

    pub fn diff(&self, filter: &dyn MismatchFilter<String>) -> Result<Diff<String>, ArchiveError> {
        let left = self.entries(&self.left)?;
        let right = self.entries(&self.right)?;
        Ok(diff(&left, &right, filter))
    }

    fn entries(&self, path: &Path) -> Result<Vec<String>, ArchiveError> {
        require_file(path)?;
        self.reader.entry_names(path)
    }
}

/// Resolves `template` against `directory`, replacing `{version}`.
pub fn bundle_path(directory: &Path, template: &str, version: &str) -> PathBuf {
    directory.join(template.replace(VERSION_PLACEHOLDER, version))
}

/// Compares the bundle configured by `bundle`, with paths relative to the
/// group directory of each side.
pub fn diff_bundle(
    deployment: &GroupDeployment,
    bundle: &BundleConfig,
    reader: &dyn ArchiveReader,
    filter: &dyn MismatchFilter<String>,
) -> Result<BundleDiff, ArchiveError> {
    let left = bundle_path(deployment.left_directory(), &bundle.left, deployment.version());
    let right = bundle_path(deployment.right_directory(), &bundle.right, deployment.version());
    let entries = ZipDiffer::new(&left, &right, reader).diff(filter)?;

    if entries.has_same_entries() {
        info!("Identical entries for {}", bundle.title);
    } else {
        error!(
            "{}",
            entries.describe(
                &format!("Mismatch between {}", bundle.title),
                deployment.left_name(),
                deployment.right_name()
            )
        );
    }

    Ok(BundleDiff {
        title: bundle.title.clone(),
        left: deployment.relativize_left(&left),
        right: deployment.relativize_right(&right),
        entries,
    })
}
