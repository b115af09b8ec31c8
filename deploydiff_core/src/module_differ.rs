use crate::archive_differ::ArchiveDiffer;
use crate::collaborators::Collaborators;
use crate::deployment::GroupDeployment;
use crate::diff::diff;
use crate::pom_differ::PomDiffer;
use deploydiff_common::{
    classifier_label, file_names, ArchiveFailure, DeployDiffError, Module, ModuleDiff,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, error, info};

const ARCHIVE_EXTENSION: &str = ".jar";
const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

static SNAPSHOT_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}\.\d{6}-\d+").unwrap());

/// Compares one module present on both sides: its archives per classifier,
/// its declared dependencies and the files of its version directory.
pub struct ModuleDiffer<'a> {
    deployment: &'a GroupDeployment,
    collaborators: &'a Collaborators,
}

impl<'a> ModuleDiffer<'a> {
    pub fn new(deployment: &'a GroupDeployment, collaborators: &'a Collaborators) -> Self {
        Self {
            deployment,
            collaborators,
        }
    }

    pub fn diff(&self, module: Module) -> Result<ModuleDiff, DeployDiffError> {
        info!("Diffing '{}'", module.name);
        let version = self.deployment.version();
        let left_root = version_root(&module.name, module.left.as_deref(), version)?;
        let right_root = version_root(&module.name, module.right.as_deref(), version)?;

        let left_archives = self.archives(&left_root, &module.name)?;
        debug!(
            "Found '{}' archives for {} in '{}'",
            left_archives.len(),
            self.deployment.left_name(),
            left_root.display()
        );
        let right_archives = self.archives(&right_root, &module.name)?;
        debug!(
            "Found '{}' archives for {} in '{}'",
            right_archives.len(),
            self.deployment.right_name(),
            right_root.display()
        );

        let mut archives = Vec::new();
        let mut archive_failures = Vec::new();
        for (classifier, left_archive) in &left_archives {
            let Some(right_archive) = right_archives.get(classifier) else {
                let reason = format!("No '{}' archive found for '{}'", module.name, classifier);
                error!("{}", reason);
                archive_failures.push(ArchiveFailure {
                    classifier: classifier.clone(),
                    reason,
                });
                continue;
            };

            let filter = self.deployment.deployment().archive_filter(classifier);
            let differ = ArchiveDiffer::new(
                self.deployment,
                self.collaborators.archives.as_ref(),
                left_archive,
                right_archive,
                classifier.as_str(),
            );
            match differ.diff(filter.as_ref()) {
                Ok(archive) => archives.push(archive),
                Err(e) => {
                    error!(
                        "Failed to diff {} archives of '{}': {}",
                        classifier_label(classifier),
                        module.name,
                        e
                    );
                    archive_failures.push(ArchiveFailure {
                        classifier: classifier.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!("Diffing POM definition for '{}'", module.name);
        let pom = PomDiffer::new(self.deployment, self.collaborators.resolver.as_ref())
            .diff(&module.name)?;

        let lister = self.collaborators.lister.as_ref();
        let left_files = file_names(&lister.list(&left_root)?);
        let right_files = file_names(&lister.list(&right_root)?);
        let module_filter = self.deployment.deployment().module_filter();
        let files = diff(&left_files, &right_files, module_filter.as_ref());

        Ok(ModuleDiff {
            module,
            files,
            pom,
            archives,
            archive_failures,
        })
    }

    /// Archives of `directory` by classifier
    fn archives(
        &self,
        directory: &Path,
        module: &str,
    ) -> Result<BTreeMap<String, PathBuf>, DeployDiffError> {
        let mut archives = BTreeMap::new();
        for path in self.collaborators.lister.list(directory)? {
            let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().to_string())
            else {
                continue;
            };
            if !file_name.ends_with(ARCHIVE_EXTENSION) {
                continue;
            }
            let classifier = extract_classifier(&file_name, module, self.deployment.version())?;
            archives.insert(classifier, path);
        }
        Ok(archives)
    }
}

fn version_root(
    module: &str,
    module_root: Option<&Path>,
    version: &str,
) -> Result<PathBuf, DeployDiffError> {
    let root = match module_root {
        Some(module_root) => module_root.join(version),
        None => return Err(DeployDiffError::MissingDirectory(Path::new(module).join(version))),
    };
    if !root.is_dir() {
        return Err(DeployDiffError::MissingDirectory(root));
    }
    Ok(root)
}

/// Splits `<module>-<version>[-<classifier>].jar` and returns the classifier,
/// empty for the main archive.
///
/// The version is located right after the module prefix rather than searched
/// for, so a classifier or module name containing the version string is not
/// mistaken for it. For a `-SNAPSHOT` version the timestamped form
/// `<module>-<base>-<yyyyMMdd.HHmmss>-<build>` is accepted as well.
pub fn extract_classifier(
    file_name: &str,
    module: &str,
    version: &str,
) -> Result<String, DeployDiffError> {
    let unexpected = || DeployDiffError::UnexpectedArchive {
        module: module.to_string(),
        file_name: file_name.to_string(),
    };

    let remainder = file_name
        .strip_suffix(ARCHIVE_EXTENSION)
        .and_then(|name| name.strip_prefix(module))
        .and_then(|name| name.strip_prefix('-'))
        .and_then(|name| strip_version(name, version))
        .ok_or_else(unexpected)?;

    if remainder.is_empty() {
        return Ok(String::new());
    }
    match remainder.strip_prefix('-') {
        Some(classifier) if !classifier.is_empty() => Ok(classifier.to_string()),
        _ => Err(unexpected()),
    }
}

fn strip_version<'a>(name: &'a str, version: &str) -> Option<&'a str> {
    if let Some(remainder) = name.strip_prefix(version) {
        return Some(remainder);
    }
    let timestamped = name
        .strip_prefix(version.strip_suffix(SNAPSHOT_SUFFIX)?)?
        .strip_prefix('-')?;
    let timestamp = SNAPSHOT_TIMESTAMP.find(timestamped)?;
    Some(&timestamped[timestamp.end()..])
}
