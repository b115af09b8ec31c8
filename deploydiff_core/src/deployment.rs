use crate::filters::{OptionalDependencyFilter, PatternFilter};
use deploydiff_common::{
    file_names, AppConfig, Dependency, DeployDiffError, DirectoryLister, MismatchFilter,
    NoopFilter,
};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub type StringFilter = Arc<dyn MismatchFilter<String>>;
pub type DependencyFilter = Arc<dyn MismatchFilter<Dependency>>;

/// The two publications of a release, and the filters used to compare them.
///
/// A `Deployment` is never mutated: every `with_*` method returns a new value,
/// and clones share their filters.
#[derive(Clone)]
pub struct Deployment {
    left_name: String,
    left_directory: PathBuf,
    right_name: String,
    right_directory: PathBuf,
    version: String,
    archive_filters: HashMap<String, StringFilter>,
    module_filter: StringFilter,
    pom_filter: DependencyFilter,
    included_scopes: Vec<String>,
}

impl Deployment {
    pub fn new(
        left_name: impl Into<String>,
        left_directory: impl Into<PathBuf>,
        right_name: impl Into<String>,
        right_directory: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            left_name: left_name.into(),
            left_directory: left_directory.into(),
            right_name: right_name.into(),
            right_directory: right_directory.into(),
            version: version.into(),
            archive_filters: HashMap::new(),
            module_filter: Arc::new(NoopFilter),
            pom_filter: Arc::new(NoopFilter),
            included_scopes: ["compile", "compile+runtime", "runtime"]
                .iter()
                .map(|scope| scope.to_string())
                .collect(),
        }
    }

    /// Builds a deployment with the names, scopes and filters of `config`.
    pub fn from_config(
        config: &AppConfig,
        left_directory: impl Into<PathBuf>,
        right_directory: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Result<Self, DeployDiffError> {
        let mut deployment = Deployment::new(
            config.left_name.as_str(),
            left_directory,
            config.right_name.as_str(),
            right_directory,
            version,
        )
        .with_included_scopes(config.included_scopes.clone())
        .with_pom_filter(Arc::new(OptionalDependencyFilter::from(&config.pom_filter)));

        if !config.module_filter.is_empty() {
            deployment = deployment
                .with_module_filter(Arc::new(PatternFilter::from_rules(&config.module_filter)?));
        }
        for (classifier, rules) in &config.archive_filters {
            deployment = deployment
                .with_archive_filter(classifier.as_str(), Arc::new(PatternFilter::from_rules(rules)?));
        }
        Ok(deployment)
    }

    pub fn left_name(&self) -> &str {
        &self.left_name
    }

    pub fn left_directory(&self) -> &Path {
        &self.left_directory
    }

    pub fn right_name(&self) -> &str {
        &self.right_name
    }

    pub fn right_directory(&self) -> &Path {
        &self.right_directory
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn included_scopes(&self) -> &[String] {
        &self.included_scopes
    }

    /// The entry filter registered for `classifier`, or a no-op filter.
    pub fn archive_filter(&self, classifier: &str) -> StringFilter {
        self.archive_filters
            .get(classifier)
            .cloned()
            .unwrap_or_else(|| Arc::new(NoopFilter))
    }

    pub fn module_filter(&self) -> StringFilter {
        Arc::clone(&self.module_filter)
    }

    pub fn pom_filter(&self) -> DependencyFilter {
        Arc::clone(&self.pom_filter)
    }

    pub fn with_archive_filter(mut self, classifier: impl Into<String>, filter: StringFilter) -> Self {
        self.archive_filters.insert(classifier.into(), filter);
        self
    }

    pub fn with_module_filter(mut self, filter: StringFilter) -> Self {
        self.module_filter = filter;
        self
    }

    pub fn with_pom_filter(mut self, filter: DependencyFilter) -> Self {
        self.pom_filter = filter;
        self
    }

    pub fn with_included_scopes(mut self, scopes: Vec<String>) -> Self {
        self.included_scopes = scopes;
        self
    }

    /// Descends the segments of `group_id` under both roots.
    ///
    /// With `unique`, every directory on the way must contain nothing but the
    /// next segment.
    pub fn resolve_group_id(
        self,
        unique: bool,
        group_id: &str,
        lister: &dyn DirectoryLister,
    ) -> Result<GroupDeployment, DeployDiffError> {
        let left_directory = resolve_group_path(lister, unique, &self.left_directory, group_id)?;
        let right_directory = resolve_group_path(lister, unique, &self.right_directory, group_id)?;
        debug!(
            "Resolved '{}' to '{}' and '{}'",
            group_id,
            left_directory.display(),
            right_directory.display()
        );
        Ok(GroupDeployment {
            deployment: self,
            left_directory,
            right_directory,
            group_id: group_id.to_string(),
        })
    }
}

impl fmt::Debug for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classifiers: Vec<&String> = self.archive_filters.keys().collect();
        classifiers.sort();
        f.debug_struct("Deployment")
            .field("left_name", &self.left_name)
            .field("left_directory", &self.left_directory)
            .field("right_name", &self.right_name)
            .field("right_directory", &self.right_directory)
            .field("version", &self.version)
            .field("archive_filters", &classifiers)
            .field("included_scopes", &self.included_scopes)
            .finish()
    }
}

fn resolve_group_path(
    lister: &dyn DirectoryLister,
    unique: bool,
    root: &Path,
    group_id: &str,
) -> Result<PathBuf, DeployDiffError> {
    let mut current = root.to_path_buf();
    for segment in group_id.split('.') {
        current = resolve_directory(lister, unique, &current, segment)?;
    }
    Ok(current)
}

fn resolve_directory(
    lister: &dyn DirectoryLister,
    unique: bool,
    directory: &Path,
    name: &str,
) -> Result<PathBuf, DeployDiffError> {
    let candidates = lister.list(directory)?;
    let result = candidates
        .iter()
        .find(|candidate| candidate.file_name().map_or(false, |file_name| file_name == name))
        .cloned()
        .ok_or_else(|| DeployDiffError::MissingDirectory(directory.join(name)))?;
    if unique && candidates.len() != 1 {
        return Err(DeployDiffError::UnexpectedDirectory {
            directory: directory.to_path_buf(),
            expected: name.to_string(),
            found: file_names(&candidates),
        });
    }
    Ok(result)
}

/// A deployment narrowed to the directories of one group id
#[derive(Debug, Clone)]
pub struct GroupDeployment {
    deployment: Deployment,
    left_directory: PathBuf,
    right_directory: PathBuf,
    group_id: String,
}

impl GroupDeployment {
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Root of the left repository
    pub fn left_root(&self) -> &Path {
        self.deployment.left_directory()
    }

    /// Root of the right repository
    pub fn right_root(&self) -> &Path {
        self.deployment.right_directory()
    }

    pub fn left_name(&self) -> &str {
        self.deployment.left_name()
    }

    pub fn right_name(&self) -> &str {
        self.deployment.right_name()
    }

    pub fn version(&self) -> &str {
        self.deployment.version()
    }

    /// Directory of the group in the left repository
    pub fn left_directory(&self) -> &Path {
        &self.left_directory
    }

    /// Directory of the group in the right repository
    pub fn right_directory(&self) -> &Path {
        &self.right_directory
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// `path` relative to the left root, for reporting.
    pub fn relativize_left(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.left_root()).unwrap_or(path).to_path_buf()
    }

    /// `path` relative to the right root, for reporting.
    pub fn relativize_right(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.right_root()).unwrap_or(path).to_path_buf()
    }
}
