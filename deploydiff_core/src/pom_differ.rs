use crate::deployment::GroupDeployment;
use deploydiff_common::{
    Coordinates, Dependency, DependencyMismatch, DependencyResolver, DeployDiffError,
    MismatchFilter, PomDiff,
};
use jwalk::WalkDir;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, trace};

/// Compares the dependencies each side declares for a module.
pub struct PomDiffer<'a> {
    deployment: &'a GroupDeployment,
    resolver: &'a dyn DependencyResolver,
}

impl<'a> PomDiffer<'a> {
    pub fn new(deployment: &'a GroupDeployment, resolver: &'a dyn DependencyResolver) -> Self {
        Self {
            deployment,
            resolver,
        }
    }

    pub fn diff(&self, artifact_id: &str) -> Result<PomDiff, DeployDiffError> {
        let coordinates = Coordinates::new(
            self.deployment.group_id(),
            artifact_id,
            self.deployment.version(),
        );
        let left = self.resolve_dependencies(self.deployment.left_root(), &coordinates)?;
        let right = self.resolve_dependencies(self.deployment.right_root(), &coordinates)?;
        let filter = self.deployment.deployment().pom_filter();
        Ok(diff_dependencies(left, right, filter.as_ref()))
    }

    fn resolve_dependencies(
        &self,
        repository: &Path,
        coordinates: &Coordinates,
    ) -> Result<Vec<Dependency>, DeployDiffError> {
        let scratch = prepare_repository(repository)?;
        let dependencies = self.resolver.resolve(coordinates, scratch.path())?;
        let scopes = self.deployment.deployment().included_scopes();
        let total = dependencies.len();
        let included: Vec<Dependency> = dependencies
            .into_iter()
            .filter(|dependency| scopes.contains(&dependency.scope))
            .collect();
        debug!(
            "Resolved {} dependencies for '{}' in '{}' ({} in included scopes)",
            total,
            coordinates,
            repository.display(),
            included.len()
        );
        Ok(included)
    }
}

/// Matches dependencies by identity; a matched pair whose attributes differ is
/// a mismatch, never an entry on either side.
pub fn diff_dependencies(
    left: Vec<Dependency>,
    right: Vec<Dependency>,
    filter: &dyn MismatchFilter<Dependency>,
) -> PomDiff {
    let mut remaining = right;
    let mut result = PomDiff::default();

    for dependency in left {
        match remaining
            .iter()
            .position(|candidate| dependency.same_identity(candidate))
        {
            Some(index) => {
                let matching = remaining.remove(index);
                if !dependency.attributes_equal(&matching) {
                    result.mismatches.push(DependencyMismatch {
                        left: dependency,
                        right: matching,
                    });
                }
            }
            None => {
                if !filter.ignore_in_left(&dependency) {
                    result.only_in_left.push(dependency);
                }
            }
        }
    }

    result.only_in_right = remaining
        .into_iter()
        .filter(|dependency| !filter.ignore_in_right(dependency))
        .collect();
    result
}

/// Copies `repository` into a scratch directory removed when dropped, so that
/// resolution never touches the compared trees.
fn prepare_repository(repository: &Path) -> Result<TempDir, DeployDiffError> {
    let scratch = tempfile::Builder::new()
        .prefix("deployment-repository-diff")
        .tempdir()?;
    trace!(
        "Copying '{}' to '{}'",
        repository.display(),
        scratch.path().display()
    );

    for entry in WalkDir::new(repository).skip_hidden(false).sort(true) {
        let entry = entry.map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, format!("Walk error: {}", e))
        })?;
        let path = entry.path();
        let relative = match path.strip_prefix(repository) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            _ => continue,
        };
        let target = scratch.path().join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &target)?;
        }
    }
    Ok(scratch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::Deployment;
    use crate::filters::OptionalDependencyFilter;
    use crate::resolver::LocalRepositoryResolver;
    use crate::test_support::{write_pom, PomDependency};
    use crate::vfs::LocalLister;
    use deploydiff_common::{NoopFilter, PomFilterConfig};
    use std::sync::Arc;

    fn dependency(artifact: &str, version: &str) -> Dependency {
        Dependency {
            group_id: "org.example".to_string(),
            artifact_id: artifact.to_string(),
            version: version.to_string(),
            classifier: String::new(),
            scope: "compile".to_string(),
            optional: false,
        }
    }

    #[test]
    fn test_version_drift_is_a_mismatch() {
        let result = diff_dependencies(
            vec![dependency("x", "1.0")],
            vec![dependency("x", "1.1")],
            &NoopFilter,
        );

        assert!(result.only_in_left.is_empty());
        assert!(result.only_in_right.is_empty());
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].left.version, "1.0");
        assert_eq!(result.mismatches[0].right.version, "1.1");
    }

    #[test]
    fn test_identical_dependencies_cancel() {
        let deps = vec![dependency("a", "1.0"), dependency("b", "2.0")];
        let result = diff_dependencies(deps.clone(), deps.into_iter().rev().collect(), &NoopFilter);
        assert!(result.has_same_entries());
    }

    #[test]
    fn test_optional_dependencies_ignored_in_left() {
        let mut optional = dependency("extra", "1.0");
        optional.optional = true;
        let filter = OptionalDependencyFilter::from(&PomFilterConfig::default());

        let result = diff_dependencies(
            vec![optional.clone(), dependency("a", "1.0")],
            vec![dependency("a", "1.0"), optional.clone()],
            &filter,
        );
        assert!(result.has_same_entries());

        let result = diff_dependencies(vec![optional.clone()], Vec::new(), &filter);
        assert!(result.only_in_left.is_empty());

        let result = diff_dependencies(Vec::new(), vec![optional], &filter);
        assert_eq!(result.only_in_right.len(), 1);
    }

    #[test]
    fn test_diff_resolves_both_sides() {
        let temp = tempfile::TempDir::new().unwrap();
        let left = temp.path().join("left");
        let right = temp.path().join("right");
        let coordinates = Coordinates::new("org.example", "core", "1.0.0");
        write_pom(
            &left,
            &coordinates,
            None,
            &[
                PomDependency::new("org.slf4j", "slf4j-api", "2.0.9"),
                PomDependency::new("junit", "junit", "4.13.2").scope("test"),
                PomDependency::new("org.example", "legacy", "1.0.0").scope("runtime"),
            ],
        );
        write_pom(
            &right,
            &coordinates,
            None,
            &[
                PomDependency::new("org.slf4j", "slf4j-api", "2.0.10"),
                PomDependency::new("org.junit.jupiter", "junit-jupiter", "5.10.0").scope("test"),
            ],
        );

        let group = Deployment::new("Maven", &left, "Gradle", &right, "1.0.0")
            .with_pom_filter(Arc::new(NoopFilter))
            .resolve_group_id(true, "org.example", &LocalLister::new())
            .unwrap();
        let resolver = LocalRepositoryResolver::new();
        let result = PomDiffer::new(&group, &resolver).diff("core").unwrap();

        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].left.artifact_id, "slf4j-api");
        assert_eq!(result.only_in_left.len(), 1);
        assert_eq!(result.only_in_left[0].artifact_id, "legacy");
        assert!(result.only_in_right.is_empty());
    }

    #[test]
    fn test_diff_missing_pom_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let left = temp.path().join("left");
        let right = temp.path().join("right");
        fs::create_dir_all(left.join("org/example/core/1.0.0")).unwrap();
        fs::create_dir_all(right.join("org/example/core/1.0.0")).unwrap();

        let group = Deployment::new("Maven", &left, "Gradle", &right, "1.0.0")
            .resolve_group_id(true, "org.example", &LocalLister::new())
            .unwrap();
        let resolver = LocalRepositoryResolver::new();
        let result = PomDiffer::new(&group, &resolver).diff("core");

        assert!(matches!(result, Err(DeployDiffError::Resolve(_))));
    }
}
