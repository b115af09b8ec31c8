use super::pom::{interpolate, PomModel, RawDependency};
use deploydiff_common::{Coordinates, Dependency, DependencyResolver, ResolveError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, trace};

const MAX_PARENT_DEPTH: usize = 32;
const MAX_IMPORT_DEPTH: usize = 16;
const IMPORT_SCOPE: &str = "import";

/// Resolves dependencies from POM files laid out as a Maven repository.
///
/// Parents and imported BOMs must be present in the same repository; nothing
/// is downloaded.
/// Calls are serialized so a single instance can be shared across threads.
#[derive(Debug, Default)]
pub struct LocalRepositoryResolver {
    monitor: Mutex<()>,
}

impl LocalRepositoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_model(
        &self,
        repository: &Path,
        coordinates: &Coordinates,
    ) -> Result<Option<(PathBuf, PomModel)>, ResolveError> {
        let Some(path) = find_pom(repository, coordinates) else {
            return Ok(None);
        };
        let content = fs::read_to_string(&path)?;
        trace!("Reading pom from '{}'", path.display());
        let model = PomModel::parse(&content).map_err(|reason| ResolveError::InvalidPom {
            path: path.clone(),
            reason,
        })?;
        Ok(Some((path, model)))
    }

    /// The model of `coordinates` followed by its ancestors.
    fn read_hierarchy(
        &self,
        repository: &Path,
        coordinates: &Coordinates,
    ) -> Result<Vec<PomModel>, ResolveError> {
        let (path, model) = self.read_model(repository, coordinates)?.ok_or_else(|| {
            ResolveError::PomNotFound {
                coordinates: coordinates.to_string(),
                path: pom_path(repository, coordinates),
            }
        })?;
        debug!("Resolving '{}' from '{}'", coordinates, path.display());

        let mut hierarchy = vec![model];
        while let Some(parent) = hierarchy.last().and_then(|model| model.parent.clone()) {
            if hierarchy.len() > MAX_PARENT_DEPTH {
                return Err(ResolveError::InvalidPom {
                    path,
                    reason: format!("parent chain deeper than {}", MAX_PARENT_DEPTH),
                });
            }
            let (_, parent_model) = self.read_model(repository, &parent)?.ok_or_else(|| {
                ResolveError::ParentNotFound {
                    coordinates: coordinates.to_string(),
                    parent: parent.to_string(),
                }
            })?;
            hierarchy.push(parent_model);
        }
        Ok(hierarchy)
    }
}

impl DependencyResolver for LocalRepositoryResolver {
    fn resolve(
        &self,
        coordinates: &Coordinates,
        repository: &Path,
    ) -> Result<Vec<Dependency>, ResolveError> {
        let _guard = self
            .monitor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let hierarchy = self.read_hierarchy(repository, coordinates)?;
        let properties = effective_properties(&hierarchy);
        let managed = self.management(repository, &hierarchy, &properties, 0)?;

        // Nearest declaration wins
        let mut declared: Vec<&RawDependency> = Vec::new();
        for model in &hierarchy {
            for dependency in &model.dependencies {
                let key = interpolated_key(dependency, &properties);
                if !declared
                    .iter()
                    .any(|existing| interpolated_key(existing, &properties) == key)
                {
                    declared.push(dependency);
                }
            }
        }

        let path = pom_path(repository, coordinates);
        declared
            .into_iter()
            .map(|dependency| -> Result<Dependency, ResolveError> {
                let key = interpolated_key(dependency, &properties);
                let management = managed.get(&key);
                let version = dependency
                    .version
                    .as_ref()
                    .map(|version| interpolate(version, &properties))
                    .or_else(|| management.and_then(|m| m.version.clone()))
                    .ok_or_else(|| ResolveError::InvalidPom {
                        path: path.clone(),
                        reason: format!("no version for '{}:{}'", key.0, key.1),
                    })?;
                let scope = dependency
                    .scope
                    .as_ref()
                    .map(|scope| interpolate(scope, &properties))
                    .or_else(|| management.and_then(|m| m.scope.clone()))
                    .unwrap_or_else(|| "compile".to_string());
                let optional = dependency
                    .optional
                    .as_ref()
                    .map(|optional| interpolate(optional, &properties))
                    .or_else(|| management.and_then(|m| m.optional.clone()))
                    .map_or(false, |optional| optional == "true");
                Ok(Dependency {
                    group_id: key.0,
                    artifact_id: key.1,
                    version,
                    classifier: key.2,
                    scope,
                    optional,
                })
            })
            .collect()
    }
}

type ManagementKey = (String, String, String);

/// Interpolated values of a `<dependencyManagement>` entry
#[derive(Debug, Clone)]
struct Managed {
    version: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
}

impl LocalRepositoryResolver {
    /// Dependency management of `hierarchy`, nearest declaration first, with
    /// the entries of imported BOMs merged behind the declared ones.
    fn management(
        &self,
        repository: &Path,
        hierarchy: &[PomModel],
        properties: &HashMap<String, String>,
        depth: usize,
    ) -> Result<HashMap<ManagementKey, Managed>, ResolveError> {
        let mut managed = HashMap::new();
        let mut imports = Vec::new();
        for model in hierarchy {
            for dependency in &model.managed_dependencies {
                let key = interpolated_key(dependency, properties);
                let value = |field: &Option<String>| {
                    field.as_ref().map(|value| interpolate(value, properties))
                };
                let scope = value(&dependency.scope);
                if scope.as_deref() == Some(IMPORT_SCOPE) {
                    let version = value(&dependency.version).ok_or_else(|| {
                        ResolveError::InvalidPom {
                            path: model_path(repository, model),
                            reason: format!("no version for imported '{}:{}'", key.0, key.1),
                        }
                    })?;
                    imports.push(Coordinates::new(key.0, key.1, version));
                    continue;
                }
                managed.entry(key).or_insert(Managed {
                    version: value(&dependency.version),
                    scope,
                    optional: value(&dependency.optional),
                });
            }
        }

        for bom in imports {
            if depth >= MAX_IMPORT_DEPTH {
                return Err(ResolveError::InvalidPom {
                    path: pom_path(repository, &bom),
                    reason: format!("BOM imports nested deeper than {}", MAX_IMPORT_DEPTH),
                });
            }
            debug!("Importing dependency management of '{}'", bom);
            let bom_hierarchy = self.read_hierarchy(repository, &bom)?;
            let bom_properties = effective_properties(&bom_hierarchy);
            let imported = self.management(repository, &bom_hierarchy, &bom_properties, depth + 1)?;
            for (key, entry) in imported {
                managed.entry(key).or_insert(entry);
            }
        }
        Ok(managed)
    }
}

fn interpolated_key(
    dependency: &RawDependency,
    properties: &HashMap<String, String>,
) -> ManagementKey {
    let (group_id, artifact_id, classifier) = dependency.management_key();
    (
        interpolate(&group_id, properties),
        interpolate(&artifact_id, properties),
        interpolate(&classifier, properties),
    )
}

/// Properties of the hierarchy (child over parent) plus the project values.
fn effective_properties(hierarchy: &[PomModel]) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    for model in hierarchy.iter().rev() {
        for (name, value) in &model.properties {
            properties.insert(name.clone(), value.clone());
        }
    }

    if let Some(project) = hierarchy.first() {
        if let Some(group_id) = project.effective_group_id() {
            properties.insert("project.groupId".to_string(), group_id.to_string());
        }
        if let Some(version) = project.effective_version() {
            properties.insert("project.version".to_string(), version.to_string());
        }
        properties.insert("project.artifactId".to_string(), project.artifact_id.clone());
        if let Some(parent) = &project.parent {
            properties.insert("project.parent.groupId".to_string(), parent.group_id.clone());
            properties.insert("project.parent.version".to_string(), parent.version.clone());
        }
    }
    properties
}

fn model_path(repository: &Path, model: &PomModel) -> PathBuf {
    match (model.effective_group_id(), model.effective_version()) {
        (Some(group_id), Some(version)) => pom_path(
            repository,
            &Coordinates::new(group_id, model.artifact_id.as_str(), version),
        ),
        _ => repository.to_path_buf(),
    }
}

/// Directory holding the files of `coordinates` in a Maven repository layout
pub fn version_directory(repository: &Path, coordinates: &Coordinates) -> PathBuf {
    let mut directory = repository.to_path_buf();
    for segment in coordinates.group_id.split('.') {
        directory.push(segment);
    }
    directory
        .join(&coordinates.artifact_id)
        .join(&coordinates.version)
}

pub fn pom_path(repository: &Path, coordinates: &Coordinates) -> PathBuf {
    version_directory(repository, coordinates).join(format!(
        "{}-{}.pom",
        coordinates.artifact_id, coordinates.version
    ))
}

/// The pom of `coordinates`, falling back to the single timestamped pom of a
/// snapshot version directory.
fn find_pom(repository: &Path, coordinates: &Coordinates) -> Option<PathBuf> {
    let exact = pom_path(repository, coordinates);
    if exact.is_file() {
        return Some(exact);
    }

    let prefix = format!("{}-", coordinates.artifact_id);
    let candidates: Vec<PathBuf> = fs::read_dir(version_directory(repository, coordinates))
        .ok()?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy())
                .map_or(false, |name| name.starts_with(&prefix) && name.ends_with(".pom"))
        })
        .collect();
    match candidates.as_slice() {
        [single] => Some(single.clone()),
        _ => None,
    }
}
