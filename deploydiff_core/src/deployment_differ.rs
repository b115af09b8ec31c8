use crate::collaborators::Collaborators;
use crate::deployment::GroupDeployment;
use crate::module_differ::ModuleDiffer;
use deploydiff_common::{
    append_section, file_names, DeployDiffError, DeploymentReport, Module, ModuleDiff,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Walks the modules of a group on both sides and compares them by name.
pub struct DeploymentDiffer {
    deployment: GroupDeployment,
    collaborators: Collaborators,
}

impl DeploymentDiffer {
    pub fn new(deployment: GroupDeployment, collaborators: Collaborators) -> Self {
        Self {
            deployment,
            collaborators,
        }
    }

    pub fn deployment(&self) -> &GroupDeployment {
        &self.deployment
    }

    pub fn diff(&self) -> Result<DeploymentReport, DeployDiffError> {
        info!(
            "Diffing {} from '{}' against '{}'",
            self.deployment.version(),
            self.deployment.left_directory().display(),
            self.deployment.right_directory().display()
        );
        let (modules, only_in_right) = self.diff_modules()?;
        for module in &modules {
            self.log_module_diff(module);
        }

        Ok(DeploymentReport {
            group_id: self.deployment.group_id().to_string(),
            version: self.deployment.version().to_string(),
            left_name: self.deployment.left_name().to_string(),
            right_name: self.deployment.right_name().to_string(),
            modules,
            only_in_right,
            bundles: Vec::new(),
        })
    }

    fn diff_modules(&self) -> Result<(Vec<ModuleDiff>, Vec<String>), DeployDiffError> {
        let lister = self.collaborators.lister.as_ref();
        let left_modules = lister.list_directories(self.deployment.left_directory())?;
        debug!(
            "Found '{}' modules for {} in '{}'",
            left_modules.len(),
            self.deployment.left_name(),
            self.deployment.left_directory().display()
        );
        let right_modules = lister.list_directories(self.deployment.right_directory())?;
        debug!(
            "Found '{}' modules for {} in '{}'",
            right_modules.len(),
            self.deployment.right_name(),
            self.deployment.right_directory().display()
        );

        let module_differ = ModuleDiffer::new(&self.deployment, &self.collaborators);
        let mut processed = Vec::new();
        let mut module_diffs = Vec::new();
        for left_module in &left_modules {
            let Some(name) = file_name(left_module) else {
                continue;
            };
            let right_module = find_with_file_name(&right_modules, &name);
            let module = Module {
                name: name.clone(),
                left: Some(left_module.clone()),
                right: right_module.clone(),
            };
            if right_module.is_none() {
                error!(
                    "{} does not contain module '{}'",
                    self.deployment.right_name(),
                    name
                );
                let left_files = file_names(&lister.list(left_module)?);
                module_diffs.push(ModuleDiff::missing_right(module, left_files));
            } else {
                module_diffs.push(module_differ.diff(module)?);
            }
            processed.push(name);
        }

        let only_in_right: Vec<String> = file_names(&right_modules)
            .into_iter()
            .filter(|name| !processed.contains(name))
            .collect();
        if !only_in_right.is_empty() {
            error!(
                "Only in {}: {:?}",
                self.deployment.right_name(),
                only_in_right
            );
        }
        Ok((module_diffs, only_in_right))
    }

    fn log_module_diff(&self, module_diff: &ModuleDiff) {
        let name = &module_diff.module.name;
        if module_diff.has_same_entries() {
            info!("Module '{}' has similar entries", name);
            return;
        }

        let mut message = format!("Diff result for {}:", name);
        append_section(
            &mut message,
            &format!("Only in {}", self.deployment.right_name()),
            module_diff.only_in_right(),
        );
        append_section(
            &mut message,
            &format!("Only in {}", self.deployment.left_name()),
            module_diff.only_in_left(),
        );
        append_section(
            &mut message,
            &format!("Dependencies only in {}", self.deployment.right_name()),
            &module_diff.pom.only_in_right,
        );
        append_section(
            &mut message,
            &format!("Dependencies only in {}", self.deployment.left_name()),
            &module_diff.pom.only_in_left,
        );
        append_section(
            &mut message,
            &format!(
                "Dependency mismatches ({} vs. {})",
                self.deployment.left_name(),
                self.deployment.right_name()
            ),
            &module_diff.pom.mismatches,
        );
        error!("{}", message);
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
}

fn find_with_file_name(paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    paths
        .iter()
        .find(|path| path.file_name().map_or(false, |file_name| file_name == name))
        .cloned()
}
