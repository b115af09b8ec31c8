pub mod archive_differ;
pub mod collaborators;
pub mod deployment;
pub mod deployment_differ;
pub mod diff;
pub mod filters;
pub mod module_differ;
pub mod pom_differ;
pub mod resolver;
pub mod vfs;
pub mod zip_differ;

#[cfg(test)]
mod test_support;

pub use archive_differ::{diff_manifest, ArchiveDiffer};
pub use collaborators::Collaborators;
pub use deployment::{Deployment, GroupDeployment};
pub use deployment_differ::DeploymentDiffer;
pub use diff::diff;
pub use filters::{OptionalDependencyFilter, PatternFilter};
pub use module_differ::{extract_classifier, ModuleDiffer};
pub use pom_differ::{diff_dependencies, PomDiffer};
pub use resolver::LocalRepositoryResolver;
pub use vfs::{JarReader, LocalLister};
pub use zip_differ::{diff_bundle, ZipDiffer};
