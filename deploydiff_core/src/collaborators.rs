use crate::resolver::LocalRepositoryResolver;
use crate::vfs::{JarReader, LocalLister};
use deploydiff_common::{ArchiveReader, DependencyResolver, DirectoryLister};
use std::sync::Arc;

/// The external services the differs rely on
#[derive(Clone)]
pub struct Collaborators {
    pub lister: Arc<dyn DirectoryLister>,
    pub archives: Arc<dyn ArchiveReader>,
    pub resolver: Arc<dyn DependencyResolver>,
}

impl Collaborators {
    pub fn new(
        lister: Arc<dyn DirectoryLister>,
        archives: Arc<dyn ArchiveReader>,
        resolver: Arc<dyn DependencyResolver>,
    ) -> Self {
        Self {
            lister,
            archives,
            resolver,
        }
    }

    /// Local filesystem listing, zip-based archive reading and resolution
    /// against the POM files of the compared repositories.
    pub fn local() -> Self {
        Self::new(
            Arc::new(LocalLister::new()),
            Arc::new(JarReader::new()),
            Arc::new(LocalRepositoryResolver::new()),
        )
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::local()
    }
}
