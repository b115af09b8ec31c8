pub mod local_repository;
pub mod pom;

pub use local_repository::LocalRepositoryResolver;
pub use pom::PomModel;
