pub mod archive;
pub mod local;
pub mod manifest;

#[cfg(test)]
mod tests_local;

#[cfg(test)]
mod tests_archive;

pub use archive::JarReader;
pub use local::LocalLister;
