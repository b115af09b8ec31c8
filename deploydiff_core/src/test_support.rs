//! Fixtures shared by the unit tests: jars, poms and deployment trees.

use crate::resolver::local_repository::{pom_path, version_directory};
use deploydiff_common::Coordinates;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Writes a jar holding a manifest with `attributes` followed by `entries`.
pub fn write_jar(path: &Path, attributes: &[(&str, &str)], entries: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    for (name, value) in attributes {
        write!(zip, "{}: {}\r\n", name, value).unwrap();
    }
    zip.write_all(b"\r\n").unwrap();

    for entry in entries {
        zip.start_file(*entry, options).unwrap();
        zip.write_all(entry.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Writes a zip with empty `entries`.
pub fn write_zip(path: &Path, entries: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for entry in entries {
        zip.start_file(*entry, FileOptions::default()).unwrap();
    }
    zip.finish().unwrap();
}

#[derive(Debug, Clone)]
pub struct PomDependency {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    scope: Option<String>,
    optional: bool,
}

impl PomDependency {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: None,
            scope: None,
            optional: false,
        }
    }

    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            "    <dependency>\n      <groupId>{}</groupId>\n      <artifactId>{}</artifactId>\n      <version>{}</version>\n",
            self.group_id, self.artifact_id, self.version
        );
        if let Some(classifier) = &self.classifier {
            xml.push_str(&format!("      <classifier>{}</classifier>\n", classifier));
        }
        if let Some(scope) = &self.scope {
            xml.push_str(&format!("      <scope>{}</scope>\n", scope));
        }
        if self.optional {
            xml.push_str("      <optional>true</optional>\n");
        }
        xml.push_str("    </dependency>\n");
        xml
    }
}

/// Writes the pom of `coordinates` in the Maven layout under `repository`.
pub fn write_pom(
    repository: &Path,
    coordinates: &Coordinates,
    parent: Option<&Coordinates>,
    dependencies: &[PomDependency],
) -> PathBuf {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project>\n");
    if let Some(parent) = parent {
        xml.push_str(&format!(
            "  <parent>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n    <version>{}</version>\n  </parent>\n",
            parent.group_id, parent.artifact_id, parent.version
        ));
    }
    xml.push_str(&format!(
        "  <groupId>{}</groupId>\n  <artifactId>{}</artifactId>\n  <version>{}</version>\n",
        coordinates.group_id, coordinates.artifact_id, coordinates.version
    ));
    xml.push_str("  <dependencies>\n");
    for dependency in dependencies {
        xml.push_str(&dependency.to_xml());
    }
    xml.push_str("  </dependencies>\n</project>\n");

    fs::create_dir_all(version_directory(repository, coordinates)).unwrap();
    let path = pom_path(repository, coordinates);
    fs::write(&path, xml).unwrap();
    path
}

/// Publishes `module` at `version` under `repository`: main jar, pom and
/// checksum files.
pub fn publish_module(
    repository: &Path,
    group_id: &str,
    module: &str,
    version: &str,
    attributes: &[(&str, &str)],
    entries: &[&str],
    dependencies: &[PomDependency],
) -> PathBuf {
    let coordinates = Coordinates::new(group_id, module, version);
    let directory = version_directory(repository, &coordinates);
    write_jar(
        &directory.join(format!("{}-{}.jar", module, version)),
        attributes,
        entries,
    );
    write_pom(repository, &coordinates, None, dependencies);
    directory
}
