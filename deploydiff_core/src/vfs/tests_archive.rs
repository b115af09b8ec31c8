#[cfg(test)]
mod tests {
    use crate::test_support::write_jar;
    use crate::vfs::JarReader;
    use deploydiff_common::{ArchiveError, ArchiveKind, ArchiveReader};
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    // ============================================================================
    // Entry names
    // ============================================================================

    #[test]
    fn test_entry_names_in_archive_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let jar = temp_dir.path().join("core-1.0.jar");
        write_jar(
            &jar,
            &[("Manifest-Version", "1.0")],
            &["org/example/Core.class", "org/example/package-info.class"],
        );

        let names = JarReader::new().entry_names(&jar).unwrap();
        assert_eq!(
            names,
            vec![
                "META-INF/MANIFEST.MF",
                "org/example/Core.class",
                "org/example/package-info.class"
            ]
        );
    }

    #[test]
    fn test_entry_names_keeps_directory_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let jar = temp_dir.path().join("dirs.jar");
        let file = fs::File::create(&jar).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.add_directory("org/", zip::write::FileOptions::default()).unwrap();
        zip.start_file("org/A.class", zip::write::FileOptions::default()).unwrap();
        zip.write_all(b"A").unwrap();
        zip.finish().unwrap();

        let names = JarReader::new().entry_names(&jar).unwrap();
        assert_eq!(names, vec!["org/", "org/A.class"]);
    }

    #[test]
    fn test_entry_names_missing_archive() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = JarReader::new().entry_names(&temp_dir.path().join("missing.jar"));
        assert!(matches!(result, Err(ArchiveError::NotFound(_))));
    }

    #[test]
    fn test_entry_names_requires_regular_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = JarReader::new().entry_names(temp_dir.path());
        assert!(matches!(result, Err(ArchiveError::NotAFile(_))));
    }

    #[test]
    fn test_entry_names_invalid_archive() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let jar = temp_dir.path().join("broken.jar");
        fs::write(&jar, b"definitely not a zip").unwrap();

        let result = JarReader::new().entry_names(&jar);
        assert!(matches!(result, Err(ArchiveError::InvalidArchive { .. })));
    }

    // ============================================================================
    // Manifest
    // ============================================================================

    #[test]
    fn test_manifest_attributes() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let jar = temp_dir.path().join("core-1.0.jar");
        write_jar(
            &jar,
            &[("Manifest-Version", "1.0"), ("Automatic-Module-Name", "org.example.core")],
            &[],
        );

        let attributes = JarReader::new().manifest_attributes(&jar).unwrap();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["Automatic-Module-Name"], "org.example.core");
    }

    #[test]
    fn test_manifest_missing_in_archive() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let jar = temp_dir.path().join("plain.zip");
        let file = fs::File::create(&jar).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("readme.txt", zip::write::FileOptions::default()).unwrap();
        zip.write_all(b"no manifest").unwrap();
        zip.finish().unwrap();

        let error = JarReader::new().manifest_attributes(&jar).unwrap_err();
        assert!(matches!(
            error,
            ArchiveError::InvalidManifest { kind: ArchiveKind::File, .. }
        ));
        assert!(error.to_string().contains("archive file"));
        assert!(error.to_string().contains("META-INF/MANIFEST.MF"));
    }

    #[test]
    fn test_manifest_from_exploded_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("META-INF")).unwrap();
        fs::write(
            temp_dir.path().join("META-INF/MANIFEST.MF"),
            "Manifest-Version: 1.0\nImplementation-Title: core\n",
        )
        .unwrap();

        let attributes = JarReader::new().manifest_attributes(temp_dir.path()).unwrap();
        assert_eq!(attributes["Implementation-Title"], "core");
    }

    #[test]
    fn test_manifest_missing_in_exploded_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let error = JarReader::new().manifest_attributes(temp_dir.path()).unwrap_err();
        assert!(matches!(
            error,
            ArchiveError::InvalidManifest { kind: ArchiveKind::Directory, .. }
        ));
        assert!(error.to_string().contains("archive directory structure"));
    }

    #[test]
    fn test_manifest_malformed() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let jar = temp_dir.path().join("bad.jar");
        let file = fs::File::create(&jar).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("META-INF/MANIFEST.MF", zip::write::FileOptions::default()).unwrap();
        zip.write_all(b"this is not a manifest\n").unwrap();
        zip.finish().unwrap();

        let result = JarReader::new().manifest_attributes(&jar);
        assert!(matches!(result, Err(ArchiveError::InvalidManifest { .. })));
    }
}
