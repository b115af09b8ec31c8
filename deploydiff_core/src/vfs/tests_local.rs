#[cfg(test)]
mod tests {
    use crate::vfs::LocalLister;
    use deploydiff_common::{file_names, DeployDiffError, DirectoryLister};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("core-1.0.jar"), b"jar").unwrap();
        fs::write(temp_dir.path().join("core-1.0.pom"), b"pom").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested/ignored.txt"), b"deep").unwrap();

        let lister = LocalLister::new();
        let mut names = file_names(&lister.list(temp_dir.path()).unwrap());
        names.sort();

        assert_eq!(names, vec!["core-1.0.jar", "core-1.0.pom", "nested"]);
    }

    #[test]
    fn test_list_directories_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("core")).unwrap();
        fs::create_dir(temp_dir.path().join("web")).unwrap();
        fs::write(temp_dir.path().join("maven-metadata.xml"), b"<metadata/>").unwrap();

        let lister = LocalLister::new();
        let mut names = file_names(&lister.list_directories(temp_dir.path()).unwrap());
        names.sort();

        assert_eq!(names, vec!["core", "web"]);
    }

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let lister = LocalLister::new();
        assert!(lister.list(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing");

        let result = LocalLister::new().list(&missing);
        assert!(matches!(result, Err(DeployDiffError::MissingDirectory(path)) if path == missing));
    }

    #[test]
    fn test_list_file_is_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, b"text").unwrap();

        assert!(LocalLister::new().list(&file).is_err());
    }
}
