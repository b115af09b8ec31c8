use crate::{AppConfig, DeployDiffError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "deploydiff.toml";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub exists: bool,
}

/// Loads the configuration from `explicit_path`, or from the platform config
/// directory when none is given. A missing file yields the defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<LoadedConfig, DeployDiffError> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    let exists = path.exists();

    let config = if exists {
        let data = fs::read_to_string(&path)?;
        parse_config(&data)?
    } else {
        AppConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path,
        exists,
    })
}

pub fn ensure_config(explicit_path: Option<&Path>) -> Result<LoadedConfig, DeployDiffError> {
    let loaded = load_config(explicit_path)?;
    if !loaded.exists {
        save_config(&loaded.path, &loaded.config)?;
    }
    Ok(loaded)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), DeployDiffError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(config)
        .map_err(|e| DeployDiffError::Serialization(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

pub fn parse_config(data: &str) -> Result<AppConfig, DeployDiffError> {
    toml::from_str(data).map_err(|e| DeployDiffError::Serialization(e.to_string()))
}

pub fn default_config_path() -> Result<PathBuf, DeployDiffError> {
    let dirs = ProjectDirs::from("", "aecs4u", "deploydiff")
        .ok_or_else(|| DeployDiffError::Config("Unable to determine config directory".to_string()))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}
