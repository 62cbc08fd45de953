//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use boxes::{BoxesError, config::AppConfig};

/// Relative path checked in the working directory.
const LOCAL_CONFIG: &str = "boxes/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for BoxesError {
    fn from(err: ConfigError) -> Self {
        BoxesError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (boxes/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BoxesError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "boxes", "boxes") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, BoxesError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[layout]\nnode_spacing = 80.0\n\n[style]\ndefault_edge_colour = \"#222\"\n\n[style.colours]\nteal = \"#008080\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout().node_spacing(), 80.0);
        assert_eq!(
            config.style().default_edge_colour().unwrap().as_str(),
            "#222"
        );
        let table = config.style().colour_table().unwrap();
        assert_eq!(table.resolve("teal").unwrap().as_str(), "#008080");
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("/nonexistent/boxes.toml")).unwrap_err();
        assert!(matches!(err, BoxesError::Config(ref message) if message.contains("Missing")));
    }

    #[test]
    fn test_malformed_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[layout\nnode_spacing = ").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, BoxesError::Config(ref message) if message.contains("TOML")));
    }
}
