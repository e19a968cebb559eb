//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Config file name inside the configuration directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/birdcorr/`
/// - macOS: `~/Library/Application Support/birdcorr/`
/// - Windows: `%APPDATA%\birdcorr\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// The explicit `--config` path if given, else the platform default.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit.map_or_else(config_file_path, |p| Ok(p.to_path_buf()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_path_under_app_dir() {
        let path = config_file_path().unwrap();
        assert!(path.ends_with(Path::new(APP_NAME).join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = Path::new("/tmp/custom.toml");
        assert_eq!(resolve_config_path(Some(explicit)).unwrap(), explicit);
    }
}
