//! Unified path management for adpanel files.
//!
//! Configuration and the persona panel cache live under the platform config
//! directory resolved by the `dirs` crate.

use std::path::PathBuf;

use adpanel_core::error::PanelError;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PanelError {
    fn from(e: PathError) -> Self {
        PanelError::config(e.to_string())
    }
}

/// Unified path management for adpanel.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/adpanel/
/// ├── config.toml      # Engine configuration
/// └── panels.json      # Persona panel cache, keyed by brand
/// ```
pub struct AdPanelPaths;

impl AdPanelPaths {
    /// Returns the adpanel configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/adpanel/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("adpanel"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the engine configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persona panel cache.
    pub fn panel_cache_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("panels.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_share_config_dir() {
        // Only meaningful where a config dir exists
        if let Ok(dir) = AdPanelPaths::config_dir() {
            assert!(dir.ends_with("adpanel"));
            assert_eq!(AdPanelPaths::config_file().unwrap(), dir.join("config.toml"));
            assert_eq!(AdPanelPaths::panel_cache_file().unwrap(), dir.join("panels.json"));
        }
    }
}
