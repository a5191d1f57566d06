//! Path management for Patina configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/patina/            # Config directory (platform equivalent elsewhere)
//! └── config.toml              # Aggregation and extractor settings
//! ```

use patina_core::{PatinaError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "patina";
const CONFIG_FILE: &str = "config.toml";

/// Resolves Patina's platform directories.
pub struct PatinaPaths;

impl PatinaPaths {
    /// Returns the Patina configuration directory, e.g. `~/.config/patina/`.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PatinaError::config("Cannot determine the user configuration directory"))
    }

    /// Returns the path of `config.toml` inside [`Self::config_dir`].
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_config_dir() {
        // Some CI containers have no home directory at all
        if let (Ok(dir), Ok(file)) = (PatinaPaths::config_dir(), PatinaPaths::config_file()) {
            assert!(dir.ends_with("patina"));
            assert_eq!(file.parent(), Some(dir.as_path()));
            assert_eq!(file.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        }
    }
}
