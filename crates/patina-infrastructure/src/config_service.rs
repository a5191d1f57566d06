//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` (by default
//! `~/.config/patina/config.toml`) and caches it.

use crate::paths::PatinaPaths;
use patina_core::config::RootConfig;
use patina_core::{PatinaError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, filled on first successful load.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service for the platform configuration file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(PatinaPaths::config_file()?))
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing or empty file yields the defaults. Malformed TOML and
    /// out-of-range values are errors.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().map_err(|_| poisoned())?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().map_err(|_| poisoned())?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) -> Result<()> {
        let mut write_lock = self.config.write().map_err(|_| poisoned())?;
        *write_lock = None;
        Ok(())
    }

    /// Validates `config`, writes it to the file and replaces the cache.
    pub fn save(&self, config: &RootConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(config)?)?;
        tracing::info!(path = %self.path.display(), "Saved configuration");

        let mut write_lock = self.config.write().map_err(|_| poisoned())?;
        *write_lock = Some(config.clone());
        Ok(())
    }

    fn load_config(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(RootConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RootConfig::default());
        }

        let config: RootConfig = toml::from_str(&content).map_err(|err| {
            PatinaError::config(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                err
            ))
        })?;
        config.validate()?;

        tracing::debug!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }
}

fn poisoned() -> PatinaError {
    PatinaError::internal("Configuration cache lock poisoned")
}
