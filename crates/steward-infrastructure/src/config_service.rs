//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`
//! (default `~/.config/steward/config.toml`).

use crate::paths::StewardPaths;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use steward_core::config::StewardConfig;
use steward_core::error::{Result, StewardError};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; the platform default when `None`.
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<StewardConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform default config file.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading the given config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// logged and also yields the defaults; use [`ConfigService::try_load`]
    /// to surface the error instead.
    pub fn get_config(&self) -> StewardConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.try_load().unwrap_or_else(|e| {
            tracing::warn!("[ConfigService] Falling back to default config: {}", e);
            StewardConfig::default()
        });

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Reads and parses the config file without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved, the file cannot be
    /// read, or its TOML is invalid. A missing file is not an error.
    pub fn try_load(&self) -> Result<StewardConfig> {
        let path = self.config_path()?;
        if !path.exists() {
            tracing::debug!("[ConfigService] No config at {:?}, using defaults", path);
            return Ok(StewardConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: StewardConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {:?}", path);
        Ok(config)
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => StewardPaths::config_file().map_err(|e| StewardError::config(e.to_string())),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
