//! Configuration service implementation.
//!
//! Loads the root configuration from the configuration file
//! (~/.config/parley/config.toml) and caches it in memory.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use parley_core::config::RootConfig;
use parley_core::error::{ParleyError, Result};

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the default configuration; a present but malformed
/// file is a configuration error rather than a silent fallback.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Path of the configuration file.
    path: PathBuf,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading from the default location.
    ///
    /// The configuration is loaded lazily on first access to avoid blocking
    /// during initialization.
    ///
    /// # Errors
    ///
    /// Returns a config error if the platform config directory cannot be
    /// determined.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| ParleyError::config("Could not determine the config directory"))?;
        Ok(Self::with_path(base.join("parley").join("config.toml")))
    }

    /// Creates a ConfigService reading from a specific file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(RootConfig::default());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let config = toml::from_str(&raw).map_err(|e| {
            ParleyError::config(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::config::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.get_config().unwrap();
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_loads_and_caches_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"http://10.0.0.5:8000\"\n").unwrap();

        let service = ConfigService::with_path(path.clone());
        assert_eq!(
            service.get_config().unwrap().backend.base_url,
            "http://10.0.0.5:8000"
        );

        // Cached value survives the file changing underneath.
        std::fs::write(&path, "[backend]\nbase_url = \"http://changed:8000\"\n").unwrap();
        assert_eq!(
            service.get_config().unwrap().backend.base_url,
            "http://10.0.0.5:8000"
        );

        service.invalidate_cache();
        assert_eq!(
            service.get_config().unwrap().backend.base_url,
            "http://changed:8000"
        );
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "backend = not toml").unwrap();

        let service = ConfigService::with_path(path);
        assert!(service.get_config().unwrap_err().is_config());
    }
}
