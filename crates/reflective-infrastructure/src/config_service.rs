//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` and caches it. A missing
//! file yields the defaults; a malformed one is an error.

use std::path::PathBuf;

use reflective_core::config::ReflectiveConfig;
use reflective_core::Result;
use tokio::sync::OnceCell;

use crate::paths::ReflectivePaths;

/// Configuration service that loads and caches the root configuration.
#[derive(Debug)]
pub struct ConfigService {
    path: PathBuf,
    config: OnceCell<ReflectiveConfig>,
}

impl ConfigService {
    /// Uses `config.toml` under the resolved config directory.
    pub fn new(paths: &ReflectivePaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: OnceCell::new(),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub async fn get_config(&self) -> Result<&ReflectiveConfig> {
        self.config.get_or_try_init(|| self.load_config()).await
    }

    async fn load_config(&self) -> Result<ReflectiveConfig> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let config: ReflectiveConfig = toml::from_str(&content)?;
                tracing::debug!("[ConfigService] Loaded {}", self.path.display());
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] {} not found, using defaults",
                    self.path.display()
                );
                Ok(ReflectiveConfig::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
