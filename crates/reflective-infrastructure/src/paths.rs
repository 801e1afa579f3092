//! Unified path management for Reflective configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/reflective/        # Config directory
//! ├── config.toml              # Generation settings and catalog location
//! ├── secret.json              # API keys
//! └── personas.json            # Optional persona catalog
//! ```

use std::path::{Path, PathBuf};

use reflective_core::{ReflectiveError, Result};

const APP_DIR: &str = "reflective";
const CONFIG_FILE: &str = "config.toml";
const SECRET_FILE: &str = "secret.json";
const CATALOG_FILE: &str = "personas.json";

/// Resolves Reflective's files under a base directory.
///
/// With no explicit base the platform config directory is used
/// (`~/.config/reflective` on Linux).
#[derive(Debug, Clone, Default)]
pub struct ReflectivePaths {
    base: Option<PathBuf>,
}

impl ReflectivePaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| ReflectiveError::config("Cannot find config directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    pub fn secret_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SECRET_FILE))
    }

    /// Catalog location used when the config names none.
    pub fn default_catalog_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CATALOG_FILE))
    }
}
