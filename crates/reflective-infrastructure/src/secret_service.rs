//! Secret service implementation.
//!
//! Reads provider API keys from `secret.json`. Falling back to environment
//! variables is the backend's concern, not this service's.

use std::path::PathBuf;

use reflective_core::config::SecretConfig;
use reflective_core::secret::SecretService;
use reflective_core::{ReflectiveError, Result};
use tokio::sync::OnceCell;

use crate::paths::ReflectivePaths;

/// Loads and caches `secret.json`.
///
/// A missing file yields an empty [`SecretConfig`]. Parse errors only report
/// the file path and position, never the content.
#[derive(Debug)]
pub struct SecretServiceImpl {
    path: PathBuf,
    secrets: OnceCell<SecretConfig>,
}

impl SecretServiceImpl {
    pub fn new(paths: &ReflectivePaths) -> Result<Self> {
        Ok(Self::with_path(paths.secret_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            secrets: OnceCell::new(),
        }
    }

    async fn load_secrets_internal(&self) -> Result<SecretConfig> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SecretConfig::default());
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_str(&content).map_err(|err| ReflectiveError::Serialization {
            format: "JSON".to_string(),
            message: format!(
                "Failed to parse {} at line {} column {}",
                self.path.display(),
                err.line(),
                err.column()
            ),
        })
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.secrets
            .get_or_try_init(|| self.load_secrets_internal())
            .await
            .cloned()
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}
