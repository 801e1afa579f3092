pub mod personas;
pub mod run;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use reflective_core::TextBackend;
use reflective_core::config::ReflectiveConfig;
use reflective_core::persona::{PersonaCatalog, PersonaRepository};
use reflective_core::secret::SecretService;
use reflective_infrastructure::{
    ConfigService, FilePersonaRepository, PresetPersonaRepository, ReflectivePaths,
    SecretServiceImpl,
};
use reflective_interaction::{OpenAIApiBackend, RetryPolicy, RetryingBackend};

/// Shared per-invocation state: resolved paths and the lazily loaded config.
pub struct Context {
    paths: ReflectivePaths,
    config: ConfigService,
}

impl Context {
    pub fn new(config_dir: Option<&Path>) -> Result<Self> {
        let paths = ReflectivePaths::new(config_dir);
        let config = ConfigService::new(&paths)?;
        Ok(Self { paths, config })
    }

    /// Reads config.toml on first use; later calls return the cached value.
    pub async fn config(&self) -> Result<&ReflectiveConfig> {
        Ok(self.config.get_config().await?)
    }

    /// Catalog lookup order: explicit flag, `catalog_path` from config.toml,
    /// `personas.json` in the config directory, then the built-in presets.
    pub async fn load_catalog(
        &self,
        explicit: Option<&Path>,
        config: &ReflectiveConfig,
    ) -> Result<PersonaCatalog> {
        let configured = explicit
            .map(Path::to_path_buf)
            .or_else(|| config.catalog_path.clone());

        let path: Option<PathBuf> = match configured {
            Some(path) => Some(path),
            None => Some(self.paths.default_catalog_file()?).filter(|path| path.exists()),
        };

        let catalog = match path {
            Some(path) => {
                tracing::info!("Loading persona catalog from {}", path.display());
                FilePersonaRepository::with_path(&path)
                    .load_catalog()
                    .await
                    .with_context(|| format!("Failed to load persona catalog {}", path.display()))?
            }
            None => {
                tracing::info!("Using built-in persona presets");
                PresetPersonaRepository.load_catalog().await?
            }
        };
        Ok(catalog)
    }

    /// The OpenAI backend wrapped with the configured retry policy.
    pub async fn backend(&self, config: &ReflectiveConfig) -> Result<Arc<dyn TextBackend>> {
        let secrets = SecretServiceImpl::new(&self.paths)?.load_secrets().await?;
        let backend = OpenAIApiBackend::try_from_secrets(secrets.openai.as_ref())?;
        let policy = RetryPolicy::from_settings(&config.generation);
        Ok(Arc::new(RetryingBackend::new(backend, policy)))
    }
}
