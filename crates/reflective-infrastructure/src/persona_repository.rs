//! File-backed and built-in PersonaRepository implementations

use std::path::{Path, PathBuf};

use reflective_core::persona::{Persona, PersonaRepository, get_default_presets};
use reflective_core::{ReflectiveError, Result};
use serde::Deserialize;

/// `[[persona]]` tables in TOML, or `{ "persona": [...] }` in JSON.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    persona: Vec<Persona>,
}

/// Reads the persona catalog from a `.json` or `.toml` file.
///
/// Responsibilities:
/// - Pick the parser from the file extension
/// - Surface a missing file as `NotFound` and bad content as `Serialization`
///
/// Does NOT:
/// - Check id/title uniqueness (done by `PersonaCatalog`)
/// - Write anything back; the catalog is read-only at runtime
pub struct FilePersonaRepository {
    path: PathBuf,
}

impl FilePersonaRepository {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<Vec<Persona>> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str::<CatalogFile>(content)?.persona),
            Some("json") => parse_json_catalog(content),
            other => Err(ReflectiveError::config(format!(
                "Unsupported persona catalog format '{}' for {}",
                other.unwrap_or(""),
                self.path.display()
            ))),
        }
    }
}

fn parse_json_catalog(content: &str) -> Result<Vec<Persona>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(_) => {
            Ok(serde_json::from_value::<CatalogFile>(value)?.persona)
        }
        _ => Err(ReflectiveError::Serialization {
            format: "JSON".to_string(),
            message: "persona catalog must be an array or an object with a 'persona' key"
                .to_string(),
        }),
    }
}

#[async_trait::async_trait]
impl PersonaRepository for FilePersonaRepository {
    async fn load_all(&self) -> Result<Vec<Persona>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReflectiveError::not_found(
                    "persona catalog",
                    self.path.display().to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        let personas = self.parse(&content)?;
        tracing::debug!(
            "[PersonaRepository] Loaded {} personas from {}",
            personas.len(),
            self.path.display()
        );
        Ok(personas)
    }
}

/// Serves the built-in preset personas.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetPersonaRepository;

#[async_trait::async_trait]
impl PersonaRepository for PresetPersonaRepository {
    async fn load_all(&self) -> Result<Vec<Persona>> {
        get_default_presets()
    }
}
