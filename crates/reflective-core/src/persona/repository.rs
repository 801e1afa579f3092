//! Persona repository trait.
//!
//! Defines the read-only interface for loading the persona catalog.

use super::catalog::PersonaCatalog;
use super::model::Persona;
use crate::error::Result;

/// An abstract source of persona records.
///
/// Decouples the pipeline from the storage mechanism (catalog file, built-in
/// presets, remote API). The catalog is read once at startup and a failure
/// here is fatal to the session.
#[async_trait::async_trait]
pub trait PersonaRepository: Send + Sync {
    /// Retrieves all personas in catalog order.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Persona>)`: All stored personas
    /// - `Err(ReflectiveError)`: Missing or malformed catalog
    async fn load_all(&self) -> Result<Vec<Persona>>;

    /// Loads every persona and indexes them, rejecting duplicate ids or titles.
    async fn load_catalog(&self) -> Result<PersonaCatalog> {
        PersonaCatalog::from_personas(self.load_all().await?)
    }
}
