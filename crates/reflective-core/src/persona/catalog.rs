//! Immutable, ordered persona lookup.

use std::collections::{HashMap, HashSet};

use super::model::Persona;
use crate::error::{ReflectiveError, Result, ValidationError};

/// The persona catalog loaded at startup.
///
/// Keeps the load order for listing and enforces that `id` and `title` are
/// unique across all records.
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    index: HashMap<String, usize>,
}

impl PersonaCatalog {
    pub fn from_personas(personas: Vec<Persona>) -> Result<Self> {
        let mut index = HashMap::with_capacity(personas.len());
        let mut titles = HashSet::with_capacity(personas.len());

        for (position, persona) in personas.iter().enumerate() {
            if index.insert(persona.id.clone(), position).is_some() {
                return Err(ReflectiveError::data_access(format!(
                    "Duplicate persona id '{}' in catalog",
                    persona.id
                )));
            }
            if !titles.insert(persona.title.as_str()) {
                return Err(ReflectiveError::data_access(format!(
                    "Duplicate persona title '{}' in catalog",
                    persona.title
                )));
            }
        }

        Ok(Self { personas, index })
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.index.get(id).map(|&position| &self.personas[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Resolves a caller selection into personas, keeping the selection order.
    pub fn resolve<S: AsRef<str>>(
        &self,
        selection: &[S],
    ) -> std::result::Result<Vec<&Persona>, ValidationError> {
        if selection.is_empty() {
            return Err(ValidationError::NoPersonasSelected);
        }

        let mut seen = HashSet::with_capacity(selection.len());
        selection
            .iter()
            .map(|id| {
                let id = id.as_ref();
                if !seen.insert(id) {
                    return Err(ValidationError::DuplicatePersona(id.to_string()));
                }
                self.get(id)
                    .ok_or_else(|| ValidationError::UnknownPersona(id.to_string()))
            })
            .collect()
    }
}
