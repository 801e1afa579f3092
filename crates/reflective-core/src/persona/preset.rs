//! Default persona presets.
//!
//! The built-in catalog ships embedded in the binary so the pipeline works
//! without any catalog file.

use serde::Deserialize;

use super::model::Persona;
use crate::error::Result;

const PRESETS_TOML: &str = include_str!("presets.toml");

#[derive(Deserialize)]
struct PresetFile {
    persona: Vec<Persona>,
}

/// Returns the official preset personas in catalog order:
/// - **Tech-Savvy Millennial**
/// - **Eco-Conscious Consumer**
/// - **Health Enthusiast**
/// - **Frequent Traveler**
/// - **Parent with Young Kids**
pub fn get_default_presets() -> Result<Vec<Persona>> {
    let file: PresetFile = toml::from_str(PRESETS_TOML)?;
    Ok(file.persona)
}
