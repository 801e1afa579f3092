//! Persona domain module.
//!
//! # Module Structure
//!
//! - `model`: the `Persona` record and its attribute groups
//! - `attribute`: tagged attribute values and the shared text formatter
//! - `catalog`: ordered, unique-keyed lookup over loaded personas
//! - `repository`: trait for loading the catalog
//! - `preset`: built-in personas

mod attribute;
mod catalog;
mod model;
mod preset;
mod repository;

pub use attribute::{AttributeGroup, AttributeValue, Scalar, render_group};
pub use catalog::PersonaCatalog;
pub use model::{Persona, PersonaGroup};
pub use preset::get_default_presets;
pub use repository::PersonaRepository;
