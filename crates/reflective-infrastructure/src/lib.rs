//! Infrastructure layer for Reflective.
//!
//! File-backed implementations of the repository and configuration traits
//! declared in `reflective-core`.

pub mod config_service;
pub mod paths;
pub mod persona_repository;
pub mod secret_service;

pub use crate::config_service::ConfigService;
pub use crate::paths::ReflectivePaths;
pub use crate::persona_repository::{FilePersonaRepository, PresetPersonaRepository};
pub use crate::secret_service::SecretServiceImpl;
