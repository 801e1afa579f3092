//! Domain layer for Reflective.
//!
//! Persona records, feedback value types, the text-generation backend
//! contract, and the error types shared by every other crate.

pub mod backend;
pub mod config;
pub mod error;
pub mod feedback;
pub mod persona;
pub mod secret;

pub use backend::{BackendError, CompletionRequest, TextBackend};
pub use error::{
    ClassificationError, DataIntegrityError, ReflectiveError, Result, ValidationError,
};
