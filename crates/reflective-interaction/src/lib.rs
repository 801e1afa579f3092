//! Backend transports for Reflective.
//!
//! - [`OpenAIApiBackend`]: OpenAI Chat Completions over HTTP
//! - [`RetryingBackend`]: per-attempt timeout and bounded exponential backoff
//!   around any [`TextBackend`](reflective_core::TextBackend)

pub mod openai_api_backend;
pub mod retrying_backend;

pub use openai_api_backend::OpenAIApiBackend;
pub use retrying_backend::{RetryPolicy, RetryingBackend};
