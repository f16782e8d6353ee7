//! Generative-text domain module.
//!
//! The `ask_gemini` and `analisis_noticias` tools talk to a language model through the
//! `TextGenerationService` trait, so the tool registry never depends on a
//! concrete HTTP client. `GeminiClient` is the production adapter for the
//! Google Generative Language REST API.
//!
//! ## Architecture
//!
//! - `service.rs` - `TextGenerationService` trait and supported models
//! - `gemini.rs` - Gemini REST adapter (reqwest)
//! - `error.rs` - Generation error types

mod error;
mod gemini;
mod service;

pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use service::{GeminiModel, TextGenerationService};
