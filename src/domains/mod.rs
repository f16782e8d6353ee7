//! Domains module containing business logic organized by bounded contexts.
//!
//! - `market`: news and strategy catalogs, currency/rating model, filtering
//! - `generation`: text generation service trait and the Gemini REST adapter
//! - `tools`: MCP tools, registry and dispatch
//! - `resources`: readable resources and templates
//! - `prompts`: prompt templates

pub mod generation;
pub mod market;
pub mod prompts;
pub mod resources;
pub mod tools;
