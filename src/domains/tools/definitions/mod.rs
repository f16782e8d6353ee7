//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod ask_gemini;
pub mod news;
pub mod news_analysis;
pub mod strategies;

pub use ask_gemini::{AskGeminiParams, AskGeminiTool};
pub use news::{FinancialNewsParams, FinancialNewsTool};
pub use news_analysis::{NewsAnalysisParams, NewsAnalysisTool};
pub use strategies::StrategiesTool;
