//! Market data domain module.
//!
//! Static reference data served by the tools and resources: financial news
//! items tagged with the currencies they affect, and the catalog of FX
//! hedging strategies.
//!
//! ## Architecture
//!
//! - `model.rs` - `NewsItem` and its validated building blocks
//! - `catalog.rs` - Immutable, id-ordered news collection and its seed data
//! - `filter.rs` - Currency filters applied by the news tool
//! - `strategies.rs` - FX strategy catalog
//! - `error.rs` - Validation errors raised while building the catalogs
//!
//! Catalogs are built once at startup and shared behind an `Arc`; nothing in
//! this module mutates them afterwards.

mod catalog;
mod error;
mod filter;
mod model;
mod strategies;

pub use catalog::{NewsCatalog, NewsSelection};
pub use error::MarketDataError;
pub use filter::{MatchMode, NewsQuery, MAX_LIMIT};
pub use model::{CurrencyCode, CurrencyImpact, ImpactRating, NewsItem, NewsRecord};
pub use strategies::{Strategy, StrategyCatalog};
