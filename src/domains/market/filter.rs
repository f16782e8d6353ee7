//! Currency filters for news selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::MarketDataError;
use super::model::NewsItem;

/// Largest page a single query may request.
pub const MAX_LIMIT: usize = 10;

/// Shortest accepted currency filter.
const MIN_CURRENCY_LEN: usize = 3;

/// How a list of wanted currencies is matched against a news item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The item affects at least one of the wanted currencies.
    #[default]
    Any,
    /// The item affects every wanted currency.
    All,
}

/// A validated news filter.
///
/// The default query matches every item and applies no limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsQuery {
    currencies: Vec<String>,
    mode: MatchMode,
    limit: Option<usize>,
}

impl NewsQuery {
    /// Query that returns the whole catalog.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query, normalising currencies to uppercase and dropping
    /// duplicates.
    pub fn new(
        currencies: Option<Vec<String>>,
        mode: MatchMode,
        limit: Option<usize>,
    ) -> Result<Self, MarketDataError> {
        let mut wanted: Vec<String> = Vec::new();
        for raw in currencies.unwrap_or_default() {
            let code = raw.trim().to_ascii_uppercase();
            if code.chars().count() < MIN_CURRENCY_LEN {
                return Err(MarketDataError::InvalidQuery(format!(
                    "currency '{}' must have at least {} characters",
                    raw, MIN_CURRENCY_LEN
                )));
            }
            if !wanted.contains(&code) {
                wanted.push(code);
            }
        }

        if let Some(limit) = limit {
            if !(1..=MAX_LIMIT).contains(&limit) {
                return Err(MarketDataError::InvalidQuery(format!(
                    "limit must be between 1 and {}, got {}",
                    MAX_LIMIT, limit
                )));
            }
        }

        Ok(Self {
            currencies: wanted,
            mode,
            limit,
        })
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether the item passes the currency filter.
    pub fn matches(&self, item: &NewsItem) -> bool {
        if self.currencies.is_empty() {
            return true;
        }

        match self.mode {
            MatchMode::Any => self.currencies.iter().any(|c| item.affects(c)),
            MatchMode::All => self.currencies.iter().all(|c| item.affects(c)),
        }
    }
}
