//! News item model.
//!
//! A news item pairs every affected currency with its own impact rating.
//! Clients still receive the legacy wire shape (`NewsRecord`) with two
//! parallel lists, which is produced from the paired form and therefore can
//! never go out of step.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::MarketDataError;

/// Upper bound (and denominator) of the impact scale.
const RATING_SCALE: u8 = 10;

// ============================================================================
// Currency code
// ============================================================================

/// Three-letter currency code, stored uppercase (e.g. `USD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalise a currency code.
    pub fn parse(raw: &str) -> Result<Self, MarketDataError> {
        let trimmed = raw.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(MarketDataError::InvalidCurrency(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Impact rating
// ============================================================================

/// Impact score on a 0-10 scale, written as `N/10` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImpactRating(u8);

impl ImpactRating {
    /// Create a rating from a raw score.
    pub fn new(score: u8) -> Result<Self, MarketDataError> {
        if score > RATING_SCALE {
            return Err(MarketDataError::InvalidRating(format!(
                "{}/{}",
                score, RATING_SCALE
            )));
        }
        Ok(Self(score))
    }

    pub fn score(self) -> u8 {
        self.0
    }
}

impl FromStr for ImpactRating {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MarketDataError::InvalidRating(s.to_string());

        let (score, scale) = s.trim().split_once('/').ok_or_else(invalid)?;
        let scale: u8 = scale.trim().parse().map_err(|_| invalid())?;
        if scale != RATING_SCALE {
            return Err(invalid());
        }

        let score: u8 = score.trim().parse().map_err(|_| invalid())?;
        Self::new(score).map_err(|_| invalid())
    }
}

impl fmt::Display for ImpactRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, RATING_SCALE)
    }
}

/// One affected currency together with the impact it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyImpact {
    pub currency: CurrencyCode,
    pub rating: ImpactRating,
}

impl CurrencyImpact {
    pub fn new(currency: CurrencyCode, rating: ImpactRating) -> Self {
        Self { currency, rating }
    }
}

// ============================================================================
// News item
// ============================================================================

/// A single financial news item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    id: u32,
    title: String,
    description: String,
    impacts: Vec<CurrencyImpact>,
}

impl NewsItem {
    /// Create a news item from already-paired impacts.
    pub fn new(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        impacts: Vec<CurrencyImpact>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            impacts,
        }
    }

    /// Create a news item from parallel currency and rating lists.
    ///
    /// Position `i` of `ratings` is the rating of currency `i`. Lists of
    /// different lengths are rejected instead of being truncated.
    pub fn from_parallel(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        currencies: &[&str],
        ratings: &[&str],
    ) -> Result<Self, MarketDataError> {
        if currencies.len() != ratings.len() {
            return Err(MarketDataError::RatingCountMismatch {
                id,
                currencies: currencies.len(),
                ratings: ratings.len(),
            });
        }

        let impacts = currencies
            .iter()
            .zip(ratings)
            .map(|(currency, rating)| -> Result<CurrencyImpact, MarketDataError> {
                Ok(CurrencyImpact::new(
                    CurrencyCode::parse(currency)?,
                    rating.parse::<ImpactRating>()?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(id, title, description, impacts))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn impacts(&self) -> &[CurrencyImpact] {
        &self.impacts
    }

    /// Affected currencies, in authoring order.
    pub fn affected_currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.impacts.iter().map(|i| &i.currency)
    }

    /// Impact ratings, aligned with `affected_currencies`.
    pub fn impact_ratings(&self) -> impl Iterator<Item = ImpactRating> + '_ {
        self.impacts.iter().map(|i| i.rating)
    }

    /// Whether this item affects the given (already uppercased) currency.
    pub fn affects(&self, currency: &str) -> bool {
        self.affected_currencies().any(|c| c.as_str() == currency)
    }

    /// Build the wire representation.
    pub fn to_record(&self) -> NewsRecord {
        NewsRecord {
            titulo: self.title.clone(),
            descripcion: self.description.clone(),
            monedas_afectadas: self
                .affected_currencies()
                .map(|c| c.as_str().to_string())
                .collect(),
            calificacion_impacto: self.impact_ratings().map(|r| r.to_string()).collect(),
        }
    }
}

impl Serialize for NewsItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// Wire representation of a news item, as published to MCP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewsRecord {
    /// Headline.
    pub titulo: String,
    /// Free-text summary.
    pub descripcion: String,
    /// Affected currency codes.
    pub monedas_afectadas: Vec<String>,
    /// Impact rating per affected currency, same order as `monedas_afectadas`.
    pub calificacion_impacto: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalises_case() {
        let code = CurrencyCode::parse("usd").unwrap();
        assert_eq!(code.as_str(), "USD");
        assert_eq!(code.to_string(), "USD");
    }

    #[test]
    fn test_currency_code_rejects_bad_input() {
        assert!(CurrencyCode::parse("US").is_err());
        assert!(CurrencyCode::parse("USDT").is_err());
        assert!(CurrencyCode::parse("U5D").is_err());
    }

    #[test]
    fn test_rating_parse_and_display() {
        let rating: ImpactRating = "7/10".parse().unwrap();
        assert_eq!(rating.score(), 7);
        assert_eq!(rating.to_string(), "7/10");

        assert!("11/10".parse::<ImpactRating>().is_err());
        assert!("5/5".parse::<ImpactRating>().is_err());
        assert!("high".parse::<ImpactRating>().is_err());
    }

    #[test]
    fn test_from_parallel_rejects_length_mismatch() {
        let err = NewsItem::from_parallel(9, "t", "d", &["USD", "EUR"], &["5/10"]).unwrap_err();
        assert_eq!(
            err,
            MarketDataError::RatingCountMismatch {
                id: 9,
                currencies: 2,
                ratings: 1
            }
        );
    }

    #[test]
    fn test_record_keeps_pairing_order() {
        let item =
            NewsItem::from_parallel(1, "t", "d", &["USD", "EUR", "JPY"], &["5/10", "6/10", "4/10"])
                .unwrap();
        let record = item.to_record();

        assert_eq!(record.monedas_afectadas, vec!["USD", "EUR", "JPY"]);
        assert_eq!(record.calificacion_impacto, vec!["5/10", "6/10", "4/10"]);
        assert!(item.affects("EUR"));
        assert!(!item.affects("GBP"));
    }

    #[test]
    fn test_serializes_as_wire_record() {
        let item = NewsItem::from_parallel(2, "Titulo", "Desc", &["USD"], &["7/10"]).unwrap();
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["titulo"], "Titulo");
        assert_eq!(value["descripcion"], "Desc");
        assert_eq!(value["monedas_afectadas"], serde_json::json!(["USD"]));
        assert_eq!(value["calificacion_impacto"], serde_json::json!(["7/10"]));
    }
}
