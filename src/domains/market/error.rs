//! Market data validation errors.

use thiserror::Error;

/// Errors raised while building news items and catalogs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarketDataError {
    /// A currency code is not three ASCII letters.
    #[error("Invalid currency code '{0}': expected three ASCII letters")]
    InvalidCurrency(String),

    /// An impact rating is not of the form `N/10` with `0 <= N <= 10`.
    #[error("Invalid impact rating '{0}': expected 'N/10' with N between 0 and 10")]
    InvalidRating(String),

    /// Parallel currency/rating lists differ in length.
    #[error(
        "News item {id} lists {currencies} currencies but {ratings} impact ratings"
    )]
    RatingCountMismatch {
        id: u32,
        currencies: usize,
        ratings: usize,
    },

    /// Two news items share the same id.
    #[error("Duplicate news id: {0}")]
    DuplicateNewsId(u32),

    /// A news filter was rejected.
    #[error("Invalid news query: {0}")]
    InvalidQuery(String),

    /// Two strategies share the same id.
    #[error("Duplicate strategy id: {0}")]
    DuplicateStrategyId(String),
}
