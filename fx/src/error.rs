//! Rate lookup error types.

use p2pcalc_common::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while looking up exchange rates.
#[derive(Debug, Error)]
pub enum FxError {
    /// HTTP transport failed or the body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate service answered with a non-success status.
    #[error("Rate service returned status {status} for {url}")]
    ApiStatus { status: u16, url: String },

    /// Rate service response could not be interpreted.
    #[error("Failed to parse rate response: {0}")]
    Parse(String),

    /// Currency missing from the rate table.
    #[error("Rate not available for {0}")]
    RateNotAvailable(Currency),

    /// A rate that cannot be used in a derivation.
    #[error("Invalid rate {rate} for {currency}")]
    InvalidRate { currency: Currency, rate: Decimal },

    /// Invalid service configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider returned an error.
    #[error("Rate provider error: {0}")]
    Provider(String),
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        FxError::Parse(err.to_string())
    }
}

/// Result type for rate lookups.
pub type FxResult<T> = Result<T, FxError>;
