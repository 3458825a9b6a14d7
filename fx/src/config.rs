//! Rate service configuration.

use std::time::Duration;

use p2pcalc_common::Currency;

use crate::error::{FxError, FxResult};

/// Public endpoint serving latest rates keyed by base currency.
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Configuration for the HTTP rate service.
#[derive(Debug, Clone)]
pub struct RateServiceConfig {
    /// Endpoint prefix; the base currency code is appended as a path segment.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Base currency for fetched tables.
    pub base_currency: Currency,
}

impl Default for RateServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RATES_URL.to_string(),
            timeout: Duration::from_secs(10),
            base_currency: Currency::eur(),
        }
    }
}

impl RateServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("P2PCALC_RATES_URL") {
            config.base_url = url;
        }

        if let Ok(secs) = std::env::var("P2PCALC_RATES_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(code) = std::env::var("P2PCALC_BASE_CURRENCY") {
            config.base_currency = Currency::new(code);
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> FxResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(FxError::Configuration("Rates URL cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FxError::Configuration(format!(
                "Rates URL must be http(s): {}",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(FxError::Configuration("Timeout cannot be 0".to_string()));
        }

        if self.base_currency.is_empty() {
            return Err(FxError::Configuration("Base currency cannot be empty".to_string()));
        }

        Ok(())
    }

    /// URL of the latest-rates document for `base`.
    pub fn latest_url(&self, base: &Currency) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), base.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.latest_url(&Currency::eur()),
            "https://api.exchangerate-api.com/v4/latest/EUR"
        );
    }

    #[test]
    fn test_invalid_config() {
        let mut config = RateServiceConfig::default();
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = RateServiceConfig::default();
        config.base_url = "ftp://rates.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trailing_slash() {
        let config = RateServiceConfig {
            base_url: "http://localhost:8080/latest/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.latest_url(&Currency::eur()), "http://localhost:8080/latest/EUR");
    }
}
