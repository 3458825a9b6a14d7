//! P2PCalc FX
//!
//! Exchange-rate lookup for the P2P fee calculator.
//!
//! # Features
//!
//! - Pluggable rate providers behind the [`RateProvider`] trait
//! - HTTP provider for the public exchangerate-api.com endpoint
//! - Derivation of the EUR > USD, EUR > target and USD > target market rates
//!
//! # Example
//!
//! ```rust,ignore
//! use p2pcalc_fx::{ExchangeRateApiProvider, MarketRates, RateProvider, RateServiceConfig};
//! use p2pcalc_common::Currency;
//!
//! let provider = ExchangeRateApiProvider::new(RateServiceConfig::from_env())?;
//! let table = provider.fetch_rates(&Currency::eur()).await?;
//! let rates = MarketRates::from_table(&table, &Currency::thb())?;
//! ```

pub mod config;
pub mod error;
pub mod exchangerate_api;
pub mod provider;
pub mod rates;

pub use config::RateServiceConfig;
pub use error::{FxError, FxResult};
pub use exchangerate_api::ExchangeRateApiProvider;
pub use provider::RateProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
pub use rates::{MarketRates, RateTable};
