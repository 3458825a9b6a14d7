//! Rate provider trait and the in-memory provider used by tests.

use async_trait::async_trait;
use p2pcalc_common::Currency;

use crate::error::FxResult;
use crate::rates::RateTable;

/// Trait for exchange-rate sources.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch every rate quoted against `base`.
    async fn fetch_rates(&self, base: &Currency) -> FxResult<RateTable>;

    /// Currencies that can be selected as a conversion target from `base`.
    async fn supported_currencies(&self, base: &Currency) -> FxResult<Vec<Currency>> {
        Ok(self.fetch_rates(base).await?.currencies())
    }
}

/// Mock rate provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    tables: dashmap::DashMap<Currency, std::collections::BTreeMap<Currency, rust_decimal::Decimal>>,
    failing: std::sync::atomic::AtomicBool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a new mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: dashmap::DashMap::new(),
            failing: std::sync::atomic::AtomicBool::new(false),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Set a rate quoted against `base`.
    pub fn set_rate(&self, base: Currency, quote: Currency, rate: rust_decimal::Decimal) {
        self.tables.entry(base).or_default().insert(quote, rate);
    }

    /// Make every subsequent fetch fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of fetches attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rates(&self, base: &Currency) -> FxResult<RateTable> {
        use crate::error::FxError;
        use std::sync::atomic::Ordering;

        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(FxError::Provider(format!("{} is unavailable", self.name)));
        }

        self.tables
            .get(base)
            .map(|rates| RateTable::new(base.clone(), rates.clone(), self.name.clone()))
            .ok_or_else(|| FxError::RateNotAvailable(base.clone()))
    }
}
