//! Rate tables and the market rates derived from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use p2pcalc_common::{round_cents, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Rates quoted against a single base currency, as returned by one fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    /// Currency every rate is quoted against.
    pub base: Currency,
    /// Units of each currency per one unit of `base`.
    pub rates: BTreeMap<Currency, Decimal>,
    /// When the table was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Provider name.
    pub source: String,
}

impl RateTable {
    /// Create a table stamped with the current time.
    pub fn new(
        base: Currency,
        rates: BTreeMap<Currency, Decimal>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            base,
            rates,
            fetched_at: Utc::now(),
            source: source.into(),
        }
    }

    /// Rate for `currency` against the base.
    pub fn rate(&self, currency: &Currency) -> FxResult<Decimal> {
        if *currency == self.base {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| FxError::RateNotAvailable(currency.clone()))
    }

    /// Rate from `from` to `to`, both read against the base.
    pub fn cross_rate(&self, from: &Currency, to: &Currency) -> FxResult<Decimal> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;

        if from_rate.is_zero() {
            return Err(FxError::InvalidRate {
                currency: from.clone(),
                rate: from_rate,
            });
        }

        to_rate.checked_div(from_rate).ok_or_else(|| FxError::InvalidRate {
            currency: from.clone(),
            rate: from_rate,
        })
    }

    /// Every quoted currency except the base, in code order.
    pub fn currencies(&self) -> Vec<Currency> {
        self.rates
            .keys()
            .filter(|c| **c != self.base)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// The three market rates the calculator seeds from a rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRates {
    /// EUR > USD.
    pub eur_usd: Decimal,
    /// EUR > target.
    pub eur_target: Decimal,
    /// USD > target.
    pub usd_target: Decimal,
}

impl MarketRates {
    /// Derive the rates for `target` from a table quoted against any base.
    ///
    /// Each rate is rounded to cents. Rates are ratios of the unrounded table
    /// rates, rounded once; with a EUR base they are the table rates.
    pub fn from_table(table: &RateTable, target: &Currency) -> FxResult<Self> {
        let eur = Currency::eur();
        let usd = Currency::usd();
        let eur_usd = table.cross_rate(&eur, &usd)?;
        let eur_target = table.cross_rate(&eur, target)?;
        let usd_target = table.cross_rate(&usd, target)?;

        Ok(Self {
            eur_usd: round_cents(eur_usd),
            eur_target: round_cents(eur_target),
            usd_target: round_cents(usd_target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur_table() -> RateTable {
        let mut rates = BTreeMap::new();
        rates.insert(Currency::eur(), dec!(1));
        rates.insert(Currency::usd(), dec!(1.0842));
        rates.insert(Currency::thb(), dec!(37.6512));
        rates.insert(Currency::new("GBP"), dec!(0.8561));
        RateTable::new(Currency::eur(), rates, "TEST")
    }

    #[test]
    fn test_market_rates_from_table() {
        let rates = MarketRates::from_table(&eur_table(), &Currency::thb()).unwrap();

        assert_eq!(rates.eur_usd, dec!(1.08));
        assert_eq!(rates.eur_target, dec!(37.65));
        // 37.6512 / 1.0842 = 34.7267...
        assert_eq!(rates.usd_target, dec!(34.73));
    }

    #[test]
    fn test_market_rates_from_usd_table() {
        let mut rates = BTreeMap::new();
        rates.insert(Currency::eur(), dec!(0.9224));
        rates.insert(Currency::thb(), dec!(34.7281));
        let table = RateTable::new(Currency::usd(), rates, "TEST");

        let rates = MarketRates::from_table(&table, &Currency::thb()).unwrap();

        // 1 / 0.9224 and 34.7281 / 0.9224
        assert_eq!(rates.eur_usd, dec!(1.08));
        assert_eq!(rates.eur_target, dec!(37.65));
        assert_eq!(rates.usd_target, dec!(34.73));
    }

    #[test]
    fn test_missing_target_currency() {
        let result = MarketRates::from_table(&eur_table(), &Currency::new("XYZ"));

        assert!(matches!(result, Err(FxError::RateNotAvailable(c)) if c.code() == "XYZ"));
    }

    #[test]
    fn test_zero_usd_rate_is_invalid() {
        let mut table = eur_table();
        table.rates.insert(Currency::usd(), Decimal::ZERO);

        let result = MarketRates::from_table(&table, &Currency::thb());

        assert!(matches!(result, Err(FxError::InvalidRate { .. })));
    }

    #[test]
    fn test_currencies_exclude_base() {
        let currencies = eur_table().currencies();

        assert_eq!(
            currencies,
            vec![Currency::new("GBP"), Currency::thb(), Currency::usd()]
        );
    }

    #[test]
    fn test_base_rate_is_one() {
        let mut table = eur_table();
        table.rates.remove(&Currency::eur());

        assert_eq!(table.rate(&Currency::eur()).unwrap(), Decimal::ONE);
    }
}
