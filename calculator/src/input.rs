//! Editable calculator inputs.

use p2pcalc_common::{Currency, Quantity};
use p2pcalc_fx::MarketRates;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the deposit fee string is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    /// Flat amount in EUR.
    #[default]
    Flat,
    /// Percentage of the deposited EUR amount.
    Percentage,
}

impl FeeMode {
    /// Map the "fee is a percentage" checkbox.
    pub fn from_percentage_flag(is_percentage: bool) -> Self {
        if is_percentage {
            FeeMode::Percentage
        } else {
            FeeMode::Flat
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, FeeMode::Percentage)
    }
}

/// Every field of the calculator form.
///
/// Missing fields fall back to the defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionInput {
    /// Market EUR > USD rate.
    pub eur_usd_rate: Decimal,
    /// Market EUR > target rate, the direct-exchange baseline.
    pub eur_target_rate: Decimal,
    /// Market USD > target rate.
    pub usd_target_rate: Decimal,
    /// Fee as typed; parsed leniently at calculation time.
    pub deposit_fee: String,
    pub fee_mode: FeeMode,
    /// EUR > USDC rate applied on deposit.
    pub eur_usdc_rate: Decimal,
    /// Best USDC > target P2P offer.
    pub usdc_target_rate: Decimal,
    /// Minimum order size of the P2P offer, in target units.
    pub min_p2p_amount: Decimal,
    /// EUR to exchange. Ignored while aligning with the P2P minimum.
    pub eur_amount: Decimal,
    pub align_with_min_p2p: bool,
    /// Label only.
    pub target_currency: Currency,
}

impl Default for ConversionInput {
    fn default() -> Self {
        Self {
            eur_usd_rate: Decimal::new(108, 2),
            eur_target_rate: Decimal::new(3750, 2),
            usd_target_rate: Decimal::new(3472, 2),
            deposit_fee: "1".to_string(),
            fee_mode: FeeMode::Flat,
            eur_usdc_rate: Decimal::new(105, 2),
            usdc_target_rate: Decimal::new(3500, 2),
            min_p2p_amount: Decimal::from(3500),
            eur_amount: Decimal::from(100),
            align_with_min_p2p: false,
            target_currency: Currency::thb(),
        }
    }
}

impl ConversionInput {
    /// The deposit fee as a number; `NaN` when it does not start with one.
    pub fn deposit_fee_value(&self) -> Quantity {
        Quantity::parse_lenient(&self.deposit_fee)
    }

    /// Overwrite the three market rates.
    pub fn apply_market_rates(&mut self, rates: &MarketRates) {
        self.eur_usd_rate = rates.eur_usd;
        self.eur_target_rate = rates.eur_target;
        self.usd_target_rate = rates.usd_target;
    }

    /// Set the fee string and its interpretation.
    pub fn with_deposit_fee(mut self, fee: impl Into<String>, mode: FeeMode) -> Self {
        self.deposit_fee = fee.into();
        self.fee_mode = mode;
        self
    }

    /// Set the EUR amount to exchange.
    pub fn with_eur_amount(mut self, amount: Decimal) -> Self {
        self.eur_amount = amount;
        self
    }

    /// Size the EUR amount to the P2P minimum.
    pub fn aligned(mut self) -> Self {
        self.align_with_min_p2p = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let input = ConversionInput::default();

        assert_eq!(input.eur_usd_rate, dec!(1.08));
        assert_eq!(input.eur_target_rate, dec!(37.50));
        assert_eq!(input.usd_target_rate, dec!(34.72));
        assert_eq!(input.eur_usdc_rate, dec!(1.05));
        assert_eq!(input.usdc_target_rate, dec!(35.00));
        assert_eq!(input.min_p2p_amount, dec!(3500));
        assert_eq!(input.eur_amount, dec!(100));
        assert_eq!(input.fee_mode, FeeMode::Flat);
        assert_eq!(input.deposit_fee_value(), Quantity::Finite(dec!(1)));
        assert!(!input.align_with_min_p2p);
        assert_eq!(input.target_currency, Currency::thb());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let input: ConversionInput = serde_json::from_str(
            r#"{"eur_amount": "250", "fee_mode": "percentage", "deposit_fee": "0.5", "target_currency": "php"}"#,
        )
        .unwrap();

        assert_eq!(input.eur_amount, dec!(250));
        assert!(input.fee_mode.is_percentage());
        assert_eq!(input.deposit_fee_value(), Quantity::Finite(dec!(0.5)));
        assert_eq!(input.target_currency.code(), "PHP");
        assert_eq!(input.eur_usdc_rate, dec!(1.05));
    }

    #[test]
    fn test_apply_market_rates() {
        let mut input = ConversionInput::default();
        input.apply_market_rates(&MarketRates {
            eur_usd: dec!(1.09),
            eur_target: dec!(38.10),
            usd_target: dec!(34.95),
        });

        assert_eq!(input.eur_usd_rate, dec!(1.09));
        assert_eq!(input.eur_target_rate, dec!(38.10));
        assert_eq!(input.usd_target_rate, dec!(34.95));
        assert_eq!(input.eur_usdc_rate, dec!(1.05));
    }

    #[test]
    fn test_unparsable_fee_is_nan() {
        let input = ConversionInput::default().with_deposit_fee("free", FeeMode::Flat);
        assert!(input.deposit_fee_value().is_nan());
    }
}
