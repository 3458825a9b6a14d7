//! Calculation results.

use p2pcalc_common::{Currency, Quantity};
use serde::{Deserialize, Serialize};

/// Intermediate figures of one calculation, each rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// EUR amount actually converted (the aligned amount when aligning).
    pub eur_amount: Quantity,
    /// Deposit fee in EUR.
    pub deposit_fee: Quantity,
    pub eur_after_fee: Quantity,
    pub usdc_equivalent: Quantity,
    pub min_usdc_required: Quantity,
    /// Minimum EUR before the deposit fee.
    pub min_eur_required: Quantity,
    /// Target amount from a direct exchange at the market rate.
    pub direct_amount: Quantity,
}

/// Everything the calculator displays for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub target_currency: Currency,
    /// Target currency received through the P2P route.
    pub target_received: Quantity,
    /// Smallest EUR deposit, fee included, that meets the P2P minimum.
    pub min_eur_deposit: Quantity,
    /// Deposit fee in EUR.
    pub total_fees: Quantity,
    /// P2P yield minus direct-exchange yield, in target units.
    pub profit_loss: Quantity,
    /// Target units received per EUR.
    pub effective_rate: Quantity,
    /// EUR amount to write back into the form when aligning with the P2P
    /// minimum.
    pub recommended_eur_amount: Option<Quantity>,
    pub breakdown: Breakdown,
}

impl ConversionOutcome {
    /// Whether the P2P route beats or matches a direct exchange.
    pub fn is_profitable(&self) -> bool {
        match self.profit_loss {
            Quantity::Finite(value) => !value.is_sign_negative() || value.is_zero(),
            Quantity::PosInfinity => true,
            Quantity::NegInfinity | Quantity::NaN => false,
        }
    }

    /// Whether all four headline figures are finite.
    pub fn is_finite(&self) -> bool {
        [
            self.target_received,
            self.min_eur_deposit,
            self.total_fees,
            self.profit_loss,
        ]
        .iter()
        .all(Quantity::is_finite)
    }
}
