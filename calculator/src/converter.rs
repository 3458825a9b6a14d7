//! The EUR > USDC > target conversion calculation.

use p2pcalc_common::Quantity;
use rust_decimal::Decimal;

use crate::input::{ConversionInput, FeeMode};
use crate::outcome::{Breakdown, ConversionOutcome};

/// Compute every displayed figure from the current inputs.
///
/// Each step is rounded to cents before the next one uses it. Nothing is
/// validated: a zero rate or an unparsable fee surfaces as `Infinity` or `NaN`
/// in the affected figures.
pub fn calculate(input: &ConversionInput) -> ConversionOutcome {
    let hundred = Quantity::from(Decimal::ONE_HUNDRED);
    let eur_usdc = Quantity::from(input.eur_usdc_rate);
    let usdc_target = Quantity::from(input.usdc_target_rate);
    let min_p2p = Quantity::from(input.min_p2p_amount);
    let fee_raw = input.deposit_fee_value();

    let eur_amount = if input.align_with_min_p2p {
        (min_p2p / (eur_usdc * usdc_target)).round_cents()
    } else {
        Quantity::from(input.eur_amount)
    };

    let deposit_fee = match input.fee_mode {
        FeeMode::Percentage => (eur_amount * fee_raw / hundred).round_cents(),
        FeeMode::Flat => fee_raw,
    };

    // The fee is not clamped; a fee above the amount goes negative.
    let eur_after_fee = (eur_amount - deposit_fee).round_cents();
    let usdc_equivalent = (eur_after_fee * eur_usdc).round_cents();
    let target_received = (usdc_equivalent * usdc_target).round_cents();

    let min_usdc_required = (min_p2p / usdc_target).round_cents();
    let min_eur_required = (min_usdc_required / eur_usdc).round_cents();
    // Uses the fee as typed, not the amount-dependent fee above.
    let min_eur_deposit = match input.fee_mode {
        FeeMode::Percentage => {
            let kept_share = Quantity::from(Decimal::ONE) - fee_raw / hundred;
            (min_eur_required / kept_share).round_cents()
        }
        FeeMode::Flat => (min_eur_required + fee_raw).round_cents(),
    };

    let total_fees = deposit_fee.round_cents();
    let direct_amount = (eur_amount * input.eur_target_rate).round_cents();
    let profit_loss = (target_received - direct_amount).round_cents();
    let effective_rate = (target_received / eur_amount).round_cents();

    ConversionOutcome {
        target_currency: input.target_currency.clone(),
        target_received,
        min_eur_deposit,
        total_fees,
        profit_loss,
        effective_rate,
        recommended_eur_amount: input.align_with_min_p2p.then_some(eur_amount),
        breakdown: Breakdown {
            eur_amount,
            deposit_fee,
            eur_after_fee,
            usdc_equivalent,
            min_usdc_required,
            min_eur_required,
            direct_amount,
        },
    }
}
