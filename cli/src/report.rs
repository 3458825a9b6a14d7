//! Rendering of calculation results.

use std::fmt::Write;

use p2pcalc_calculator::{ConversionInput, ConversionOutcome};
use serde::Serialize;

/// Inputs and outcome of one run, for `--json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub input: &'a ConversionInput,
    pub outcome: &'a ConversionOutcome,
}

/// Human-readable result block, labeled like the calculator form.
pub fn render_text(input: &ConversionInput, outcome: &ConversionOutcome, breakdown: bool) -> String {
    let target = &outcome.target_currency;
    let mut out = String::new();

    let _ = writeln!(out, "Target currency: {}", target);
    let _ = writeln!(out, "Current EUR > USD rate: {:.2}", input.eur_usd_rate);
    let _ = writeln!(out, "Current EUR > {} rate: {:.2}", target, input.eur_target_rate);
    let _ = writeln!(out, "Current USD > {} rate: {:.2}", target, input.usd_target_rate);
    let _ = writeln!(
        out,
        "Current deposit fee: {}{}",
        input.deposit_fee,
        if input.fee_mode.is_percentage() { " %" } else { " EUR" }
    );
    let _ = writeln!(out, "EUR > USDC deposit rate: {:.2}", input.eur_usdc_rate);
    let _ = writeln!(out, "Best USDC/{} P2P offer: {:.2}", target, input.usdc_target_rate);
    let _ = writeln!(out, "Minimum P2P offer: {:.2} {}", input.min_p2p_amount, target);
    let _ = writeln!(out, "EUR amount: {:.2}", outcome.breakdown.eur_amount);
    let _ = writeln!(out);

    let _ = writeln!(out, "You will receive: {:.2} {}", outcome.target_received, target);
    let _ = writeln!(
        out,
        "Minimum EUR deposit for P2P offer: {:.2} EUR",
        outcome.min_eur_deposit
    );
    let _ = writeln!(out, "Total fees: {:.2} EUR", outcome.total_fees);
    let _ = writeln!(
        out,
        "Profit/Loss compared to direct exchange: {:.2} {}",
        outcome.profit_loss, target
    );
    let _ = writeln!(
        out,
        "Effective exchange rate: {:.2} {}/EUR",
        outcome.effective_rate, target
    );

    if breakdown {
        let b = &outcome.breakdown;
        let _ = writeln!(out);
        let _ = writeln!(out, "Deposit fee: {:.2} EUR", b.deposit_fee);
        let _ = writeln!(out, "EUR after fee: {:.2} EUR", b.eur_after_fee);
        let _ = writeln!(out, "USDC equivalent: {:.2} USDC", b.usdc_equivalent);
        let _ = writeln!(out, "Minimum USDC required: {:.2} USDC", b.min_usdc_required);
        let _ = writeln!(out, "Minimum EUR before fee: {:.2} EUR", b.min_eur_required);
        let _ = writeln!(out, "Direct exchange: {:.2} {}", b.direct_amount, target);
    }

    out
}
