//! Form fields as command-line flags.

use std::str::FromStr;

use clap::Args;
use p2pcalc_calculator::{CalculatorSession, ConversionInput, FeeMode};
use p2pcalc_common::{round_cents, Currency};
use p2pcalc_fx::RateProvider;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// One flag per calculator field. Unset flags leave the field unchanged.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Target currency code
    #[arg(short, long)]
    pub target: Option<String>,

    /// Current EUR > USD rate
    #[arg(long, value_parser = parse_amount)]
    pub eur_usd_rate: Option<Decimal>,

    /// Current EUR > target rate
    #[arg(long, value_parser = parse_amount)]
    pub eur_target_rate: Option<Decimal>,

    /// Current USD > target rate
    #[arg(long, value_parser = parse_amount)]
    pub usd_target_rate: Option<Decimal>,

    /// Deposit fee, a EUR amount or a percentage with --fee-percentage
    #[arg(long, allow_hyphen_values = true)]
    pub deposit_fee: Option<String>,

    /// Treat the deposit fee as a percentage of the EUR amount (`=false` for a flat fee)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub fee_percentage: Option<bool>,

    /// EUR > USDC rate of the deposit
    #[arg(long, value_parser = parse_amount)]
    pub eur_usdc_rate: Option<Decimal>,

    /// Best USDC > target P2P offer
    #[arg(long, value_parser = parse_amount)]
    pub usdc_target_rate: Option<Decimal>,

    /// Minimum amount of the P2P offer, in target currency
    #[arg(long, value_parser = parse_amount)]
    pub min_p2p_amount: Option<Decimal>,

    /// EUR amount to exchange
    #[arg(short, long, value_parser = parse_amount)]
    pub eur_amount: Option<Decimal>,

    /// Align the EUR amount with the minimum P2P offer (`=false` to turn off)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub align: Option<bool>,
}

impl FieldArgs {
    /// Write every set flag into `input`.
    pub fn apply(&self, input: &mut ConversionInput) {
        if let Some(target) = &self.target {
            input.target_currency = Currency::new(target.as_str());
        }
        set(&mut input.eur_usd_rate, self.eur_usd_rate);
        set(&mut input.eur_target_rate, self.eur_target_rate);
        set(&mut input.usd_target_rate, self.usd_target_rate);
        if let Some(fee) = &self.deposit_fee {
            input.deposit_fee = fee.clone();
        }
        if let Some(percentage) = self.fee_percentage {
            input.fee_mode = FeeMode::from_percentage_flag(percentage);
        }
        set(&mut input.eur_usdc_rate, self.eur_usdc_rate);
        set(&mut input.usdc_target_rate, self.usdc_target_rate);
        set(&mut input.min_p2p_amount, self.min_p2p_amount);
        set(&mut input.eur_amount, self.eur_amount);
        if let Some(align) = self.align {
            input.align_with_min_p2p = align;
        }
    }

    /// Whether any market-rate flag was given.
    pub fn overrides_market_rates(&self) -> bool {
        self.eur_usd_rate.is_some() || self.eur_target_rate.is_some() || self.usd_target_rate.is_some()
    }
}

/// Build a session from loaded `input`.
///
/// Layers apply in order: `input` (defaults or a file), then rates fetched
/// from `provider` against `base`, then the flags. Flags are applied before
/// the fetch too so that `--target` selects the currency to fetch.
pub async fn prepare_session(
    input: ConversionInput,
    fields: &FieldArgs,
    provider: Option<&dyn RateProvider>,
    base: Currency,
) -> CalculatorSession {
    let mut session = CalculatorSession::new(input).with_base_currency(base);
    fields.apply(session.input_mut());

    if let Some(provider) = provider {
        session.load_currencies(provider).await;

        let target = session.input().target_currency.clone();
        let supported = session.supported_currencies();
        if !supported.is_empty() && !supported.contains(&target) {
            warn!(target = %target, "Target currency is not offered by the rate service");
        }

        session.refresh_rates(provider).await;
        if fields.overrides_market_rates() {
            info!("Market rate flags override fetched rates");
        }
        fields.apply(session.input_mut());
    }

    session
}

fn set(field: &mut Decimal, value: Option<Decimal>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Numeric field entry: a decimal rounded to cents.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let s = s.trim();
    let parsed = if s.contains(['e', 'E']) {
        Decimal::from_scientific(s)
    } else {
        Decimal::from_str(s)
    };
    parsed
        .map(round_cents)
        .map_err(|e| format!("'{}' is not a decimal number: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2pcalc_fx::MockRateProvider;
    use rust_decimal_macros::dec;

    fn provider() -> MockRateProvider {
        let provider = MockRateProvider::new("test");
        provider.set_rate(Currency::eur(), Currency::usd(), dec!(1.0842));
        provider.set_rate(Currency::eur(), Currency::thb(), dec!(37.6512));
        provider.set_rate(Currency::eur(), Currency::new("PHP"), dec!(63.2049));
        provider
    }

    fn file_input() -> ConversionInput {
        serde_json::from_str(
            r#"{"eur_amount": "250", "eur_target_rate": "36.00", "usdc_target_rate": "35.40"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_amount_rounds_to_cents() {
        assert_eq!(parse_amount("1.0842").unwrap(), dec!(1.08));
        assert_eq!(parse_amount(" 35 ").unwrap(), dec!(35));
        assert_eq!(parse_amount("1.005").unwrap(), dec!(1.01));
        assert_eq!(parse_amount("3.5e3").unwrap(), dec!(3500));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_apply_only_set_fields() {
        let fields = FieldArgs {
            target: Some("php".to_string()),
            eur_amount: Some(dec!(250)),
            fee_percentage: Some(true),
            ..Default::default()
        };
        let mut input = ConversionInput::default();

        fields.apply(&mut input);

        assert_eq!(input.target_currency.code(), "PHP");
        assert_eq!(input.eur_amount, dec!(250));
        assert_eq!(input.fee_mode, FeeMode::Percentage);
        assert_eq!(input.deposit_fee, "1");
        assert_eq!(input.eur_usdc_rate, dec!(1.05));
        assert!(!input.align_with_min_p2p);
        assert!(!fields.overrides_market_rates());
    }

    #[test]
    fn test_apply_turns_switches_off() {
        let mut input = ConversionInput::default()
            .with_deposit_fee("2", FeeMode::Percentage)
            .aligned();
        let fields = FieldArgs {
            fee_percentage: Some(false),
            align: Some(false),
            ..Default::default()
        };

        fields.apply(&mut input);

        assert_eq!(input.fee_mode, FeeMode::Flat);
        assert!(!input.align_with_min_p2p);
        assert_eq!(input.deposit_fee, "2");
    }

    #[test]
    fn test_switch_flags_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cmd {
            #[command(flatten)]
            fields: FieldArgs,
        }

        let cmd = Cmd::try_parse_from(["p2pcalc", "--fee-percentage", "--align=false"]).unwrap();
        assert_eq!(cmd.fields.fee_percentage, Some(true));
        assert_eq!(cmd.fields.align, Some(false));

        let cmd = Cmd::try_parse_from(["p2pcalc", "--fee-percentage=false"]).unwrap();
        assert_eq!(cmd.fields.fee_percentage, Some(false));
        assert_eq!(cmd.fields.align, None);
    }

    #[tokio::test]
    async fn test_input_file_overrides_defaults() {
        let session =
            prepare_session(file_input(), &FieldArgs::default(), None, Currency::eur()).await;

        let input = session.input();
        assert_eq!(input.eur_amount, dec!(250));
        assert_eq!(input.eur_target_rate, dec!(36.00));
        assert_eq!(input.usdc_target_rate, dec!(35.40));
        assert_eq!(input.eur_usd_rate, dec!(1.08));
    }

    #[tokio::test]
    async fn test_fetched_rates_override_input_file() {
        let provider = provider();

        let session = prepare_session(
            file_input(),
            &FieldArgs::default(),
            Some(&provider),
            Currency::eur(),
        )
        .await;

        let input = session.input();
        assert_eq!(input.eur_target_rate, dec!(37.65));
        assert_eq!(input.usd_target_rate, dec!(34.73));
        // Not a market rate, so the file value stands.
        assert_eq!(input.usdc_target_rate, dec!(35.40));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_flags_override_fetched_rates() {
        let provider = provider();
        let fields = FieldArgs {
            target: Some("php".to_string()),
            eur_target_rate: Some(dec!(64.00)),
            ..Default::default()
        };

        let session =
            prepare_session(file_input(), &fields, Some(&provider), Currency::eur()).await;

        let input = session.input();
        assert_eq!(input.target_currency.code(), "PHP");
        assert_eq!(input.eur_target_rate, dec!(64.00));
        // Fetched for PHP: 63.2049 / 1.0842
        assert_eq!(input.usd_target_rate, dec!(58.30));
        assert_eq!(input.eur_amount, dec!(250));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_file_rates() {
        let provider = provider();
        provider.set_failing(true);

        let session = prepare_session(
            file_input(),
            &FieldArgs::default(),
            Some(&provider),
            Currency::eur(),
        )
        .await;

        assert_eq!(session.input().eur_target_rate, dec!(36.00));
        assert_eq!(provider.calls(), 2);
    }
}
