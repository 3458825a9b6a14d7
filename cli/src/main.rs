//! P2PCalc CLI
//!
//! Works out what a EUR > USDC > fiat P2P exchange yields after the deposit
//! fee, and how it compares to exchanging directly.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use p2pcalc_calculator::ConversionInput;
use p2pcalc_fx::{ExchangeRateApiProvider, RateProvider, RateServiceConfig};

mod fields;
mod report;

use fields::{prepare_session, FieldArgs};
use report::{render_text, Report};

/// P2PCalc CLI
#[derive(Parser, Debug)]
#[command(name = "p2pcalc")]
#[command(about = "Binance-style P2P fee calculator: EUR > USDC > target currency")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the received amount, minimum deposit, fees and profit/loss
    Calculate(CalculateArgs),
    /// List currencies selectable as conversion target
    Currencies {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct CalculateArgs {
    /// Load field values from a JSON file; flags override it
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Seed market rates from the rate service before applying flags
    #[arg(long)]
    fetch_rates: bool,

    /// Print intermediate figures too
    #[arg(long)]
    breakdown: bool,

    /// Print inputs and outcome as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    fields: FieldArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let stderr_layer = (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json_layer = cli
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let config = RateServiceConfig::from_env();

    match cli.command {
        Command::Calculate(args) => calculate(args, config).await,
        Command::Currencies { json } => currencies(config, json).await,
    }
}

async fn calculate(args: CalculateArgs, config: RateServiceConfig) -> anyhow::Result<()> {
    let input = match &args.input {
        Some(path) => load_input(path)?,
        None => ConversionInput::default(),
    };

    let base = config.base_currency.clone();
    let provider = if args.fetch_rates {
        Some(ExchangeRateApiProvider::new(config).context("Invalid rate service configuration")?)
    } else {
        None
    };
    let mut session = prepare_session(
        input,
        &args.fields,
        provider.as_ref().map(|p| p as &dyn RateProvider),
        base,
    )
    .await;

    let outcome = session.recalculate().clone();

    if args.json {
        let report = Report {
            input: session.input(),
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(session.input(), &outcome, args.breakdown));
    }

    Ok(())
}

async fn currencies(config: RateServiceConfig, json: bool) -> anyhow::Result<()> {
    let base = config.base_currency.clone();
    let provider = ExchangeRateApiProvider::new(config).context("Invalid rate service configuration")?;

    let currencies = provider
        .supported_currencies(&base)
        .await
        .context("Failed to fetch supported currencies")?;

    if json {
        println!("{}", serde_json::to_string(&currencies)?);
    } else {
        for currency in &currencies {
            println!("{}", currency);
        }
    }

    Ok(())
}

fn load_input(path: &Path) -> anyhow::Result<ConversionInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let input = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid input file {}", path.display()))?;
    Ok(input)
}
