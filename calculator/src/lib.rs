//! P2PCalc Calculator
//!
//! Fee, minimum-deposit and profit/loss figures for converting EUR to a
//! target currency through a stablecoin P2P offer, compared against a direct
//! exchange.
//!
//! # Example
//!
//! ```rust,ignore
//! use p2pcalc_calculator::{calculate, ConversionInput, FeeMode};
//!
//! let input = ConversionInput::default().with_deposit_fee("1", FeeMode::Percentage);
//! let outcome = calculate(&input);
//! println!("{:.2} {}", outcome.target_received, outcome.target_currency);
//! ```

pub mod converter;
pub mod input;
pub mod outcome;
pub mod session;

pub use converter::calculate;
pub use input::{ConversionInput, FeeMode};
pub use outcome::{Breakdown, ConversionOutcome};
pub use session::CalculatorSession;
