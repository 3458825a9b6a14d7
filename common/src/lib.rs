//! P2PCalc Common Types
//!
//! Shared types for the P2P fee calculator: currency codes, two-decimal
//! rounding, and the [`Quantity`] number type that carries non-finite results
//! through a calculation instead of failing it.

pub mod error;
pub mod monetary;
pub mod quantity;

pub use error::*;
pub use monetary::*;
pub use quantity::*;
