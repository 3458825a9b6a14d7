//! Error types shared across the calculator crates.

use thiserror::Error;

/// A serialized quantity that is neither a decimal nor a non-finite marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid quantity: {0:?}")]
pub struct QuantityParseError(pub String);
