//! Decimal quantities that can leave the finite domain.
//!
//! Calculator figures are exact decimals, but division by a zero rate or an
//! unparsable fee must not abort a calculation. Those cases flow through as
//! signed infinities or `NaN`, with the usual IEEE-754 rules:
//!
//! - `x / 0` is `±Infinity` (`0 / 0` is `NaN`)
//! - `Infinity - Infinity` and `Infinity * 0` are `NaN`
//! - `NaN` absorbs every operation
//!
//! Decimal overflow saturates to the infinity with the result's sign.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::QuantityParseError;
use crate::monetary::round_cents;

/// A decimal figure or one of the non-finite markers.
///
/// Equality is structural: `NaN == NaN` holds, which keeps outcomes comparable
/// in tests and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Quantity {
    Finite(Decimal),
    PosInfinity,
    NegInfinity,
    NaN,
}

impl Quantity {
    pub const ZERO: Quantity = Quantity::Finite(Decimal::ZERO);

    /// Signed infinity.
    pub fn infinity(negative: bool) -> Self {
        if negative {
            Quantity::NegInfinity
        } else {
            Quantity::PosInfinity
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Quantity::Finite(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Quantity::NaN)
    }

    /// The finite value, if any.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Quantity::Finite(value) => Some(*value),
            _ => None,
        }
    }

    /// Sign bit, including the sign of a negative zero.
    pub fn is_sign_negative(&self) -> bool {
        match self {
            Quantity::Finite(value) => value.is_sign_negative(),
            Quantity::NegInfinity => true,
            Quantity::PosInfinity | Quantity::NaN => false,
        }
    }

    /// Round a finite value to cents; non-finite values pass through.
    pub fn round_cents(self) -> Self {
        match self {
            Quantity::Finite(value) => Quantity::Finite(round_cents(value)),
            other => other,
        }
    }

    /// Read the longest numeric prefix of `input`.
    ///
    /// Leading whitespace is skipped, an optional sign is honored, and either
    /// `Infinity` or digits with an optional fraction and exponent are
    /// consumed. Anything after a valid prefix is ignored (`"1.5 EUR"` is
    /// `1.5`). Input without a numeric prefix yields `NaN`.
    pub fn parse_lenient(input: &str) -> Self {
        let s = input.trim_start();
        let bytes = s.as_bytes();

        let (negative, mut pos) = match bytes.first() {
            Some(b'-') => (true, 1),
            Some(b'+') => (false, 1),
            _ => (false, 0),
        };

        if s[pos..].starts_with("Infinity") {
            return Quantity::infinity(negative);
        }

        let int_digits = count_digits(&bytes[pos..]);
        let int_part = &s[pos..pos + int_digits];
        pos += int_digits;

        let mut frac_part = "";
        if bytes.get(pos) == Some(&b'.') {
            let frac_digits = count_digits(&bytes[pos + 1..]);
            frac_part = &s[pos + 1..pos + 1 + frac_digits];
            pos += 1 + frac_digits;
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return Quantity::NaN;
        }

        let mut mantissa = String::with_capacity(int_part.len() + frac_part.len() + 3);
        if negative {
            mantissa.push('-');
        }
        mantissa.push_str(if int_part.is_empty() { "0" } else { int_part });
        if !frac_part.is_empty() {
            mantissa.push('.');
            mantissa.push_str(frac_part);
        }

        let exponent = match bytes.get(pos) {
            Some(b'e') | Some(b'E') => parse_exponent(&s[pos + 1..]),
            _ => None,
        };

        let is_zero = int_part.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
        if is_zero {
            return Quantity::Finite(Decimal::ZERO);
        }

        match exponent {
            None | Some(0) => match Decimal::from_str(&mantissa) {
                Ok(value) => Quantity::Finite(value),
                Err(_) => Quantity::infinity(negative),
            },
            Some(exp) => match Decimal::from_scientific(&format!("{}e{}", mantissa, exp)) {
                Ok(value) => Quantity::Finite(value),
                Err(_) if exp > 0 => Quantity::infinity(negative),
                Err(_) => Quantity::Finite(Decimal::ZERO),
            },
        }
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Exponent after `e`/`E`; `None` when no digits follow, so the `e` is
/// trailing text rather than part of the number.
fn parse_exponent(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let (negative, start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let digits = count_digits(&bytes[start..]);
    if digits == 0 {
        return None;
    }
    let magnitude = s[start..start + digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity::Finite(value)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        match self {
            Quantity::Finite(value) => Quantity::Finite(-value),
            Quantity::PosInfinity => Quantity::NegInfinity,
            Quantity::NegInfinity => Quantity::PosInfinity,
            Quantity::NaN => Quantity::NaN,
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        use Quantity::*;
        match (self, rhs) {
            (NaN, _) | (_, NaN) => NaN,
            (Finite(a), Finite(b)) => a
                .checked_add(b)
                .map(Finite)
                .unwrap_or_else(|| Quantity::infinity(a.is_sign_negative())),
            (PosInfinity, NegInfinity) | (NegInfinity, PosInfinity) => NaN,
            (inf @ (PosInfinity | NegInfinity), _) | (_, inf @ (PosInfinity | NegInfinity)) => inf,
        }
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        self + (-rhs)
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        use Quantity::*;
        let negative = self.is_sign_negative() != rhs.is_sign_negative();
        match (self, rhs) {
            (NaN, _) | (_, NaN) => NaN,
            (Finite(a), Finite(b)) => a
                .checked_mul(b)
                .map(Finite)
                .unwrap_or_else(|| Quantity::infinity(negative)),
            (Finite(a), _) | (_, Finite(a)) if a.is_zero() => NaN,
            _ => Quantity::infinity(negative),
        }
    }
}

impl Div for Quantity {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        use Quantity::*;
        let negative = self.is_sign_negative() != rhs.is_sign_negative();
        match (self, rhs) {
            (NaN, _) | (_, NaN) => NaN,
            (Finite(a), Finite(b)) if b.is_zero() => {
                if a.is_zero() {
                    NaN
                } else {
                    Quantity::infinity(negative)
                }
            }
            (Finite(a), Finite(b)) => a
                .checked_div(b)
                .map(Finite)
                .unwrap_or_else(|| Quantity::infinity(negative)),
            (Finite(_), _) => Finite(Decimal::ZERO),
            (_, Finite(_)) => Quantity::infinity(negative),
            _ => NaN,
        }
    }
}

impl Add<Decimal> for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Decimal) -> Quantity {
        self + Quantity::Finite(rhs)
    }
}

impl Sub<Decimal> for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Decimal) -> Quantity {
        self - Quantity::Finite(rhs)
    }
}

impl Mul<Decimal> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Decimal) -> Quantity {
        self * Quantity::Finite(rhs)
    }
}

impl Div<Decimal> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: Decimal) -> Quantity {
        self / Quantity::Finite(rhs)
    }
}

impl fmt::Display for Quantity {
    /// Finite values honor a precision (`{:.2}`), rounding halves away from
    /// zero. Non-finite values print as `Infinity`, `-Infinity` and `NaN`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Finite(value) => {
                let value = match f.precision() {
                    Some(places) => value.round_dp_with_strategy(
                        places as u32,
                        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                    ),
                    None => *value,
                };
                fmt::Display::fmt(&value, f)
            }
            Quantity::PosInfinity => f.write_str("Infinity"),
            Quantity::NegInfinity => f.write_str("-Infinity"),
            Quantity::NaN => f.write_str("NaN"),
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityParseError;

    /// Strict parse of a complete numeric string or a non-finite marker.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "Infinity" | "+Infinity" => return Ok(Quantity::PosInfinity),
            "-Infinity" => return Ok(Quantity::NegInfinity),
            "NaN" => return Ok(Quantity::NaN),
            _ => {}
        }

        let parsed = if s.contains(['e', 'E']) {
            Decimal::from_scientific(s)
        } else {
            Decimal::from_str(s)
        };

        parsed
            .map(Quantity::Finite)
            .map_err(|_| QuantityParseError(s.to_string()))
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> String {
        quantity.to_string()
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
