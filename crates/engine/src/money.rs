use std::{fmt, str::FromStr};

use crate::EngineError;

/// Monetary amount represented as **integer minor units** (cents).
///
/// Use this type at the edges (CSV cells, CLI arguments) to turn decimal
/// strings into the `amount_minor` values the engine stores; never carry
/// floating point money around.
///
/// Parsed input is unsigned: the direction of a transaction is expressed by
/// its kind (`income`/`outcome`), not by the sign of the amount. The inner
/// value is still signed so derived totals (which can go below zero) render
/// through the same type.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("1500".parse::<Amount>().unwrap().minor(), 150_000);
/// assert_eq!("50.50".parse::<Amount>().unwrap().minor(), 5050);
/// assert!("12.345".parse::<Amount>().is_err());
/// assert_eq!(Amount::new(-1050).to_string(), "-10.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses an unsigned decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects signs, empty and non-numeric strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') || trimmed.starts_with('+') {
            return Err(EngineError::InvalidAmount(
                "amount must be unsigned".to_string(),
            ));
        }

        let normalized = trimmed.replace(',', ".");
        let mut parts = normalized.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(Amount(total))
    }
}
