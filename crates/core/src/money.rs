use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;
use thiserror::Error;

/// Signed monetary amount held as an exact decimal.
///
/// The scale the value was parsed with is preserved, so `-2000.00` displays
/// as `-2000.00` and never as `-2000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("not a decimal amount: {0:?}")]
    Invalid(String),
    #[error("amount {0:?} exceeds the supported magnitude")]
    OutOfRange(String),
}

impl Amount {
    /// One hundredth of a currency unit.
    pub const CENT: Amount = Amount(Decimal::from_parts(1, 0, 0, false, 2));

    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, 2))
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Amount(self.0.abs())
    }

    pub fn round_dp(self, dp: u32) -> Self {
        Amount(self.0.round_dp(dp))
    }

    /// Largest accepted magnitude (10^27). The difference of any two parsed
    /// amounts stays well inside `Decimal`'s range.
    pub fn max_magnitude() -> Decimal {
        Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000_000_000, 0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Amount(self.0 - rhs.0)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts plain decimals, thousands separators, a currency sign and
    /// accounting parentheses for negatives: `1,234.56`, `$99.99`, `(75.25)`.
    /// A comma anywhere but between groups of three integer digits is
    /// rejected, so decimal-comma values like `-45,90` never parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParseAmountError::Invalid(s.to_string());
        let (negative, body) = match s.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            Some(inner) => (true, inner),
            None => (false, s),
        };
        let cleaned = body.replace(['$', ' '], "");
        if cleaned.contains(',') && !has_valid_grouping(&cleaned) {
            return Err(invalid());
        }
        let value = Decimal::from_str(&cleaned.replace(',', "")).map_err(|_| invalid())?;
        if value.abs() > Amount::max_magnitude() {
            return Err(ParseAmountError::OutOfRange(s.to_string()));
        }
        Ok(Amount(if negative { -value } else { value }))
    }
}

/// `1,234,567.89`: one to three leading digits, then groups of exactly three.
fn has_valid_grouping(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return false;
    }

    let mut groups = int_part.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    first_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}
