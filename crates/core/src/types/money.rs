//! Minor-unit money representation.
//!
//! Monetary amounts are stored as an integer count of minor units (cents)
//! to avoid floating-point rounding error. Conversion from a decimal
//! major-unit input (dollars) happens exactly once, at the mutation
//! boundary, and is never re-applied on read.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when converting into [`Money`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount does not fit into an i64 count of minor units.
    #[error("amount out of range")]
    OutOfRange,
}

/// A monetary amount in minor units (cents).
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use ledgerline_core::Money;
///
/// let money = Money::from_major(Decimal::new(1999, 2)).unwrap(); // $19.99
/// assert_eq!(money.minor_units(), 1999);
/// assert_eq!(money.display(), "$19.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero minor units.
    pub const ZERO: Self = Self(0);

    /// Wrap an existing minor-unit amount.
    #[must_use]
    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Convert a major-unit decimal amount (dollars) into minor units.
    ///
    /// Multiplies by 100 and rounds to the nearest integer (midpoints
    /// round away from zero, matching everyday currency arithmetic).
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::OutOfRange` if the result does not fit in i64.
    pub fn from_major(amount: Decimal) -> Result<Self, MoneyError> {
        let minor = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::OutOfRange)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(MoneyError::OutOfRange)?;
        Ok(Self(minor))
    }

    /// The raw minor-unit count. Preserved for any computation.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// The major-unit decimal value (scale 2).
    #[must_use]
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Render as a human-readable USD currency string, e.g. `$1,234.56`.
    ///
    /// For display only; arithmetic always uses [`Self::minor_units`].
    #[must_use]
    pub fn display(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = abs / 100;
        let cents = abs % 100;

        // Group the dollar digits in threes, right to left.
        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i).is_multiple_of(3) {
                grouped.push(',');
            }
            grouped.push(c);
        }

        format!("{sign}${grouped}.{cents:02}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i64> for Money {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let minor = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(minor))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_whole_dollars() {
        let money = Money::from_major(Decimal::from(5)).unwrap();
        assert_eq!(money.minor_units(), 500);
    }

    #[test]
    fn test_from_major_rounds_to_nearest_cent() {
        // $12.345 -> 1235 cents (midpoint away from zero)
        let money = Money::from_major(Decimal::new(12_345, 3)).unwrap();
        assert_eq!(money.minor_units(), 1235);

        // $12.344 -> 1234 cents
        let money = Money::from_major(Decimal::new(12_344, 3)).unwrap();
        assert_eq!(money.minor_units(), 1234);
    }

    #[test]
    fn test_from_major_out_of_range() {
        assert_eq!(Money::from_major(Decimal::MAX), Err(MoneyError::OutOfRange));
    }

    #[test]
    fn test_to_major_round_trip() {
        let money = Money::from_minor(1999);
        assert_eq!(money.to_major(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_minor(0).display(), "$0.00");
        assert_eq!(Money::from_minor(5).display(), "$0.05");
        assert_eq!(Money::from_minor(1999).display(), "$19.99");
        assert_eq!(Money::from_minor(123_456).display(), "$1,234.56");
        assert_eq!(Money::from_minor(100_000_000).display(), "$1,000,000.00");
        assert_eq!(Money::from_minor(-1999).display(), "-$19.99");
    }

    #[test]
    fn test_serde_transparent() {
        let money = Money::from_minor(1999);
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "1999");
    }
}
