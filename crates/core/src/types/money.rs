//! Monetary amounts using decimal arithmetic.
//!
//! Prices and order totals are stored as `NUMERIC(12, 2)`. All arithmetic
//! stays in [`Decimal`] so a total is always the exact sum of its lines
//! before the final rounding to cents.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing [`Money`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Amounts are never negative in this system.
    #[error("amount cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create an amount from a count of cents.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] if `cents` is negative.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price (unrounded).
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Round to cents, midpoint away from zero.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Money::new(Decimal::from_str("-0.01").unwrap()),
            Err(MoneyError::Negative(_))
        ));
        assert!(Money::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let total: Money = [money("10.00").times(3), money("2.50").times(2)]
            .into_iter()
            .sum();
        assert_eq!(total, money("35.00"));
    }

    #[test]
    fn test_round_to_cents_midpoint_away_from_zero() {
        assert_eq!(money("0.125").round_to_cents(), money("0.13"));
        assert_eq!(money("19.994").round_to_cents(), money("19.99"));
    }

    #[test]
    fn test_display_has_two_decimals() {
        assert_eq!(money("30").to_string(), "30.00");
        assert_eq!(Money::from_cents(1999).unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Money>("\"-5\"").is_err());
        assert_eq!(serde_json::from_str::<Money>("\"5.25\"").unwrap(), money("5.25"));
    }

    #[test]
    fn test_deserialize_request_body_price() {
        #[derive(Debug, Deserialize)]
        struct Body {
            price: Money,
        }

        let body: Body = serde_json::from_str(r#"{"price": "10.00"}"#).unwrap();
        assert_eq!(body.price, money("10.00"));
        assert_eq!(body.price.to_string(), "10.00");

        let err = serde_json::from_str::<Body>(r#"{"price": "-1"}"#).unwrap_err();
        assert!(err.to_string().contains("negative"));
    }
}
