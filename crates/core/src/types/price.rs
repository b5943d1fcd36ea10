//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as decimal strings so no binary floating point rounding
//! ever touches a stored amount.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price is required")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more than two decimal places.
    #[error("price can have at most {max} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places.
        max: u32,
    },
}

/// A non-negative price with at most two decimal places.
///
/// ## Examples
///
/// ```
/// use grocery_core::Price;
///
/// let price = Price::parse("3.5").unwrap();
/// assert_eq!(price.to_string(), "3.50");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("1.999").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Maximum number of decimal places accepted.
    pub const MAX_SCALE: u32 = 2;

    /// Create a price from an amount, validating sign and scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or has more than two decimal places.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let normalized = amount.normalize();
        if normalized.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise {
                max: Self::MAX_SCALE,
            });
        }

        Ok(Self(normalized))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), Self::MAX_SCALE).normalize())
    }

    /// Parse a price from user input such as `"3.50"` or `"3"`.
    ///
    /// A leading `$` and surrounding whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, negative, or too precise.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Value suitable for pre-filling a form field (e.g. `"3.50"`).
    #[must_use]
    pub fn to_input_value(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with sqlite feature). Stored as TEXT to keep decimal precision.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.to_input_value(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(Price::parse("3.50").unwrap(), Price::from_cents(350));
        assert_eq!(Price::parse("3.5").unwrap(), Price::from_cents(350));
        assert_eq!(Price::parse("3").unwrap(), Price::from_cents(300));
        assert_eq!(Price::parse(" $0.99 ").unwrap(), Price::from_cents(99));
        assert_eq!(Price::parse("0").unwrap(), Price::from_cents(0));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("  $ "), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert_eq!(Price::parse("cheap"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("1,50"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_too_precise() {
        assert!(matches!(
            Price::parse("1.999"),
            Err(PriceError::TooPrecise { max: 2 })
        ));
        // Trailing zeros beyond two places are not extra precision
        assert_eq!(Price::parse("1.5000").unwrap(), Price::from_cents(150));
    }

    #[test]
    fn test_display_always_two_places() {
        assert_eq!(Price::from_cents(350).to_string(), "3.50");
        assert_eq!(Price::from_cents(1200).to_string(), "12.00");
        assert_eq!(Price::from_cents(5).to_input_value(), "0.05");
    }
}
