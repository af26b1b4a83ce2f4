//! Menu prices.
//!
//! Prices are whole currency units (Argentine pesos) stored as `BIGINT`.
//! There is no minor-unit handling: menus quote `$8.500`, never cents.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when reading a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input has no digits at all.
    #[error("price is required")]
    Empty,
    /// The digits do not fit in the stored integer.
    #[error("price is too large")]
    TooLarge,
    /// Negative amounts are not allowed.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative price in whole currency units.
///
/// `Display` renders the public format: a literal `$` followed by the
/// amount grouped in thousands with `.` (es-AR style).
///
/// ```
/// use qresto_core::Price;
///
/// assert_eq!(Price::new(8500).unwrap().to_string(), "$8.500");
/// assert_eq!(Price::parse_input("12.300").unwrap().amount(), 12_300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(i64);

impl Price {
    /// Create a price from a whole amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for amounts below zero.
    pub const fn new(amount: i64) -> Result<Self, PriceError> {
        if amount < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Read a price typed into the dashboard.
    ///
    /// The price field shows grouped thousands as the owner types
    /// (`12.300`), so every non-digit character is discarded before parsing.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Empty` if no digit is present and
    /// `PriceError::TooLarge` if the number overflows.
    pub fn parse_input(input: &str) -> Result<Self, PriceError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(PriceError::Empty);
        }
        digits
            .parse::<i64>()
            .map(Self)
            .map_err(|_| PriceError::TooLarge)
    }

    /// Like [`Price::parse_input`], but blank input means "no price".
    ///
    /// Used for the optional pre-tax price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::TooLarge` if the number overflows.
    pub fn parse_optional_input(input: &str) -> Result<Option<Self>, PriceError> {
        match Self::parse_input(input) {
            Ok(price) => Ok(Some(price)),
            Err(PriceError::Empty) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The whole amount.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// The amount grouped in thousands with `.`, without the `$` prefix.
    #[must_use]
    pub fn grouped(&self) -> String {
        let digits = self.0.to_string();
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push('.');
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.grouped())
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
