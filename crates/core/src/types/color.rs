//! Restaurant brand colors.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`BrandColor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BrandColorError {
    /// Not of the form `#rrggbb`.
    #[error("brand color must be a #rrggbb hex value")]
    InvalidFormat,
}

/// A `#rrggbb` color used to theme a public menu.
///
/// Stored lowercase, so `#10B981` and `#10b981` are the same color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct BrandColor(String);

impl BrandColor {
    /// Color applied when a restaurant has not picked one.
    pub const DEFAULT: &'static str = "#10b981";

    /// Parse a hex color.
    ///
    /// # Errors
    ///
    /// Returns `BrandColorError::InvalidFormat` unless the trimmed input is
    /// `#` followed by exactly six hex digits.
    pub fn parse(s: &str) -> Result<Self, BrandColorError> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return Err(BrandColorError::InvalidFormat);
        };
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BrandColorError::InvalidFormat);
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the color as `#rrggbb`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BrandColor {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for BrandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BrandColor {
    type Err = BrandColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BrandColor {
    type Error = BrandColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BrandColor> for String {
    fn from(color: BrandColor) -> Self {
        color.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for BrandColor {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BrandColor {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s).unwrap_or_default())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for BrandColor {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(BrandColor::parse("#10B981").unwrap().as_str(), "#10b981");
        assert_eq!(BrandColor::parse(" #ff0000 ").unwrap().as_str(), "#ff0000");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["10b981", "#10b98", "#10b9811", "#zzzzzz", "", "#fff"] {
            assert_eq!(BrandColor::parse(bad), Err(BrandColorError::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn test_default() {
        assert_eq!(BrandColor::default().as_str(), BrandColor::DEFAULT);
    }
}
