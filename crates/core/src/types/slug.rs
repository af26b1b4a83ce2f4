//! Restaurant slugs - the public key of every menu URL.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty after normalization.
    #[error("slug cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9` and `-`.
    #[error("slug may only contain lowercase letters, digits and '-' (found {0:?})")]
    InvalidChar(char),
    /// The input starts or ends with `-`, or contains `--`.
    #[error("slug cannot start or end with '-' or contain '--'")]
    MisplacedHyphen,
    /// The slug would shadow an application route.
    #[error("slug '{0}' is reserved")]
    Reserved(String),
}

/// A URL-safe restaurant identifier (`el-faro`).
///
/// Menu URLs are `/{slug}`, so a slug must never collide with the
/// first-level routes the server owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length.
    pub const MAX_LENGTH: usize = 64;

    /// First-level path segments served by the application itself.
    pub const RESERVED: &'static [&'static str] = &[
        "admin",
        "api",
        "dashboard",
        "health",
        "login",
        "logout",
        "media",
        "static",
    ];

    /// Parse an already-normalized slug, exactly as it appears in a URL.
    ///
    /// # Errors
    ///
    /// Returns a `SlugError` describing the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(c));
        }
        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::MisplacedHyphen);
        }
        if Self::RESERVED.contains(&s) {
            return Err(SlugError::Reserved(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }

    /// Normalize free-form admin input, then parse it.
    ///
    /// Trims, lowercases and turns every whitespace run into a single `-`,
    /// so `"El Faro"` becomes `el-faro`.
    ///
    /// # Errors
    ///
    /// Returns a `SlugError` if the normalized value is still invalid.
    pub fn normalize(input: &str) -> Result<Self, SlugError> {
        let normalized = input
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        Self::parse(&normalized)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Rows written before a slug became reserved must still load.
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
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
    fn test_parse_valid() {
        assert_eq!(Slug::parse("el-faro").unwrap().as_str(), "el-faro");
        assert!(Slug::parse("bar47").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn test_parse_rejects_uppercase_and_spaces() {
        assert_eq!(Slug::parse("El-Faro"), Err(SlugError::InvalidChar('E')));
        assert_eq!(Slug::parse("el faro"), Err(SlugError::InvalidChar(' ')));
    }

    #[test]
    fn test_parse_rejects_hyphen_placement() {
        assert_eq!(Slug::parse("-faro"), Err(SlugError::MisplacedHyphen));
        assert_eq!(Slug::parse("faro-"), Err(SlugError::MisplacedHyphen));
        assert_eq!(Slug::parse("el--faro"), Err(SlugError::MisplacedHyphen));
    }

    #[test]
    fn test_parse_rejects_reserved() {
        assert!(matches!(Slug::parse("admin"), Err(SlugError::Reserved(_))));
        assert!(matches!(Slug::parse("api"), Err(SlugError::Reserved(_))));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert!(matches!(
            Slug::parse(&"a".repeat(65)),
            Err(SlugError::TooLong { .. })
        ));
    }

    #[test]
    fn test_normalize_admin_input() {
        assert_eq!(Slug::normalize("El Faro").unwrap().as_str(), "el-faro");
        assert_eq!(
            Slug::normalize("  Balneario   El Faro ").unwrap().as_str(),
            "balneario-el-faro"
        );
        assert_eq!(Slug::normalize("   "), Err(SlugError::Empty));
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<Slug>("\"el-faro\"").is_ok());
        assert!(serde_json::from_str::<Slug>("\"El Faro\"").is_err());
    }
}
