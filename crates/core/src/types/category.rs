//! Grocery item categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known [`ItemCategory`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown item category: {0}")]
pub struct CategoryError(pub String);

/// Aisle an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Produce,
    Deli,
    Bakery,
    Pantry,
    Frozen,
    #[default]
    Other,
}

impl ItemCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Produce,
        Self::Deli,
        Self::Bakery,
        Self::Pantry,
        Self::Frozen,
        Self::Other,
    ];

    /// Stable identifier used in forms and the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Produce => "produce",
            Self::Deli => "deli",
            Self::Bakery => "bakery",
            Self::Pantry => "pantry",
            Self::Frozen => "frozen",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Produce => "Produce",
            Self::Deli => "Deli",
            Self::Bakery => "Bakery",
            Self::Pantry => "Pantry",
            Self::Frozen => "Frozen",
            Self::Other => "Other",
        }
    }

    /// Parse a category identifier (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `CategoryError` if the input does not name a category.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CategoryError(needle.to_owned()))
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for ItemCategory {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ItemCategory {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ItemCategory {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_category() {
        for category in ItemCategory::ALL {
            assert_eq!(ItemCategory::parse(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ItemCategory::parse("PRODUCE").unwrap(), ItemCategory::Produce);
        assert_eq!(ItemCategory::parse(" Deli ").unwrap(), ItemCategory::Deli);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            ItemCategory::parse("hardware"),
            Err(CategoryError("hardware".to_owned()))
        );
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&ItemCategory::Frozen).unwrap();
        assert_eq!(json, "\"frozen\"");
    }
}
