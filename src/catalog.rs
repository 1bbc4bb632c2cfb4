//! Catalog identifiers, output resolutions and metadata rows
//!
//! Every id a user types goes through [`validate`] before anything else
//! happens; resolution input goes through [`validate_resolution`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest valid catalog id
pub const CATALOG_MIN: u32 = 1;
/// Highest valid catalog id
pub const CATALOG_MAX: u32 = 10000;

/// Smallest output resolution (the native sprite edge)
pub const RESOLUTION_MIN: u32 = 28;
/// Upper bound for output resolution
pub const RESOLUTION_MAX: u32 = 1200;
/// Output resolutions must be whole multiples of the native sprite edge
pub const RESOLUTION_STEP: u32 = 28;
/// Output resolution a fresh session starts with
pub const DEFAULT_RESOLUTION: u32 = 560;

/// Rejected user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing was entered
    #[error("enter an ID between 1-10000")]
    Empty,
    /// Input is not a base-10 integer
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    /// Id parsed but lies outside the catalog
    #[error("ID {0} is outside 1-10000")]
    IdOutOfRange(i64),
    /// Resolution parsed but lies outside the allowed bounds
    #[error("resolution {0}px is outside 28-1200px")]
    ResolutionOutOfRange(i64),
    /// Resolution is in bounds but not on a step boundary
    #[error("resolution {0}px is not a multiple of 28px")]
    ResolutionStep(u32),
}

/// A validated catalog id in `[1, 10000]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CatalogId(u32);

impl CatalogId {
    /// Wrap a number, checking the catalog bounds.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if (CATALOG_MIN..=CATALOG_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::IdOutOfRange(i64::from(value)))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CatalogId {
    fn default() -> Self {
        Self(CATALOG_MIN)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CatalogId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

/// An output edge length in pixels, `[28, 1200]` in steps of 28
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Resolution(u32);

impl Resolution {
    /// Wrap a pixel count, checking bounds and step.
    pub fn new(px: u32) -> Result<Self, ValidationError> {
        if !(RESOLUTION_MIN..=RESOLUTION_MAX).contains(&px) {
            return Err(ValidationError::ResolutionOutOfRange(i64::from(px)));
        }
        if (px - RESOLUTION_MIN) % RESOLUTION_STEP != 0 {
            return Err(ValidationError::ResolutionStep(px));
        }
        Ok(Self(px))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self(DEFAULT_RESOLUTION)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_resolution(s)
    }
}

fn parse_integer(input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))
}

/// Validate free-text id input.
///
/// Accepts a base-10 integer (surrounding whitespace ignored) in
/// `[1, 10000]`.
///
/// # Examples
///
/// ```
/// use santa_viewer::catalog::{validate, ValidationError};
///
/// assert_eq!(validate("42").unwrap().get(), 42);
/// assert_eq!(validate("10001"), Err(ValidationError::IdOutOfRange(10001)));
/// assert!(matches!(validate("4x"), Err(ValidationError::NotANumber(_))));
/// ```
pub fn validate(input: &str) -> Result<CatalogId, ValidationError> {
    let value = parse_integer(input)?;
    u32::try_from(value)
        .ok()
        .filter(|v| (CATALOG_MIN..=CATALOG_MAX).contains(v))
        .map(CatalogId)
        .ok_or(ValidationError::IdOutOfRange(value))
}

/// Validate free-text resolution input.
pub fn validate_resolution(input: &str) -> Result<Resolution, ValidationError> {
    let value = parse_integer(input)?;
    let px = u32::try_from(value).map_err(|_| ValidationError::ResolutionOutOfRange(value))?;
    Resolution::new(px)
}

/// One row of the collection metadata table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    /// Inscription number, when the table carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inscription: Option<i64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl CatalogEntry {
    /// Lenient conversion from one raw metadata row.
    ///
    /// Rows without an integer `id` are rejected. A non-integer
    /// `inscription` is dropped, and only string-valued attributes are kept.
    pub fn from_value(row: &Value) -> Option<Self> {
        let id = row.get("id")?.as_u64().and_then(|id| u32::try_from(id).ok())?;
        let inscription = row.get("inscription").and_then(Value::as_i64);
        let attributes = row
            .get("attributes")
            .and_then(Value::as_object)
            .map(|attrs| {
                attrs
                    .iter()
                    .filter_map(|(name, value)| Some((name.clone(), value.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id,
            inscription,
            attributes,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_full_range() {
        for n in [1u32, 2, 42, 999, 5000, 9999, 10000] {
            let id = validate(&n.to_string()).unwrap();
            assert_eq!(id.get(), n);
        }
    }

    #[test]
    fn test_validate_every_catalog_id() {
        for n in CATALOG_MIN..=CATALOG_MAX {
            assert_eq!(validate(&n.to_string()).map(CatalogId::get), Ok(n));
        }
    }

    #[test]
    fn test_validate_trims_whitespace() {
        assert_eq!(validate("  7 ").unwrap().get(), 7);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert_eq!(validate("0"), Err(ValidationError::IdOutOfRange(0)));
        assert_eq!(validate("10001"), Err(ValidationError::IdOutOfRange(10001)));
        assert_eq!(validate("-3"), Err(ValidationError::IdOutOfRange(-3)));
    }

    #[test]
    fn test_validate_rejects_non_numeric() {
        assert_eq!(validate(""), Err(ValidationError::Empty));
        assert_eq!(validate("   "), Err(ValidationError::Empty));
        for bad in ["abc", "4.2", "42abc", "0x10", "1e3", "99999999999999999999"] {
            assert!(
                matches!(validate(bad), Err(ValidationError::NotANumber(_))),
                "'{}' should be rejected as non-numeric",
                bad
            );
        }
    }

    #[test]
    fn test_catalog_id_new_bounds() {
        assert!(CatalogId::new(1).is_ok());
        assert!(CatalogId::new(10000).is_ok());
        assert!(CatalogId::new(0).is_err());
        assert!(CatalogId::new(10001).is_err());
    }

    #[test]
    fn test_resolution_steps() {
        for px in [28u32, 56, 280, 560, 1176] {
            assert_eq!(Resolution::new(px).unwrap().get(), px);
        }
        assert_eq!(Resolution::new(0), Err(ValidationError::ResolutionOutOfRange(0)));
        assert_eq!(Resolution::new(27), Err(ValidationError::ResolutionOutOfRange(27)));
        assert_eq!(Resolution::new(29), Err(ValidationError::ResolutionStep(29)));
        assert_eq!(Resolution::new(1200), Err(ValidationError::ResolutionStep(1200)));
        assert_eq!(Resolution::new(1204), Err(ValidationError::ResolutionOutOfRange(1204)));
    }

    #[test]
    fn test_validate_resolution_text() {
        assert_eq!(validate_resolution("560").unwrap().get(), 560);
        assert!(matches!(validate_resolution("big"), Err(ValidationError::NotANumber(_))));
        assert_eq!(validate_resolution("-28"), Err(ValidationError::ResolutionOutOfRange(-28)));
    }

    #[test]
    fn test_display() {
        assert_eq!(CatalogId::new(42).unwrap().to_string(), "42");
        assert_eq!(Resolution::new(560).unwrap().to_string(), "560px");
    }

    #[test]
    fn test_catalog_entry_deserialize() {
        let json = r#"{"id": 42, "inscription": 12345, "attributes": {"Body": "Gold", "Hat": "Santa"}}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 42);
        assert_eq!(entry.inscription, Some(12345));
        assert_eq!(entry.attribute("Body"), Some("Gold"));
        assert_eq!(entry.attribute("Eyes"), None);
    }

    #[test]
    fn test_catalog_entry_without_optional_fields() {
        let entry: CatalogEntry = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(entry.inscription, None);
        assert!(entry.attributes.is_empty());
    }

    #[test]
    fn test_catalog_entry_from_value_keeps_string_attributes() {
        let row = serde_json::json!({
            "id": 42,
            "inscription": -5,
            "attributes": {"Body": "Gold", "Rank": 12, "Hat": null}
        });
        let entry = CatalogEntry::from_value(&row).unwrap();
        assert_eq!(entry.id, 42);
        assert_eq!(entry.inscription, Some(-5));
        assert_eq!(entry.attribute("Body"), Some("Gold"));
        assert_eq!(entry.attribute("Rank"), None);
        assert_eq!(entry.attribute("Hat"), None);
    }

    #[test]
    fn test_catalog_entry_from_value_requires_integer_id() {
        assert!(CatalogEntry::from_value(&serde_json::json!({"name": "x"})).is_none());
        assert!(CatalogEntry::from_value(&serde_json::json!({"id": "42"})).is_none());
        assert!(CatalogEntry::from_value(&serde_json::json!({"id": -1})).is_none());
        assert!(CatalogEntry::from_value(&serde_json::json!(7)).is_none());

        let entry = CatalogEntry::from_value(&serde_json::json!({"id": 9, "inscription": "n/a"})).unwrap();
        assert_eq!(entry.inscription, None);
    }
}
