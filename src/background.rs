//! Background selection
//!
//! The background is either picked by hand or derived from an item's `Body`
//! attribute through the built-in body color table.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogId};
use crate::color::Color;
use crate::error::ViewerError;
use crate::metadata::{find_entry, MetadataLoad};
use crate::palettes;

/// Metadata attribute holding the body category
pub const BODY_ATTRIBUTE: &str = "Body";

/// How the current background was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Picked by the user
    #[default]
    Manual,
    /// Looked up from metadata
    Auto,
}

/// Body-derived color for `id`, if the metadata has one.
///
/// `None` when no entry matches, the entry has no `Body`, or the category is
/// not in the color table.
pub fn auto_background(id: CatalogId, metadata: &[CatalogEntry]) -> Option<Color> {
    let body = find_entry(metadata, id)?.attribute(BODY_ATTRIBUTE)?;
    palettes::body_color(body)
}

/// Like [`auto_background`] but tells an unloaded table apart from a miss.
pub fn resolve_auto_background(id: CatalogId, load: &MetadataLoad) -> Result<Color, ViewerError> {
    if !load.succeeded {
        return Err(ViewerError::MetadataUnavailable);
    }
    auto_background(id, &load.entries).ok_or(ViewerError::BackgroundNotFound(id))
}

/// A hand-picked background; no metadata involved.
pub fn manual_background(color: Color) -> Color {
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::parse_metadata;

    fn table() -> Vec<CatalogEntry> {
        parse_metadata(
            br#"[
                {"id": 1, "attributes": {"Body": "Gold"}},
                {"id": 2, "attributes": {"Body": "Unknown"}},
                {"id": 3, "attributes": {"Hat": "Santa"}},
                {"id": 4, "attributes": {"Body": "ZOMBIE"}}
            ]"#,
        )
        .unwrap()
    }

    fn id(n: u32) -> CatalogId {
        CatalogId::new(n).unwrap()
    }

    #[test]
    fn test_gold_body() {
        assert_eq!(auto_background(id(1), &table()).unwrap().to_string(), "#FFAA01");
    }

    #[test]
    fn test_body_lookup_is_case_insensitive() {
        assert_eq!(auto_background(id(4), &table()).unwrap().to_string(), "#104119");
    }

    #[test]
    fn test_not_found_cases() {
        let entries = table();
        assert_eq!(auto_background(id(2), &entries), None, "unknown category");
        assert_eq!(auto_background(id(3), &entries), None, "missing Body");
        assert_eq!(auto_background(id(9), &entries), None, "missing entry");
        assert_eq!(auto_background(id(1), &[]), None, "empty table");
    }

    #[test]
    fn test_resolve_distinguishes_unloaded_metadata() {
        let unloaded = MetadataLoad::default();
        assert!(matches!(
            resolve_auto_background(id(1), &unloaded),
            Err(ViewerError::MetadataUnavailable)
        ));

        let loaded = MetadataLoad {
            entries: table(),
            succeeded: true,
            source: Some("test".to_string()),
        };
        assert_eq!(resolve_auto_background(id(1), &loaded).unwrap(), Color::rgb(0xFF, 0xAA, 0x01));
        assert!(matches!(
            resolve_auto_background(id(2), &loaded),
            Err(ViewerError::BackgroundNotFound(missing)) if missing == id(2)
        ));
    }

    #[test]
    fn test_manual_background_passes_through() {
        let green = Color::rgb(0, 255, 0);
        assert_eq!(manual_background(green), green);
    }
}
