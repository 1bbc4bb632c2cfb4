//! Built-in body color table.
//!
//! Maps each lowercase `Body` category of the collection to the background
//! color used by the "auto background" affordance.

use crate::color::Color;

/// Every known body category with its background color, sorted by name.
const BODY_COLORS: &[(&str, Color)] = &[
    ("albino", Color::rgb(0xBD, 0xAD, 0xAD)),
    ("alien", Color::rgb(0x04, 0xCF, 0xE7)),
    ("beak", Color::rgb(0xF8, 0xAC, 0x00)),
    ("binary", Color::rgb(0x01, 0x01, 0x01)),
    ("boned", Color::rgb(0x00, 0x00, 0x00)),
    ("bot", Color::rgb(0x48, 0x48, 0x48)),
    ("brown", Color::rgb(0x31, 0x00, 0x00)),
    ("dark", Color::rgb(0x48, 0x25, 0x10)),
    ("deathbot", Color::rgb(0x28, 0x28, 0x31)),
    ("dos", Color::rgb(0x00, 0x02, 0xA5)),
    ("gold", Color::rgb(0xFF, 0xAA, 0x01)),
    ("green", Color::rgb(0x00, 0x22, 0x05)),
    ("grey", Color::rgb(0x23, 0x2A, 0x30)),
    ("hyena", Color::rgb(0xBA, 0x88, 0x37)),
    ("ion", Color::rgb(0x06, 0x0F, 0x26)),
    ("light", Color::rgb(0xB7, 0x84, 0x4F)),
    ("medium", Color::rgb(0x94, 0x53, 0x21)),
    ("mempool", Color::rgb(0xBE, 0x0B, 0x3A)),
    ("moon", Color::rgb(0x35, 0x01, 0xBB)),
    ("patriot", Color::rgb(0x0D, 0x00, 0x60)),
    ("pepe", Color::rgb(0x12, 0x76, 0x02)),
    ("pink", Color::rgb(0xE9, 0x44, 0xCE)),
    ("purple", Color::rgb(0x38, 0x03, 0x4A)),
    ("rainbow", Color::rgb(0x00, 0x9D, 0xFF)),
    ("red", Color::rgb(0x63, 0x00, 0x01)),
    ("safemode", Color::rgb(0x00, 0x0D, 0xFF)),
    ("striped", Color::rgb(0x11, 0x06, 0x54)),
    ("underlord", Color::rgb(0x9C, 0x09, 0x01)),
    ("vhs", Color::rgb(0x06, 0x00, 0xFF)),
    ("white", Color::rgb(0xC7, 0xBC, 0xB6)),
    ("wrapped", Color::rgb(0xFF, 0xFF, 0xFF)),
    ("zombie", Color::rgb(0x10, 0x41, 0x19)),
];

/// Returns all body category names.
pub fn list_categories() -> Vec<&'static str> {
    BODY_COLORS.iter().map(|(name, _)| *name).collect()
}

/// Iterate over the whole table in name order.
pub fn body_colors() -> impl Iterator<Item = (&'static str, Color)> {
    BODY_COLORS.iter().copied()
}

/// Look up the background color for a body category.
///
/// The category is matched case-insensitively; unknown categories have no
/// color.
pub fn body_color(category: &str) -> Option<Color> {
    let key = category.to_lowercase();
    BODY_COLORS
        .binary_search_by(|(name, _)| (*name).cmp(key.as_str()))
        .ok()
        .map(|index| BODY_COLORS[index].1)
}
