//! Sprite locations
//!
//! A sprite lives at `<base>/<id>.png`, where the base is either a relative
//! static-asset directory or an absolute content-host URL.

use crate::catalog::CatalogId;

/// Default static-asset directory holding the merged sprites
pub const DEFAULT_SPRITE_BASE: &str = "assets/merged";

/// Maps catalog ids to sprite URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteLocator {
    base: String,
}

impl SpriteLocator {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.len() > 1 && base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Sprite URL for an id. Never fails and never touches the network.
    ///
    /// ```
    /// use santa_viewer::catalog::CatalogId;
    /// use santa_viewer::sprite::SpriteLocator;
    ///
    /// let locator = SpriteLocator::new("https://cdn.example.com/sprites/");
    /// let id = CatalogId::new(42).unwrap();
    /// assert_eq!(locator.locate(id), "https://cdn.example.com/sprites/42.png");
    /// ```
    pub fn locate(&self, id: CatalogId) -> String {
        match self.base.as_str() {
            "" => format!("{}.png", id),
            "/" => format!("/{}.png", id),
            base => format!("{}/{}.png", base, id),
        }
    }
}

impl Default for SpriteLocator {
    fn default() -> Self {
        Self::new(DEFAULT_SPRITE_BASE)
    }
}

/// True for `http://` and `https://` URLs.
pub fn is_remote(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
