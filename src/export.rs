//! PNG export and file naming

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::catalog::{CatalogId, Resolution};
use crate::error::ViewerError;

/// File name prefix of every download
pub const DEFAULT_PRODUCT: &str = "santa-nodemonke";

/// Resolutions at or above this get the `-HD` suffix
pub const DEFAULT_HD_THRESHOLD: u32 = 560;

/// How exported files are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    pub product: String,
    pub hd_threshold: u32,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            hd_threshold: DEFAULT_HD_THRESHOLD,
        }
    }
}

impl FileNaming {
    /// File name for a download.
    ///
    /// # Naming Rules
    ///
    /// | Scenario | Output |
    /// |----------|--------|
    /// | Composite below the HD threshold | `santa-nodemonke-42-280px.png` |
    /// | Composite at or above it | `santa-nodemonke-42-560px-HD.png` |
    /// | Raw passthrough (no resolution) | `santa-nodemonke-42.png` |
    pub fn file_name(&self, id: CatalogId, resolution: Option<Resolution>) -> String {
        match resolution {
            Some(res) if res.get() >= self.hd_threshold => {
                format!("{}-{}-{}px-HD.png", self.product, id, res.get())
            }
            Some(res) => format!("{}-{}-{}px.png", self.product, id, res.get()),
            None => format!("{}-{}.png", self.product, id),
        }
    }
}

/// Encode a raster as PNG.
///
/// # Errors
///
/// `EncodeFailed` for an empty raster or when the encoder refuses the data.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, ViewerError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(ViewerError::encode_failed("raster is empty"));
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(raster.as_raw(), width, height, ColorType::Rgba8)
        .map_err(|e| ViewerError::encode_failed(e.to_string()))?;

    if bytes.is_empty() {
        return Err(ViewerError::encode_failed("encoder produced no data"));
    }
    Ok(bytes)
}

/// Write `bytes` to `dir/file_name`.
///
/// The data first lands in a temporary file in the same directory which is
/// then persisted under the final name, so a failed write never leaves a
/// truncated image behind. Missing directories are created.
pub fn deliver(bytes: &[u8], dir: &Path, file_name: &str) -> Result<PathBuf, ViewerError> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let staging_dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    let mut staged = NamedTempFile::new_in(staging_dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    let path = dir.join(file_name);
    staged.persist(&path).map_err(|e| ViewerError::Io(e.error))?;
    info!(path = %path.display(), bytes = bytes.len(), "image saved");
    Ok(path)
}

/// Encode a composite and save it under `file_name` in `dir`.
pub fn export_and_deliver(raster: &RgbaImage, dir: &Path, file_name: &str) -> Result<PathBuf, ViewerError> {
    let bytes = encode_png(raster)?;
    deliver(&bytes, dir, file_name)
}
