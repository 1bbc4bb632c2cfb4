//! Sprite compositing
//!
//! Draws a decoded sprite over a solid background at a square output size.
//! Scaling is nearest-neighbor only: the source sprites are 28×28 pixel art
//! and any interpolation would smear them.

use image::io::Reader as ImageReader;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use crate::color::Color;
use crate::error::ViewerError;
use crate::fetch::{Fetch, ACCEPT_PNG};

/// Largest output edge we are willing to allocate
pub const MAX_SURFACE_EDGE: u32 = 16384;

/// How strictly sprite bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Bytes must be a PNG
    StrictPng,
    /// Accept any format the decoder can sniff
    Sniff,
}

/// Decode sprite bytes to an RGBA surface at natural size.
pub fn decode_sprite(bytes: &[u8], mode: DecodeMode) -> Result<RgbaImage, ViewerError> {
    let decode_error =
        |e: image::ImageError| ViewerError::sprite_unavailable(format!("decode failed: {}", e));

    let image = match mode {
        DecodeMode::StrictPng => {
            image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(decode_error)?
        }
        DecodeMode::Sniff => ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ViewerError::sprite_unavailable(format!("unreadable sprite: {}", e)))?
            .decode()
            .map_err(decode_error)?,
    };

    let sprite = image.to_rgba8();
    if sprite.width() == 0 || sprite.height() == 0 {
        return Err(ViewerError::sprite_unavailable("sprite has no pixels"));
    }
    Ok(sprite)
}

/// Allocate a `size × size` surface filled with `background`.
pub fn background_surface(background: Color, size: u32) -> Result<RgbaImage, ViewerError> {
    if size == 0 {
        return Err(ViewerError::render_unsupported("output size must be positive"));
    }
    if size > MAX_SURFACE_EDGE {
        return Err(ViewerError::render_unsupported(format!(
            "{}px exceeds the {}px surface limit",
            size, MAX_SURFACE_EDGE
        )));
    }
    Ok(RgbaImage::from_pixel(size, size, background.to_rgba()))
}

/// Composite a sprite over a solid background.
///
/// The sprite is stretched to exactly `size × size`; each output pixel takes
/// the source pixel its center falls in. Opaque sprite pixels are
/// copied verbatim, transparent ones leave the background showing, and
/// partial alpha blends source-over.
///
/// # Errors
///
/// `RenderUnsupported` when the surface cannot be allocated.
pub fn composite(sprite: &RgbaImage, background: Color, size: u32) -> Result<RgbaImage, ViewerError> {
    if sprite.width() == 0 || sprite.height() == 0 {
        return Err(ViewerError::sprite_unavailable("sprite has no pixels"));
    }

    let mut surface = background_surface(background, size)?;
    let (sw, sh) = sprite.dimensions();

    for y in 0..size {
        let sy = sample(y, sh, size);
        for x in 0..size {
            let sx = sample(x, sw, size);
            let src = *sprite.get_pixel(sx, sy);
            let dst = surface.get_pixel_mut(x, y);
            *dst = blend_over(*dst, src);
        }
    }

    Ok(surface)
}

/// Source index under the center of output pixel `out` when `source` pixels
/// are stretched over `size`.
fn sample(out: u32, source: u32, size: u32) -> u32 {
    ((2 * u64::from(out) + 1) * u64::from(source) / (2 * u64::from(size))) as u32
}

/// Fetch a sprite, decode it as PNG, and composite it.
pub async fn composite_url<F: Fetch>(
    fetcher: &F,
    sprite_url: &str,
    background: Color,
    size: u32,
) -> Result<RgbaImage, ViewerError> {
    let bytes = fetcher
        .fetch(sprite_url, ACCEPT_PNG)
        .await
        .map_err(|e| ViewerError::sprite_unavailable(e.to_string()))?;
    let sprite = decode_sprite(&bytes, DecodeMode::StrictPng)?;
    composite(&sprite, background, size)
}

/// Source-over blend of `fg` onto `bg` in 8-bit integer math.
fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    let fa = u32::from(fg[3]);
    match fa {
        255 => return fg,
        0 => return bg,
        _ => {}
    }

    let ba = u32::from(bg[3]);
    // Output alpha scaled by 255: fa + ba * (1 - fa)
    let out_a = fa * 255 + ba * (255 - fa);
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let premul = u32::from(fg[c]) * fa * 255 + u32::from(bg[c]) * ba * (255 - fa);
        out[c] = ((premul + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeFetcher;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    /// 2x2 sprite: red, transparent / transparent, blue
    fn checker() -> RgbaImage {
        let mut sprite = RgbaImage::new(2, 2);
        sprite.put_pixel(0, 0, RED);
        sprite.put_pixel(1, 0, CLEAR);
        sprite.put_pixel(0, 1, CLEAR);
        sprite.put_pixel(1, 1, BLUE);
        sprite
    }

    /// 28x28 pixel-art sprite with a varied opaque pattern and a transparent border
    fn pixel_art() -> RgbaImage {
        RgbaImage::from_fn(28, 28, |x, y| {
            if x == 0 || y == 0 || x == 27 || y == 27 {
                CLEAR
            } else {
                Rgba([(x * 9) as u8, (y * 9) as u8, ((x + y) * 4) as u8, 255])
            }
        })
    }

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("should encode fixture");
        bytes
    }

    #[test]
    fn test_composite_fills_background_under_transparency() {
        let green = Color::rgb(0, 255, 0);
        let out = composite(&checker(), green, 4).unwrap();

        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(1, 1), RED);
        assert_eq!(*out.get_pixel(2, 0), green.to_rgba());
        assert_eq!(*out.get_pixel(3, 1), green.to_rgba());
        assert_eq!(*out.get_pixel(0, 3), green.to_rgba());
        assert_eq!(*out.get_pixel(2, 2), BLUE);
        assert_eq!(*out.get_pixel(3, 3), BLUE);
    }

    #[test]
    fn test_composite_native_size_is_pixel_exact() {
        let sprite = pixel_art();
        let out = composite(&sprite, Color::WHITE, 28).unwrap();

        for (x, y, px) in sprite.enumerate_pixels() {
            if px[3] == 255 {
                assert_eq!(out.get_pixel(x, y), px, "opaque pixel ({}, {}) changed", x, y);
            } else {
                assert_eq!(*out.get_pixel(x, y), Color::WHITE.to_rgba());
            }
        }
    }

    #[test]
    fn test_composite_upscale_uses_whole_blocks() {
        let sprite = pixel_art();
        let out = composite(&sprite, Color::rgb(0, 255, 0), 560).unwrap();
        assert_eq!(out.dimensions(), (560, 560));

        for (x, y, px) in out.enumerate_pixels() {
            let src = sprite.get_pixel(x / 20, y / 20);
            let expected = if src[3] == 255 { *src } else { Rgba([0, 255, 0, 255]) };
            assert_eq!(*px, expected, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_composite_downscale_samples_nearest() {
        let out = composite(&checker(), Color::WHITE, 1).unwrap();
        assert_eq!(*out.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_composite_uneven_scale_samples_pixel_centers() {
        let green = Rgba([0, 255, 0, 255]);
        let columns = [RED, green, BLUE];
        let sprite = RgbaImage::from_fn(3, 3, |x, _| columns[x as usize]);

        let out = composite(&sprite, Color::WHITE, 2).unwrap();
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(1, 0), BLUE);

        let out = composite(&sprite, Color::WHITE, 5).unwrap();
        let row: Vec<_> = (0..5).map(|x| *out.get_pixel(x, 2)).collect();
        assert_eq!(row, vec![RED, RED, green, BLUE, BLUE]);
    }

    #[test]
    fn test_composite_rejects_unallocatable_surface() {
        assert!(matches!(
            composite(&checker(), Color::WHITE, 0),
            Err(ViewerError::RenderUnsupported(_))
        ));
        assert!(matches!(
            composite(&checker(), Color::WHITE, MAX_SURFACE_EDGE + 1),
            Err(ViewerError::RenderUnsupported(_))
        ));
    }

    #[test]
    fn test_blend_partial_alpha_over_opaque() {
        let out = blend_over(Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 128]));
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 127);
    }

    #[test]
    fn test_blend_over_transparent_background() {
        let fg = Rgba([200, 100, 50, 128]);
        assert_eq!(blend_over(CLEAR, fg), fg);
    }

    #[test]
    fn test_decode_strict_png() {
        let bytes = png_bytes(&checker());
        let decoded = decode_sprite(&bytes, DecodeMode::StrictPng).unwrap();
        assert_eq!(decoded, checker());
    }

    #[test]
    fn test_decode_garbage_is_sprite_unavailable() {
        for mode in [DecodeMode::StrictPng, DecodeMode::Sniff] {
            assert!(matches!(
                decode_sprite(b"definitely not an image", mode),
                Err(ViewerError::SpriteUnavailable(_))
            ));
        }
    }

    #[test]
    fn test_decode_sniff_accepts_other_formats() {
        let mut bmp = Vec::new();
        image::DynamicImage::ImageRgba8(checker())
            .write_to(&mut Cursor::new(&mut bmp), ImageFormat::Bmp)
            .unwrap();

        assert!(decode_sprite(&bmp, DecodeMode::StrictPng).is_err());
        let decoded = decode_sprite(&bmp, DecodeMode::Sniff).unwrap();
        assert_eq!(decoded.dimensions(), (2, 2));
    }

    #[tokio::test]
    async fn test_composite_url_round_trip() {
        let fetcher = FakeFetcher::new().with_body("sprites/1.png", png_bytes(&checker()));
        let out = composite_url(&fetcher, "sprites/1.png", Color::WHITE, 2).await.unwrap();
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(1, 0), Color::WHITE.to_rgba());
    }

    #[tokio::test]
    async fn test_composite_url_missing_sprite() {
        let fetcher = FakeFetcher::new();
        let err = composite_url(&fetcher, "sprites/2.png", Color::WHITE, 28).await.unwrap_err();
        assert!(matches!(err, ViewerError::SpriteUnavailable(_)));
    }
}
