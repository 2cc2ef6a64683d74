//! PNG export format
//!
//! Exports distance fields to PNG using the `image` crate. Bitmaps store
//! their lowest row first, so rows are flipped by default to put the top
//! of the glyph at the top of the image.

use glyphsdf_core::types::{GlyphResult, PixelFormat, ResultBitmap};
use image::{ImageBuffer, ImageEncoder, RgbaImage};

use crate::{ExportError, Exporter, Result};

/// Encode a packed bitmap as an RGBA PNG
///
/// Three-byte pixels get an opaque alpha. With `flip`, the first stored
/// row becomes the last image row.
pub fn encode_bitmap_to_png(bitmap: &ResultBitmap, flip: bool) -> Result<Vec<u8>> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(ExportError::FormatNotSupported(
            "PNG cannot hold an empty bitmap".into(),
        ));
    }
    let stride = bitmap.stride();
    let expected_size = stride * bitmap.height as usize;
    if bitmap.data.len() < expected_size {
        return Err(ExportError::EncodingFailed(format!(
            "Buffer too small: expected {} bytes for {}x{} {}, got {}",
            expected_size,
            bitmap.width,
            bitmap.height,
            bitmap.format,
            bitmap.data.len()
        )));
    }

    let mut rgba_data = Vec::with_capacity(bitmap.width as usize * bitmap.height as usize * 4);
    let mut rows: Vec<&[u8]> = bitmap.data[..expected_size].chunks(stride).collect();
    if flip {
        rows.reverse();
    }
    for row in rows {
        match bitmap.format {
            PixelFormat::MsdfRgb => {
                for pixel in row.chunks_exact(3) {
                    rgba_data.extend_from_slice(pixel);
                    rgba_data.push(255);
                }
            },
            _ => rgba_data.extend_from_slice(row),
        }
    }

    let img: RgbaImage = ImageBuffer::from_raw(bitmap.width, bitmap.height, rgba_data)
        .ok_or_else(|| ExportError::EncodingFailed("Failed to create image buffer".into()))?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );
    encoder
        .write_image(img.as_raw(), bitmap.width, bitmap.height, image::ExtendedColorType::Rgba8)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {e}")))?;

    Ok(png_data)
}

/// PNG exporter for finished glyphs
///
/// ```
/// use glyphsdf_export::{Exporter, PngExporter};
/// let exporter = PngExporter::new();
/// assert_eq!(exporter.extension(), "png");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PngExporter {
    flip: bool,
}

impl PngExporter {
    /// Top of the glyph at the top of the image
    pub fn new() -> Self {
        Self { flip: true }
    }

    /// Rows in stored order, lowest Y first
    pub fn stored_order() -> Self {
        Self { flip: false }
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, glyph: &GlyphResult) -> Result<Vec<u8>> {
        encode_bitmap_to_png(&glyph.bitmap, self.flip)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(png: &[u8]) -> RgbaImage {
        match image::load_from_memory_with_format(png, image::ImageFormat::Png) {
            Ok(img) => img.to_rgba8(),
            Err(e) => unreachable!("PNG should decode: {e}"),
        }
    }

    fn bitmap(format: PixelFormat, data: Vec<u8>) -> ResultBitmap {
        ResultBitmap {
            data,
            width: 1,
            height: 2,
            format,
        }
    }

    #[test]
    fn test_rows_are_flipped() {
        let stored = bitmap(PixelFormat::Sdf, vec![10, 10, 10, 255, 200, 200, 200, 255]);
        let png = match encode_bitmap_to_png(&stored, true) {
            Ok(p) => p,
            Err(e) => unreachable!("encode failed: {e}"),
        };
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
        let img = decode(&png);
        assert_eq!(img.get_pixel(0, 0).0, [200, 200, 200, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [10, 10, 10, 255]);

        let img = match encode_bitmap_to_png(&stored, false) {
            Ok(p) => decode(&p),
            Err(e) => unreachable!("encode failed: {e}"),
        };
        assert_eq!(img.get_pixel(0, 0).0, [10, 10, 10, 255]);
    }

    #[test]
    fn test_three_byte_pixels_gain_alpha() {
        let stored = bitmap(PixelFormat::MsdfRgb, vec![1, 2, 3, 4, 5, 6]);
        let img = match encode_bitmap_to_png(&stored, false) {
            Ok(p) => decode(&p),
            Err(e) => unreachable!("encode failed: {e}"),
        };
        assert_eq!(img.get_pixel(0, 1).0, [4, 5, 6, 255]);
    }

    #[test]
    fn test_short_and_empty_buffers() {
        let short = bitmap(PixelFormat::Mtsdf, vec![0; 7]);
        assert!(matches!(encode_bitmap_to_png(&short, true), Err(ExportError::EncodingFailed(_))));

        let empty = ResultBitmap {
            data: Vec::new(),
            width: 0,
            height: 0,
            format: PixelFormat::Sdf,
        };
        assert!(matches!(
            encode_bitmap_to_png(&empty, true),
            Err(ExportError::FormatNotSupported(_))
        ));
    }
}
