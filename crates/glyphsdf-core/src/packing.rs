//! Floats in, bytes out
//!
//! One conversion function serves every channel of every format, so a
//! sample of 0.5 becomes the same byte whether it lands in an SDF or in
//! the alpha of an MTSDF.

use crate::canvas::FloatCanvas;
use crate::error::{EngineError, Result};
use crate::types::{PixelFormat, ResultBitmap};

/// Map a sample to a byte: clamp to [0, 1], scale by 255, round to nearest
pub fn float_to_byte(value: f32) -> u8 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (clamped * 255.0).round() as u8
}

/// Pack a sampled canvas into the byte layout `format` prescribes
///
/// The canvas must carry the channel count of the format's sampling mode.
pub fn pack(canvas: &FloatCanvas, format: PixelFormat) -> Result<ResultBitmap> {
    let expected = format.sampling_mode().channels();
    if canvas.channels() != expected {
        return Err(EngineError::ChannelMismatch {
            expected,
            found: canvas.channels(),
        }
        .into());
    }

    let bpp = format.bytes_per_pixel();
    let pixels = canvas.width() as usize * canvas.height() as usize;
    let mut data = Vec::with_capacity(pixels * bpp);

    if pixels > 0 {
        for px in canvas.samples().chunks_exact(expected) {
            match format {
                PixelFormat::Sdf | PixelFormat::Psdf => {
                    let v = float_to_byte(px[0]);
                    data.extend_from_slice(&[v, v, v, 255]);
                },
                PixelFormat::Msdf => {
                    data.extend_from_slice(&[
                        float_to_byte(px[0]),
                        float_to_byte(px[1]),
                        float_to_byte(px[2]),
                        255,
                    ]);
                },
                PixelFormat::MsdfRgb => {
                    data.extend_from_slice(&[
                        float_to_byte(px[0]),
                        float_to_byte(px[1]),
                        float_to_byte(px[2]),
                    ]);
                },
                PixelFormat::Mtsdf => {
                    data.extend(px.iter().map(|&v| float_to_byte(v)));
                },
            }
        }
    }

    Ok(ResultBitmap {
        data,
        width: canvas.width(),
        height: canvas.height(),
        format,
    })
}
