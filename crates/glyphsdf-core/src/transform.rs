//! From source units to pixels
//!
//! The scale, the padding and the translation are derived in one place and
//! travel together. The engine receives the padding doubled back into the
//! full band width, so the halving here and the doubling in
//! [`Transform::sampling_params`] must always be paired.

use kurbo::Vec2;

use crate::error::{EngineError, Result, ValidationError};
use crate::types::BoundingBox;

/// Scale, padding and padded bounds for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Target pixels per source unit
    pub scale: f64,
    /// Padding added on every side, in source units
    pub padding: f64,
    /// Shape bounds grown by `padding`, in source units
    pub bounds: BoundingBox,
}

impl Transform {
    /// Derive the transform for a shape with `bounds` (or none, when empty)
    ///
    /// An empty shape gets all-zero bounds and no padding, so it sizes to
    /// a 0×0 canvas.
    pub fn compute(
        size: f64,
        range: f64,
        unit_size: f64,
        bounds: Option<BoundingBox>,
    ) -> Result<Self> {
        if !unit_size.is_finite() || unit_size <= 0.0 {
            return Err(ValidationError::InvalidUnitSize(unit_size).into());
        }
        let scale = size / unit_size;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ValidationError::InvalidSize(size).into());
        }

        let (padding, bounds) = match bounds {
            Some(bounds) => {
                let padding = 0.5 * range / scale;
                (padding, bounds.padded(padding))
            },
            None => (0.0, BoundingBox::default()),
        };

        Ok(Self {
            scale,
            padding,
            bounds,
        })
    }

    /// Integer canvas dimensions, refusing anything above `max_dimension`
    pub fn canvas_size(&self, max_dimension: u32) -> Result<CanvasSize> {
        let width = pixel_extent(self.scale * self.bounds.width());
        let height = pixel_extent(self.scale * self.bounds.height());
        let limit = f64::from(max_dimension);
        if width > limit || height > limit {
            return Err(EngineError::CanvasTooLarge {
                width: clamp_to_u32(width),
                height: clamp_to_u32(height),
                max: max_dimension,
            }
            .into());
        }
        Ok(CanvasSize {
            width: width as u32,
            height: height as u32,
        })
    }

    /// What the engine needs to map pixels back onto the shape
    pub fn sampling_params(&self) -> SamplingParams {
        SamplingParams {
            range: 2.0 * self.padding,
            scale: self.scale,
            translation: Vec2::new(-self.bounds.left, -self.bounds.bottom),
        }
    }

    /// Padded bounds in target pixels
    pub fn scaled_bounds(&self) -> BoundingBox {
        self.bounds.scaled(self.scale)
    }
}

fn pixel_extent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.ceil().max(0.0)
}

fn clamp_to_u32(value: f64) -> u32 {
    value.min(f64::from(u32::MAX)) as u32
}

/// Pixel dimensions of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Parameters handed to the distance-field engine
///
/// A pixel center `(x + 0.5, y + 0.5)` maps to the shape-space point
/// `(x + 0.5, y + 0.5) / scale - translation`, and a distance `d` in
/// source units encodes as `d / range + 0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Full distance band width, in source units
    pub range: f64,
    pub scale: f64,
    pub translation: Vec2,
}

impl SamplingParams {
    pub fn pixel_to_shape(&self, x: u32, y: u32) -> kurbo::Point {
        kurbo::Point::new(
            (f64::from(x) + 0.5) / self.scale - self.translation.x,
            (f64::from(y) + 0.5) / self.scale - self.translation.y,
        )
    }

    /// Map a signed distance in source units into the engine's [0, 1] band
    pub fn encode(&self, distance: f64) -> f32 {
        if self.range == 0.0 {
            return match distance.partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Greater) => 1.0,
                Some(std::cmp::Ordering::Less) => 0.0,
                _ => 0.5,
            };
        }
        (distance / self.range + 0.5) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SdfError;
    use proptest::prelude::*;

    fn glyph_a() -> Transform {
        let bounds = BoundingBox::new(100.0, 0.0, 900.0, 700.0);
        match Transform::compute(32.0, 4.0, 1000.0, Some(bounds)) {
            Ok(t) => t,
            Err(e) => unreachable!("transform should compute: {e}"),
        }
    }

    #[test]
    fn test_reference_glyph_dimensions() {
        let transform = glyph_a();
        assert!((transform.scale - 0.032).abs() < 1e-12);
        assert!((transform.padding - 62.5).abs() < 1e-9);

        let size = match transform.canvas_size(4096) {
            Ok(s) => s,
            Err(e) => unreachable!("canvas should fit: {e}"),
        };
        assert_eq!(size, CanvasSize { width: 30, height: 27 });
        assert_eq!(size.pixel_count() * 4, 3240);
    }

    #[test]
    fn test_sampling_params_double_the_padding() {
        let params = glyph_a().sampling_params();
        assert!((params.range - 125.0).abs() < 1e-9);
        assert!((params.translation.x + 37.5).abs() < 1e-9);
        assert!((params.translation.y - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_first_pixel_maps_inside_padded_box() {
        let params = glyph_a().sampling_params();
        let p = params.pixel_to_shape(0, 0);
        assert!((p.x - (37.5 + 0.5 / 0.032)).abs() < 1e-9);
        assert!((p.y - (-62.5 + 0.5 / 0.032)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_range_has_no_padding() {
        let bounds = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let transform = match Transform::compute(20.0, 0.0, 10.0, Some(bounds)) {
            Ok(t) => t,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!(transform.padding, 0.0);
        assert_eq!(transform.bounds, bounds);
        assert_eq!(transform.sampling_params().encode(1.0), 1.0);
        assert_eq!(transform.sampling_params().encode(-1.0), 0.0);
    }

    #[test]
    fn test_empty_shape_sizes_to_nothing() {
        let transform = match Transform::compute(32.0, 4.0, 1000.0, None) {
            Ok(t) => t,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!(transform.bounds, BoundingBox::default());
        let size = match transform.canvas_size(4096) {
            Ok(s) => s,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!(size, CanvasSize::default());
    }

    #[test]
    fn test_zero_unit_size_is_validation_error() {
        let result = Transform::compute(32.0, 4.0, 0.0, None);
        assert!(matches!(
            result,
            Err(SdfError::Validation(ValidationError::InvalidUnitSize(_)))
        ));
    }

    #[test]
    fn test_canvas_limit() {
        let bounds = BoundingBox::new(0.0, 0.0, 1000.0, 1000.0);
        let transform = match Transform::compute(5000.0, 0.0, 1000.0, Some(bounds)) {
            Ok(t) => t,
            Err(e) => unreachable!("{e}"),
        };
        assert!(matches!(
            transform.canvas_size(4096),
            Err(SdfError::Engine(EngineError::CanvasTooLarge { max: 4096, .. }))
        ));
    }

    proptest! {
        #[test]
        fn doubling_size_and_range_doubles_the_canvas(
            left in -500.0f64..500.0,
            bottom in -500.0f64..500.0,
            w in 1.0f64..800.0,
            h in 1.0f64..800.0,
            size in 4.0f64..64.0,
            ratio in 0.0f64..0.5,
        ) {
            let bounds = BoundingBox::new(left, bottom, left + w, bottom + h);
            let range = size * ratio;
            let small = Transform::compute(size, range, 1000.0, Some(bounds)).ok();
            let large = Transform::compute(size * 2.0, range * 2.0, 1000.0, Some(bounds)).ok();
            prop_assert!(small.is_some() && large.is_some());
            if let (Some(small), Some(large)) = (small, large) {
                // Padding in source units is unchanged when range/size is constant
                prop_assert!((small.padding - large.padding).abs() < 1e-9);
                let s = small.canvas_size(u32::MAX).ok();
                let l = large.canvas_size(u32::MAX).ok();
                if let (Some(s), Some(l)) = (s, l) {
                    prop_assert!((i64::from(l.width) - 2 * i64::from(s.width)).abs() <= 1);
                    prop_assert!((i64::from(l.height) - 2 * i64::from(s.height)).abs() <= 1);
                }
                let a = small.scaled_bounds();
                let b = large.scaled_bounds();
                let aspect_small = a.width() / a.height();
                let aspect_large = b.width() / b.height();
                prop_assert!((aspect_small - aspect_large).abs() < 1e-9);
            }
        }
    }
}
