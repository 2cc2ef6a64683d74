//! Glyphsdf Core: nine stages from outline to distance field
//!
//! A glyph enters as vector contours, exits as a byte-exact pixel buffer.
//! This crate holds the data model and the pipeline that drives every
//! request through the same sequence:
//!
//! 1. **Shape Acquisition** - A [`ShapeSource`] backend loads contours and metrics
//! 2. **Geometry Normalization** - Winding becomes consistent, degenerate edges vanish
//! 3. **Geometry Resolution** - Ambiguous outlines are rejected
//! 4. **Edge Coloring** - Edges get channel colors (multi-channel modes only)
//! 5. **Transform Computation** - Scale, padding and translation, computed together
//! 6. **Canvas Sizing** - Integer pixel dimensions from the padded bounds
//! 7. **Sampling Dispatch** - The [`DistanceFieldEngine`] fills a float canvas
//! 8. **Pixel Packing** - Floats become bytes in a fixed layout
//! 9. **Result Assembly** - Bytes plus metrics in target pixel units
//!
//! ## Running a request
//!
//! ```rust,no_run
//! use glyphsdf_core::{Pipeline, SdfParams, types::PixelFormat};
//! use std::sync::Arc;
//!
//! # use glyphsdf_core::traits::*;
//! # use glyphsdf_core::{canvas::FloatCanvas, outline::Shape, transform::SamplingParams, SdfConfig};
//! # struct MyEngine;
//! # impl DistanceFieldEngine for MyEngine {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn normalize(&self, _: &mut Shape) {}
//! #     fn resolve(&self, _: &Shape) -> bool { true }
//! #     fn color_edges(&self, _: &mut Shape, _: f64, _: u64) {}
//! #     fn generate(&self, _: glyphsdf_core::types::SamplingMode, _: &Shape, _: &mut FloatCanvas,
//! #         _: &SamplingParams, _: &SdfConfig) -> glyphsdf_core::Result<()> { Ok(()) }
//! # }
//! # fn open_source() -> Box<dyn ShapeSource> { unimplemented!() }
//!
//! let pipeline = Pipeline::builder().engine(Arc::new(MyEngine)).build()?;
//!
//! let params = SdfParams::new(32.0, 4.0, PixelFormat::Msdf);
//! let outcome = pipeline.run(open_source().as_ref(), &params)?;
//! if let Some(glyph) = outcome.ready() {
//!     println!("{}x{}", glyph.bitmap.width, glyph.bitmap.height);
//! }
//! # Ok::<(), glyphsdf_core::SdfError>(())
//! ```
//!
//! ## The traits at the seams
//!
//! - [`ShapeSource`] - Where outlines come from (fonts, SVG icons, tests)
//! - [`DistanceFieldEngine`] - Who turns outlines into distance samples
//!
//! Everything else in this crate is deterministic arithmetic around them.

pub mod canvas;
pub mod config;
pub mod error;
pub mod outline;
pub mod packing;
pub mod pipeline;
pub mod traits;
pub mod transform;

pub use config::SdfConfig;
pub use error::{EngineError, Result, SdfError, ShapeError, ValidationError};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use traits::{DistanceFieldEngine, LoadedShape, ShapeSource};

/// The data structures that travel through the pipeline
pub mod types {
    use std::fmt;

    /// Byte layout of the finished bitmap
    ///
    /// The variant decides both the sampling mode and the stride of the
    /// packed buffer. `MsdfRgb` is the tight three-byte layout used for
    /// icons rendered without alpha; every other variant packs four bytes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum PixelFormat {
        /// True signed distance, replicated into RGB, alpha 255
        #[default]
        Sdf,
        /// Pseudo-distance, replicated into RGB, alpha 255
        Psdf,
        /// Three distance channels, alpha forced to 255
        Msdf,
        /// Three distance channels, no alpha byte
        MsdfRgb,
        /// Three distance channels plus true distance in alpha
        Mtsdf,
    }

    impl PixelFormat {
        /// Parse a request's `type` string
        ///
        /// Unknown names fall back to [`PixelFormat::Sdf`], matching how
        /// glyph requests have always been interpreted.
        pub fn from_type_name(name: &str) -> Self {
            match name {
                "sdf" => Self::Sdf,
                "psdf" => Self::Psdf,
                "msdf" => Self::Msdf,
                "mtsdf" => Self::Mtsdf,
                other => {
                    log::debug!("Unrecognized distance field type {other:?}, using sdf");
                    Self::Sdf
                },
            }
        }

        /// Legacy icon switch: alpha means MTSDF, no alpha means tight MSDF
        pub fn from_use_alpha(use_alpha: bool) -> Self {
            if use_alpha {
                Self::Mtsdf
            } else {
                Self::MsdfRgb
            }
        }

        pub fn type_name(self) -> &'static str {
            match self {
                Self::Sdf => "sdf",
                Self::Psdf => "psdf",
                Self::Msdf => "msdf",
                Self::MsdfRgb => "msdf-rgb",
                Self::Mtsdf => "mtsdf",
            }
        }

        /// Bytes each pixel occupies in the packed buffer
        pub fn bytes_per_pixel(self) -> usize {
            match self {
                Self::MsdfRgb => 3,
                _ => 4,
            }
        }

        /// Which engine entry point fills the float canvas
        pub fn sampling_mode(self) -> SamplingMode {
            match self {
                Self::Sdf => SamplingMode::Sdf,
                Self::Psdf => SamplingMode::PseudoSdf,
                Self::Msdf | Self::MsdfRgb => SamplingMode::Msdf,
                Self::Mtsdf => SamplingMode::Mtsdf,
            }
        }

        pub const ALL: [PixelFormat; 5] = [
            PixelFormat::Sdf,
            PixelFormat::Psdf,
            PixelFormat::Msdf,
            PixelFormat::MsdfRgb,
            PixelFormat::Mtsdf,
        ];
    }

    impl fmt::Display for PixelFormat {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.type_name())
        }
    }

    /// The four ways the engine can sample a shape
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum SamplingMode {
        Sdf,
        PseudoSdf,
        Msdf,
        Mtsdf,
    }

    impl SamplingMode {
        /// Float channels per canvas pixel
        pub fn channels(self) -> usize {
            match self {
                Self::Sdf | Self::PseudoSdf => 1,
                Self::Msdf => 3,
                Self::Mtsdf => 4,
            }
        }

        /// Whether edge colors influence the samples
        pub fn is_multi_channel(self) -> bool {
            matches!(self, Self::Msdf | Self::Mtsdf)
        }
    }

    /// Axis-aligned box in either source units or target pixels
    ///
    /// Which one is always clear from context: backends and transforms work
    /// in source units, [`GlyphResult`] only ever carries target pixels.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct BoundingBox {
        pub left: f64,
        pub bottom: f64,
        pub right: f64,
        pub top: f64,
    }

    impl BoundingBox {
        pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
            Self {
                left,
                bottom,
                right,
                top,
            }
        }

        /// An inverted box that any point will grow
        pub fn empty() -> Self {
            Self::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN)
        }

        pub fn is_empty(&self) -> bool {
            self.left > self.right || self.bottom > self.top
        }

        pub fn include(&mut self, x: f64, y: f64) {
            self.left = self.left.min(x);
            self.bottom = self.bottom.min(y);
            self.right = self.right.max(x);
            self.top = self.top.max(y);
        }

        pub fn union(self, other: BoundingBox) -> Self {
            Self::new(
                self.left.min(other.left),
                self.bottom.min(other.bottom),
                self.right.max(other.right),
                self.top.max(other.top),
            )
        }

        /// Grow every side by `border`
        pub fn padded(self, border: f64) -> Self {
            Self::new(
                self.left - border,
                self.bottom - border,
                self.right + border,
                self.top + border,
            )
        }

        /// Multiply every edge by `factor`
        pub fn scaled(self, factor: f64) -> Self {
            Self::new(
                self.left * factor,
                self.bottom * factor,
                self.right * factor,
                self.top * factor,
            )
        }

        pub fn width(&self) -> f64 {
            self.right - self.left
        }

        pub fn height(&self) -> f64 {
            self.top - self.bottom
        }
    }

    /// Font-independent measurements of a loaded shape, in source units
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Metrics {
        /// Em size for fonts, declared document height for icons
        pub unit_size: f64,
        /// Only fonts have a line height
        pub line_height: Option<f64>,
        /// Horizontal advance; always zero for icons
        pub advance: f64,
    }

    impl Metrics {
        pub fn font(unit_size: f64, line_height: f64, advance: f64) -> Self {
            Self {
                unit_size,
                line_height: Some(line_height),
                advance,
            }
        }

        pub fn icon(height: f64) -> Self {
            Self {
                unit_size: height,
                line_height: None,
                advance: 0.0,
            }
        }
    }

    /// Packed pixels handed to the caller
    ///
    /// The caller owns `data` outright; the pipeline keeps no reference.
    /// Rows are stored bottom-up in shape space: row 0 covers the lowest Y.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ResultBitmap {
        pub data: Vec<u8>,
        pub width: u32,
        pub height: u32,
        pub format: PixelFormat,
    }

    impl ResultBitmap {
        pub fn bytes_per_pixel(&self) -> usize {
            self.format.bytes_per_pixel()
        }

        pub fn stride(&self) -> usize {
            self.width as usize * self.bytes_per_pixel()
        }

        /// Give up the buffer
        pub fn into_data(self) -> Vec<u8> {
            self.data
        }
    }

    /// A finished glyph: pixels plus metrics in target pixel units
    ///
    /// `advance` is the one exception: it is reported as the backend
    /// measured it, in source units.
    #[derive(Debug, Clone, PartialEq)]
    pub struct GlyphResult {
        pub bitmap: ResultBitmap,
        /// Contours left after normalization
        pub contour_count: usize,
        pub line_height: Option<f64>,
        pub em_size: f64,
        /// Padded bounds, scaled into target pixels
        pub bounds: BoundingBox,
        pub advance: f64,
    }

    /// Why a request produced no pixels without being an error
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum EmptyReason {
        /// The glyph, codepoint, face or path index does not exist
        ShapeNotFound,
        /// The source file could not be parsed
        ShapeLoadFailed,
        /// The outline has ambiguities the engine cannot resolve
        GeometryUnresolved,
        /// The source could not be opened at all
        ResourceUnavailable,
    }

    impl fmt::Display for EmptyReason {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let text = match self {
                Self::ShapeNotFound => "shape not found",
                Self::ShapeLoadFailed => "shape failed to load",
                Self::GeometryUnresolved => "geometry could not be resolved",
                Self::ResourceUnavailable => "source unavailable",
            };
            f.write_str(text)
        }
    }

    /// What a pipeline run produces once its inputs have been validated
    #[derive(Debug, Clone, PartialEq)]
    pub enum GlyphOutcome {
        Ready(GlyphResult),
        Empty(EmptyReason),
    }

    impl GlyphOutcome {
        pub fn is_ready(&self) -> bool {
            matches!(self, Self::Ready(_))
        }

        pub fn ready(&self) -> Option<&GlyphResult> {
            match self {
                Self::Ready(result) => Some(result),
                Self::Empty(_) => None,
            }
        }

        pub fn into_ready(self) -> Option<GlyphResult> {
            match self {
                Self::Ready(result) => Some(result),
                Self::Empty(_) => None,
            }
        }

        pub fn empty_reason(&self) -> Option<EmptyReason> {
            match self {
                Self::Ready(_) => None,
                Self::Empty(reason) => Some(*reason),
            }
        }
    }
}

/// What the caller asks for, independent of where the shape comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfParams {
    /// Target size in pixels per em (fonts) or per document height (icons)
    pub size: f64,
    /// Total width of the distance band in pixels
    pub range: f64,
    pub format: types::PixelFormat,
}

impl SdfParams {
    pub fn new(size: f64, range: f64, format: types::PixelFormat) -> Self {
        Self {
            size,
            range,
            format,
        }
    }

    /// Reject values no pipeline run could make sense of
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ValidationError::InvalidSize(self.size).into());
        }
        if !self.range.is_finite() || self.range < 0.0 {
            return Err(ValidationError::InvalidRange(self.range).into());
        }
        Ok(())
    }
}

impl Default for SdfParams {
    fn default() -> Self {
        Self {
            size: 32.0,
            range: 6.0,
            format: types::PixelFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for name in ["sdf", "psdf", "msdf", "mtsdf"] {
            assert_eq!(PixelFormat::from_type_name(name).type_name(), name);
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_sdf() {
        assert_eq!(PixelFormat::from_type_name("bogus"), PixelFormat::Sdf);
        assert_eq!(PixelFormat::from_type_name("MSDF"), PixelFormat::Sdf);
        assert_eq!(PixelFormat::from_type_name(""), PixelFormat::Sdf);
    }

    #[test]
    fn test_use_alpha_switch() {
        assert_eq!(PixelFormat::from_use_alpha(true), PixelFormat::Mtsdf);
        assert_eq!(PixelFormat::from_use_alpha(false), PixelFormat::MsdfRgb);
    }

    #[test]
    fn test_strides() {
        assert_eq!(PixelFormat::Sdf.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Psdf.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Msdf.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Mtsdf.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::MsdfRgb.bytes_per_pixel(), 3);
    }

    #[test]
    fn test_sampling_modes() {
        assert_eq!(PixelFormat::Psdf.sampling_mode(), SamplingMode::PseudoSdf);
        assert_eq!(PixelFormat::MsdfRgb.sampling_mode(), SamplingMode::Msdf);
        assert_eq!(SamplingMode::Mtsdf.channels(), 4);
        assert!(!SamplingMode::Sdf.is_multi_channel());
    }

    #[test]
    fn test_bounding_box_helpers() {
        let mut bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        bounds.include(100.0, 0.0);
        bounds.include(900.0, 700.0);
        assert_eq!(bounds, BoundingBox::new(100.0, 0.0, 900.0, 700.0));

        let padded = bounds.padded(62.5);
        assert_eq!(padded.width(), 925.0);
        assert_eq!(padded.height(), 825.0);
        assert_eq!(padded.scaled(2.0).left, 75.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(SdfParams::new(32.0, 4.0, PixelFormat::Sdf).validate().is_ok());
        assert!(SdfParams::new(32.0, 0.0, PixelFormat::Sdf).validate().is_ok());
        assert!(SdfParams::new(0.0, 4.0, PixelFormat::Sdf).validate().is_err());
        assert!(SdfParams::new(f64::NAN, 4.0, PixelFormat::Sdf).validate().is_err());
        assert!(SdfParams::new(32.0, -1.0, PixelFormat::Sdf).validate().is_err());
        assert!(SdfParams::new(32.0, f64::INFINITY, PixelFormat::Sdf).validate().is_err());
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = GlyphOutcome::Empty(EmptyReason::ShapeNotFound);
        assert!(!outcome.is_ready());
        assert!(outcome.ready().is_none());
        assert_eq!(outcome.empty_reason(), Some(EmptyReason::ShapeNotFound));
    }
}
