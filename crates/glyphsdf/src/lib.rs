//! Glyphsdf: distance fields for glyphs and icons
//!
//! Give it a font and a codepoint, or an SVG and a path index; get back a
//! signed distance field ready for an atlas, plus the metrics to place it.
//!
//! ```rust,no_run
//! use glyphsdf::prelude::*;
//!
//! let request = FontGlyphRequest::new("NotoSans-Regular.ttf", 'A' as u32)
//!     .with_size(32.0)
//!     .with_range(4.0)
//!     .with_format(PixelFormat::Msdf);
//!
//! match glyphsdf::build_font_glyph(&request)? {
//!     GlyphOutcome::Ready(glyph) => {
//!         println!("{}x{} px, advance {}", glyph.bitmap.width, glyph.bitmap.height, glyph.advance);
//!     },
//!     GlyphOutcome::Empty(reason) => println!("nothing to draw: {reason}"),
//! }
//! # Ok::<(), glyphsdf::SdfError>(())
//! ```
//!
//! Two ways in:
//!
//! - Typed requests ([`FontGlyphRequest`], [`SvgGlyphRequest`]) for Rust callers
//! - [`boundary`] for callers that speak loosely typed argument lists
//!
//! # Feature Flags
//!
//! - `parallel`: Sample rows on the rayon thread pool

pub mod boundary;
pub mod response;

use std::path::PathBuf;
use std::sync::Arc;

pub use glyphsdf_core::{config, error, types, Pipeline, SdfConfig, SdfError, SdfParams};
pub use glyphsdf_engine::MsdfEngine;
pub use glyphsdf_font::{FontSource, GlyphSelector};
pub use glyphsdf_svg::SvgSource;

use glyphsdf_core::{error::Result, types::GlyphOutcome, types::PixelFormat};

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{FontGlyphRequest, Generator, SvgGlyphRequest};
    pub use glyphsdf_core::{
        error::{Result, SdfError},
        types::{BoundingBox, EmptyReason, GlyphOutcome, GlyphResult, PixelFormat, ResultBitmap},
        SdfConfig, SdfParams,
    };
}

/// One glyph out of a font file
#[derive(Debug, Clone, PartialEq)]
pub struct FontGlyphRequest {
    pub font_path: PathBuf,
    /// Codepoint, or glyph index when `code_is_index` is set
    pub code: u32,
    pub code_is_index: bool,
    /// Em size in target pixels
    pub size: f64,
    /// Width of the distance band in target pixels
    pub range: f64,
    pub format: PixelFormat,
    pub face_index: u32,
    pub variations: Vec<(String, f32)>,
}

impl FontGlyphRequest {
    pub fn new(font_path: impl Into<PathBuf>, code: u32) -> Self {
        let params = SdfParams::default();
        Self {
            font_path: font_path.into(),
            code,
            code_is_index: false,
            size: params.size,
            range: params.range,
            format: params.format,
            face_index: 0,
            variations: Vec::new(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Treat `code` as a glyph id instead of a codepoint
    pub fn by_index(mut self) -> Self {
        self.code_is_index = true;
        self
    }

    pub fn with_face_index(mut self, face_index: u32) -> Self {
        self.face_index = face_index;
        self
    }

    pub fn with_variations(mut self, variations: Vec<(String, f32)>) -> Self {
        self.variations = variations;
        self
    }

    pub fn params(&self) -> SdfParams {
        SdfParams::new(self.size, self.range, self.format)
    }

    pub fn source(&self) -> FontSource {
        FontSource::new(
            self.font_path.clone(),
            GlyphSelector::from_code(self.code, self.code_is_index),
        )
        .with_face_index(self.face_index)
        .with_variations(self.variations.clone())
    }
}

/// One path out of an SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgGlyphRequest {
    pub icon_path: PathBuf,
    pub path_index: usize,
    /// Document height maps onto this many target pixels
    pub size: f64,
    pub range: f64,
    pub format: PixelFormat,
}

impl SvgGlyphRequest {
    pub fn new(icon_path: impl Into<PathBuf>, path_index: usize) -> Self {
        let params = SdfParams::default();
        Self {
            icon_path: icon_path.into(),
            path_index,
            size: params.size,
            range: params.range,
            format: params.format,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn params(&self) -> SdfParams {
        SdfParams::new(self.size, self.range, self.format)
    }

    pub fn source(&self) -> SvgSource {
        SvgSource::new(self.icon_path.clone(), self.path_index)
    }
}

/// A pipeline wired to the built-in engine
///
/// Holds no per-request state; share one across threads or build one per
/// call, whichever is convenient.
pub struct Generator {
    pipeline: Pipeline,
}

impl Generator {
    pub fn new() -> Result<Self> {
        Self::with_config(SdfConfig::default())
    }

    pub fn with_config(config: SdfConfig) -> Result<Self> {
        let pipeline = Pipeline::builder()
            .engine(Arc::new(MsdfEngine::new()))
            .config(config)
            .build()?;
        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn font_glyph(&self, request: &FontGlyphRequest) -> Result<GlyphOutcome> {
        self.pipeline.run(&request.source(), &request.params())
    }

    pub fn svg_glyph(&self, request: &SvgGlyphRequest) -> Result<GlyphOutcome> {
        self.pipeline.run(&request.source(), &request.params())
    }
}

/// Build one font glyph with the default configuration
pub fn build_font_glyph(request: &FontGlyphRequest) -> Result<GlyphOutcome> {
    Generator::new()?.font_glyph(request)
}

/// Build one SVG icon with the default configuration
pub fn build_svg_glyph(request: &SvgGlyphRequest) -> Result<GlyphOutcome> {
    Generator::new()?.svg_glyph(request)
}
