//! The contracts at the two seams of the pipeline
//!
//! - [`ShapeSource`] - Where outlines come from
//! - [`DistanceFieldEngine`] - Where outlines become samples
//!
//! A source owns whatever it opened (files, font data) only for the
//! duration of [`ShapeSource::load`]; the returned [`LoadedShape`] holds
//! plain geometry and nothing else.

use crate::{
    canvas::FloatCanvas,
    config::SdfConfig,
    error::{Result, ShapeError},
    outline::Shape,
    transform::SamplingParams,
    types::{Metrics, SamplingMode},
};

/// Outline plus the measurements needed to scale it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedShape {
    pub shape: Shape,
    pub metrics: Metrics,
}

/// Anything that can hand the pipeline one outline
///
/// ```ignore
/// struct Triangle;
///
/// impl ShapeSource for Triangle {
///     fn name(&self) -> &'static str {
///         "triangle"
///     }
///
///     fn load(&self) -> Result<LoadedShape, ShapeError> {
///         let mut builder = OutlineBuilder::new();
///         builder.move_to(0.0, 0.0);
///         builder.line_to(50.0, 100.0);
///         builder.line_to(100.0, 0.0);
///         Ok(LoadedShape { shape: builder.finish(), metrics: Metrics::icon(100.0) })
///     }
/// }
/// ```
pub trait ShapeSource {
    /// Used for logging
    fn name(&self) -> &'static str;

    /// Open, read and release the underlying resource
    fn load(&self) -> std::result::Result<LoadedShape, ShapeError>;
}

/// The geometric heavy lifting
///
/// Stages are called in the order they are declared. Implementations must
/// be deterministic: the same shape, parameters and config always produce
/// the same samples.
pub trait DistanceFieldEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Make winding consistent and drop degenerate pieces; never fails
    fn normalize(&self, shape: &mut Shape);

    /// Whether the signed distance of `shape` is well defined
    fn resolve(&self, shape: &Shape) -> bool;

    /// Assign channel colors to edges
    fn color_edges(&self, shape: &mut Shape, angle_threshold: f64, seed: u64);

    /// Fill `canvas` with samples for `mode`
    ///
    /// The canvas is already sized and carries `mode.channels()` floats per
    /// pixel.
    fn generate(
        &self,
        mode: SamplingMode,
        shape: &Shape,
        canvas: &mut FloatCanvas,
        params: &SamplingParams,
        config: &SdfConfig,
    ) -> Result<()>;
}
