//! The engine that drives one shape through nine stages to become bytes

// this_file: crates/glyphsdf-core/src/pipeline.rs

use crate::{
    canvas::FloatCanvas,
    config::SdfConfig,
    error::{Result, SdfError},
    packing,
    traits::{DistanceFieldEngine, ShapeSource},
    transform::Transform,
    types::{EmptyReason, GlyphOutcome, GlyphResult},
    SdfParams,
};
use std::sync::Arc;

/// Pipeline for distance-field generation: Load → Geometry → Sample → Pack
///
/// A pipeline holds no per-request state. One instance can serve any
/// number of requests, from any number of threads, as long as each call
/// brings its own [`ShapeSource`].
///
/// ```ignore
/// use glyphsdf_core::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .engine(Arc::new(MsdfEngine::new()))
///     .build()?;
///
/// let outcome = pipeline.run(&source, &SdfParams::new(32.0, 4.0, PixelFormat::Msdf))?;
/// ```
pub struct Pipeline {
    engine: Arc<dyn DistanceFieldEngine>,
    config: SdfConfig,
}

impl Pipeline {
    /// Start building a pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn engine(&self) -> &dyn DistanceFieldEngine {
        self.engine.as_ref()
    }

    pub fn config(&self) -> &SdfConfig {
        &self.config
    }

    /// Run every stage for one request
    ///
    /// Parameter problems and engine failures come back as `Err`. A source
    /// that has nothing to give, or geometry the engine cannot make sense
    /// of, comes back as `Ok(GlyphOutcome::Empty(_))`.
    pub fn run(&self, source: &dyn ShapeSource, params: &SdfParams) -> Result<GlyphOutcome> {
        params.validate()?;
        let format = params.format;
        let mode = format.sampling_mode();

        // 1. Shape acquisition
        log::debug!("Loading shape from backend: {}", source.name());
        let loaded = match source.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                let reason = e.reason();
                log::warn!("{} could not provide a shape ({e}), returning empty result", source.name());
                return Ok(GlyphOutcome::Empty(reason));
            },
        };
        let metrics = loaded.metrics;
        let mut shape = loaded.shape;

        // 2. Geometry normalization
        log::debug!("Normalizing geometry with engine: {}", self.engine.name());
        self.engine.normalize(&mut shape);

        // 3. Geometry resolution
        if !self.engine.resolve(&shape) {
            log::warn!("Geometry from {} is ambiguous, returning empty result", source.name());
            return Ok(GlyphOutcome::Empty(EmptyReason::GeometryUnresolved));
        }

        // 4. Edge coloring
        if mode.is_multi_channel() {
            log::debug!("Coloring {} edges", shape.edge_count());
            self.engine.color_edges(
                &mut shape,
                self.config.angle_threshold,
                self.config.coloring_seed,
            );
        }

        // 5. Transform computation
        let transform =
            Transform::compute(params.size, params.range, metrics.unit_size, shape.bounds())?;

        // 6. Canvas sizing
        let size = transform.canvas_size(self.config.max_dimension)?;
        log::debug!("Canvas {}x{} at scale {}", size.width, size.height, transform.scale);

        // 7. Sampling dispatch
        let mut canvas = FloatCanvas::new(size.width, size.height, mode.channels());
        self.engine.generate(
            mode,
            &shape,
            &mut canvas,
            &transform.sampling_params(),
            &self.config,
        )?;

        // 8. Pixel packing
        let bitmap = packing::pack(&canvas, format)?;

        // 9. Result assembly
        let scale = transform.scale;
        let result = GlyphResult {
            bitmap,
            contour_count: shape.contours.len(),
            line_height: metrics.line_height.map(|h| h * scale),
            em_size: metrics.unit_size * scale,
            bounds: transform.scaled_bounds(),
            advance: metrics.advance,
        };
        log::trace!(
            "{} glyph ready: {} contours, {} bytes, bounds {:?}",
            format,
            result.contour_count,
            result.bitmap.data.len(),
            result.bounds
        );
        Ok(GlyphOutcome::Ready(result))
    }
}

/// Put together your perfect pipeline
pub struct PipelineBuilder {
    engine: Option<Arc<dyn DistanceFieldEngine>>,
    config: SdfConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            engine: None,
            config: SdfConfig::default(),
        }
    }

    /// Choose who computes the distances
    pub fn engine(mut self, engine: Arc<dyn DistanceFieldEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn config(mut self, config: SdfConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the pipeline, ready to run
    pub fn build(self) -> Result<Pipeline> {
        let engine = self
            .engine
            .ok_or_else(|| SdfError::ConfigError("No distance-field engine specified".into()))?;
        if self.config.max_dimension == 0 {
            return Err(SdfError::ConfigError("max_dimension must be at least 1".into()));
        }
        Ok(Pipeline {
            engine,
            config: self.config,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
