//! Engine tuning knobs
//!
//! Everything here has a default that reproduces the reference output.
//! Only the canvas limit can also come from the environment:
//!
//! ```bash
//! GLYPHSDF_MAX_DIMENSION=8192 ./glyphsdf font Inter.ttf A
//! ```

use std::sync::OnceLock;

/// Largest canvas side accepted when no override is set
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// Corner angle threshold, in radians, used by edge coloring
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 3.0;

/// Clash threshold factor used by error correction
pub const DEFAULT_CLASH_THRESHOLD: f64 = 1.001;

static ENV_MAX_DIMENSION: OnceLock<Option<u32>> = OnceLock::new();

/// Read `GLYPHSDF_MAX_DIMENSION` once per process
fn env_max_dimension() -> Option<u32> {
    *ENV_MAX_DIMENSION.get_or_init(|| {
        let raw = std::env::var("GLYPHSDF_MAX_DIMENSION").ok()?;
        match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => {
                log::info!("Canvas limit set to {value} via GLYPHSDF_MAX_DIMENSION");
                Some(value)
            },
            _ => {
                log::warn!("Ignoring GLYPHSDF_MAX_DIMENSION={raw:?}: not a positive integer");
                None
            },
        }
    })
}

/// Settings shared by every stage of a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct SdfConfig {
    /// Edges meeting at a sharper angle than this count as a corner
    pub angle_threshold: f64,
    /// Seed for the color cycle; same seed, same colors
    pub coloring_seed: u64,
    /// Repair pixels where channels disagree about the inside
    pub error_correction: bool,
    pub clash_threshold: f64,
    /// Canvases wider or taller than this are refused
    pub max_dimension: u32,
}

impl Default for SdfConfig {
    fn default() -> Self {
        Self {
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            coloring_seed: 0,
            error_correction: true,
            clash_threshold: DEFAULT_CLASH_THRESHOLD,
            max_dimension: env_max_dimension().unwrap_or(DEFAULT_MAX_DIMENSION),
        }
    }
}

impl SdfConfig {
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_error_correction(mut self, enabled: bool) -> Self {
        self.error_correction = enabled;
        self
    }

    pub fn with_coloring_seed(mut self, seed: u64) -> Self {
        self.coloring_seed = seed;
        self
    }
}
