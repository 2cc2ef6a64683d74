//! Error types for glyphsdf
//!
//! Two kinds of failure exist. Loud ones ([`SdfError`]) mean the request
//! itself was malformed or the engine broke; they abort a run. Quiet ones
//! ([`ShapeError`]) mean the source had nothing usable to give; the
//! pipeline turns them into [`EmptyReason`] and returns an empty outcome.

use thiserror::Error;

use crate::types::EmptyReason;

pub type Result<T> = std::result::Result<T, SdfError>;

/// Main error type for glyphsdf
#[derive(Debug, Error)]
pub enum SdfError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Engine failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameters that no run can honor
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("size must be a positive finite number, got {0}")]
    InvalidSize(f64),

    #[error("range must be a non-negative finite number, got {0}")]
    InvalidRange(f64),

    #[error("shape reports a unit size of {0}, cannot derive a scale")]
    InvalidUnitSize(f64),
}

/// Failures inside sampling or packing
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Canvas {width}x{height} exceeds the {max} pixel limit")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },

    #[error("Canvas has {found} channels, {expected} required")]
    ChannelMismatch { expected: usize, found: usize },

    #[error("Engine error: {0}")]
    Backend(String),
}

/// Reasons a source could not deliver a shape
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Could not read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid shape data: {0}")]
    InvalidData(String),

    #[error("Glyph not found: {0}")]
    GlyphNotFound(String),

    #[error("Path index {index} out of range ({count} paths)")]
    PathIndexOutOfRange { index: usize, count: usize },

    #[error("Source is {size} bytes, limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("Not supported: {0}")]
    Unsupported(String),
}

impl ShapeError {
    /// The empty-result category this failure belongs to
    pub fn reason(&self) -> EmptyReason {
        match self {
            Self::FileNotFound(_) | Self::Io(_) | Self::TooLarge { .. } => {
                EmptyReason::ResourceUnavailable
            },
            Self::InvalidData(_) | Self::Unsupported(_) => EmptyReason::ShapeLoadFailed,
            Self::GlyphNotFound(_) | Self::PathIndexOutOfRange { .. } => {
                EmptyReason::ShapeNotFound
            },
        }
    }
}
