//! Export module for glyphsdf
//!
//! Finished glyphs leave the pipeline as raw bytes plus metrics. These
//! exporters turn them into something you can look at or store:
//!
//! - [`PngExporter`] - An image for eyeballing the field
//! - [`RawExporter`] - The packed bytes exactly as produced
//! - [`JsonExporter`] - Metrics only, for atlas builders

use glyphsdf_core::types::GlyphResult;
use thiserror::Error;

pub mod json;
pub mod png;

pub use json::JsonExporter;
pub use png::PngExporter;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Turns a finished glyph into file bytes
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    fn export(&self, glyph: &GlyphResult) -> Result<Vec<u8>>;

    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}

/// The packed buffer, untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct RawExporter;

impl Exporter for RawExporter {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn export(&self, glyph: &GlyphResult) -> Result<Vec<u8>> {
        Ok(glyph.bitmap.data.clone())
    }

    fn extension(&self) -> &'static str {
        "raw"
    }

    fn mime_type(&self) -> &'static str {
        "application/octet-stream"
    }
}

/// Pick an exporter from a file extension (`png`, `raw`, `bin`, `json`)
pub fn exporter_for_extension(extension: &str) -> Option<Box<dyn Exporter>> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some(Box::new(PngExporter::new())),
        "raw" | "bin" => Some(Box::new(RawExporter)),
        "json" => Some(Box::new(JsonExporter::with_pretty_print())),
        _ => None,
    }
}
