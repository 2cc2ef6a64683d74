//! JSON export format
//!
//! Writes the metrics of a glyph without its pixels: what an atlas packer
//! needs to place a bitmap it stores elsewhere.

use glyphsdf_core::types::GlyphResult;
use serde::{Deserialize, Serialize};

use crate::{ExportError, Exporter, Result};

/// Metrics document for one glyph, all lengths in target pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphMetrics {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: usize,
    pub contour_count: usize,
    pub em_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// In source units
    pub advance: f64,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl From<&GlyphResult> for GlyphMetrics {
    fn from(glyph: &GlyphResult) -> Self {
        Self {
            format: glyph.bitmap.format.type_name().to_string(),
            width: glyph.bitmap.width,
            height: glyph.bitmap.height,
            bytes_per_pixel: glyph.bitmap.bytes_per_pixel(),
            contour_count: glyph.contour_count,
            em_size: glyph.em_size,
            line_height: glyph.line_height,
            advance: glyph.advance,
            bounds: Bounds {
                left: glyph.bounds.left,
                bottom: glyph.bounds.bottom,
                right: glyph.bounds.right,
                top: glyph.bounds.top,
            },
        }
    }
}

/// JSON exporter for glyph metrics
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty_print() -> Self {
        Self { pretty: true }
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, glyph: &GlyphResult) -> Result<Vec<u8>> {
        let metrics = GlyphMetrics::from(glyph);
        let json = if self.pretty {
            serde_json::to_vec_pretty(&metrics)
        } else {
            serde_json::to_vec(&metrics)
        }
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        Ok(json)
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}
