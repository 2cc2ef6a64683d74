//! Glyphsdf Font: outlines straight from TrueType and OpenType files
//!
//! Each [`FontSource`] describes one glyph in one face of one file. The
//! file is read, parsed and dropped inside [`ShapeSource::load`]; nothing
//! stays open between requests.
//!
//! Coordinates are font units, Y up, exactly as the font stores them.

pub mod pen;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glyphsdf_core::{types::Metrics, LoadedShape, ShapeError, ShapeSource};
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::instance::{Location, Size};
use skrifa::outline::DrawSettings;
use skrifa::{GlyphId, MetadataProvider};

use crate::pen::ShapePen;

/// Fonts larger than this are refused before parsing
pub const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// How the glyph is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphSelector {
    /// Unicode scalar, looked up through the character map
    Codepoint(u32),
    /// Glyph id used as-is
    Index(u32),
}

impl GlyphSelector {
    /// Interpret `code` the way glyph requests do
    pub fn from_code(code: u32, code_is_index: bool) -> Self {
        if code_is_index {
            Self::Index(code)
        } else {
            Self::Codepoint(code)
        }
    }
}

/// One glyph in one font face
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    path: PathBuf,
    glyph: GlyphSelector,
    face_index: u32,
    variations: Vec<(String, f32)>,
}

impl FontSource {
    pub fn new(path: impl Into<PathBuf>, glyph: GlyphSelector) -> Self {
        Self {
            path: path.into(),
            glyph,
            face_index: 0,
            variations: Vec::new(),
        }
    }

    /// Pick a face inside a collection (`.ttc`, `.otc`)
    pub fn with_face_index(mut self, face_index: u32) -> Self {
        self.face_index = face_index;
        self
    }

    /// Variable font axis settings in user space, e.g. `("wght", 700.0)`
    pub fn with_variations(mut self, variations: Vec<(String, f32)>) -> Self {
        self.variations = variations;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn glyph(&self) -> GlyphSelector {
        self.glyph
    }

    fn location(&self, font: &ReadFontRef<'_>) -> Location {
        if self.variations.is_empty() {
            return Location::default();
        }
        let settings: Vec<(&str, f32)> = self
            .variations
            .iter()
            .map(|(tag, value)| (tag.as_str(), *value))
            .collect();
        font.axes().location(settings)
    }

    fn resolve_glyph(&self, font: &ReadFontRef<'_>, glyph_count: u32) -> Result<GlyphId, ShapeError> {
        match self.glyph {
            GlyphSelector::Codepoint(code) => font.charmap().map(code).ok_or_else(|| {
                ShapeError::GlyphNotFound(format!("U+{code:04X} is not mapped in the font"))
            }),
            GlyphSelector::Index(index) if index < glyph_count => Ok(GlyphId::new(index)),
            GlyphSelector::Index(index) => Err(ShapeError::GlyphNotFound(format!(
                "glyph index {index} out of range ({glyph_count} glyphs)"
            ))),
        }
    }
}

/// Read a font file, refusing anything over `max_size` bytes
pub fn read_font_file(path: &Path, max_size: u64) -> Result<Vec<u8>, ShapeError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ShapeError::FileNotFound(path.display().to_string()),
        _ => ShapeError::Io(e),
    })?;
    if metadata.len() > max_size {
        return Err(ShapeError::TooLarge {
            size: metadata.len(),
            max: max_size,
        });
    }
    Ok(fs::read(path)?)
}

fn parse_face(data: &[u8], face_index: u32) -> Result<ReadFontRef<'_>, ShapeError> {
    ReadFontRef::from_index(data, face_index)
        .map_err(|e| ShapeError::InvalidData(format!("face {face_index}: {e}")))
}

fn glyph_count(font: &ReadFontRef<'_>) -> u32 {
    font.maxp().map(|maxp| u32::from(maxp.num_glyphs())).unwrap_or(0)
}

impl ShapeSource for FontSource {
    fn name(&self) -> &'static str {
        "font"
    }

    fn load(&self) -> Result<LoadedShape, ShapeError> {
        let data = read_font_file(&self.path, MAX_FONT_SIZE)?;
        let font = parse_face(&data, self.face_index)?;
        let location = self.location(&font);
        let glyph_id = self.resolve_glyph(&font, glyph_count(&font))?;

        let font_metrics = font.metrics(Size::unscaled(), &location);
        let unit_size = f64::from(font_metrics.units_per_em);
        let line_height = f64::from(font_metrics.ascent - font_metrics.descent + font_metrics.leading);
        let advance = font
            .glyph_metrics(Size::unscaled(), &location)
            .advance_width(glyph_id)
            .map(f64::from)
            .unwrap_or(0.0);

        let mut pen = ShapePen::new();
        match font.outline_glyphs().get(glyph_id) {
            Some(outline) => {
                let settings = DrawSettings::unhinted(Size::unscaled(), &location);
                outline
                    .draw(settings, &mut pen)
                    .map_err(|e| ShapeError::InvalidData(format!("glyph {}: {e:?}", glyph_id.to_u32())))?;
            },
            None => log::debug!("Glyph {} has no outline", glyph_id.to_u32()),
        }
        let shape = pen.finish();
        log::debug!(
            "Loaded glyph {} from {}: {} contours, {} units per em",
            glyph_id.to_u32(),
            self.path.display(),
            shape.contours.len(),
            unit_size
        );

        Ok(LoadedShape {
            shape,
            metrics: Metrics::font(unit_size, line_height, advance),
        })
    }
}

/// Face-level facts, for tooling
#[derive(Debug, Clone, PartialEq)]
pub struct FontSummary {
    pub units_per_em: u16,
    pub glyph_count: u32,
    pub line_height: f64,
    /// Variation axes as (tag, min, default, max)
    pub axes: Vec<(String, f32, f32, f32)>,
}

/// Read the basic facts of one face without drawing anything
pub fn summarize(path: &Path, face_index: u32) -> Result<FontSummary, ShapeError> {
    let data = read_font_file(path, MAX_FONT_SIZE)?;
    let font = parse_face(&data, face_index)?;
    let metrics = font.metrics(Size::unscaled(), &Location::default());
    let axes = font
        .axes()
        .iter()
        .map(|axis| {
            (
                axis.tag().to_string(),
                axis.min_value(),
                axis.default_value(),
                axis.max_value(),
            )
        })
        .collect();
    Ok(FontSummary {
        units_per_em: metrics.units_per_em,
        glyph_count: glyph_count(&font),
        line_height: f64::from(metrics.ascent - metrics.descent + metrics.leading),
        axes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphsdf_core::types::EmptyReason;

    fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("glyphsdf-font-{}-{name}", std::process::id()));
        if let Err(e) = fs::write(&path, bytes) {
            unreachable!("could not write temp file: {e}");
        }
        path
    }

    #[test]
    fn test_selector_from_code() {
        assert_eq!(GlyphSelector::from_code(65, false), GlyphSelector::Codepoint(65));
        assert_eq!(GlyphSelector::from_code(65, true), GlyphSelector::Index(65));
    }

    #[test]
    fn test_missing_file() {
        let source = FontSource::new("/nonexistent/glyphsdf/missing.ttf", GlyphSelector::Codepoint(65));
        match source.load() {
            Err(e) => assert_eq!(e.reason(), EmptyReason::ResourceUnavailable),
            Ok(_) => unreachable!("missing file should not load"),
        }
    }

    #[test]
    fn test_garbage_data() {
        let path = temp_file("garbage.ttf", b"definitely not a font file");
        let source = FontSource::new(&path, GlyphSelector::Codepoint(65));
        let result = source.load();
        let _ = fs::remove_file(&path);
        match result {
            Err(e) => assert_eq!(e.reason(), EmptyReason::ShapeLoadFailed),
            Ok(_) => unreachable!("garbage should not parse"),
        }
    }

    #[test]
    fn test_size_guard() {
        let path = temp_file("big.ttf", &[0u8; 64]);
        let result = read_font_file(&path, 32);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ShapeError::TooLarge { size: 64, max: 32 })));
    }
}
