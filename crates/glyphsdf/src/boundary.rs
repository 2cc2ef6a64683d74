//! Loosely typed entry points: argument lists in, response objects out
//!
//! Script hosts and batch files pass arguments as plain JSON values. The
//! checks here run before anything touches the filesystem, so a bad call
//! always fails with an argument error, never with a missing file.
//!
//! ```text
//! buildFontGlyph(fontPath, code, size, range, type[, codeIsIndex])
//! buildSVGGlyph(iconPath, size, range, pathIndex, useAlpha | type)
//! ```
//!
//! Past the checks, nothing is loud any more: a glyph that cannot be drawn
//! comes back as a [`GlyphResponse`] with no fields set.

use serde_json::Value;
use thiserror::Error;

use crate::response::GlyphResponse;
use crate::{FontGlyphRequest, Generator, SvgGlyphRequest};
use glyphsdf_core::{types::PixelFormat, SdfError};

/// Failures a dynamic caller can see
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Sdf(#[from] SdfError),
}

pub type Result<T> = std::result::Result<T, BoundaryError>;

fn invalid(message: impl Into<String>) -> BoundaryError {
    BoundaryError::InvalidArguments(message.into())
}

fn string_arg<'a>(args: &'a [Value], position: usize, name: &str) -> Result<&'a str> {
    args[position]
        .as_str()
        .ok_or_else(|| invalid(format!("argument {} ({name}) must be a string", position + 1)))
}

fn number_arg(args: &[Value], position: usize, name: &str) -> Result<f64> {
    args[position]
        .as_f64()
        .ok_or_else(|| invalid(format!("argument {} ({name}) must be a number", position + 1)))
}

fn bool_arg(args: &[Value], position: usize, name: &str) -> Result<bool> {
    args[position]
        .as_bool()
        .ok_or_else(|| invalid(format!("argument {} ({name}) must be a boolean", position + 1)))
}

/// Non-negative whole number that fits `max`
fn index_arg(args: &[Value], position: usize, name: &str, max: u64) -> Result<u64> {
    let value = number_arg(args, position, name)?;
    if value.fract() != 0.0 || value < 0.0 || value > max as f64 {
        return Err(invalid(format!(
            "argument {} ({name}) must be a whole number between 0 and {max}, got {value}",
            position + 1
        )));
    }
    Ok(value as u64)
}

/// Check a `buildFontGlyph` argument list and turn it into a request
pub fn parse_font_args(args: &[Value]) -> Result<FontGlyphRequest> {
    if args.len() != 5 && args.len() != 6 {
        return Err(invalid(format!(
            "expected 5 or 6 arguments (fontPath, code, size, range, type[, codeIsIndex]), got {}",
            args.len()
        )));
    }
    let font_path = string_arg(args, 0, "fontPath")?;
    let code = index_arg(args, 1, "code", u64::from(u32::MAX))? as u32;
    let size = number_arg(args, 2, "size")?;
    let range = number_arg(args, 3, "range")?;
    let format = PixelFormat::from_type_name(string_arg(args, 4, "type")?);
    let code_is_index = match args.get(5) {
        Some(_) => bool_arg(args, 5, "codeIsIndex")?,
        None => false,
    };

    let mut request = FontGlyphRequest::new(font_path, code)
        .with_size(size)
        .with_range(range)
        .with_format(format);
    request.code_is_index = code_is_index;
    Ok(request)
}

/// Check a `buildSVGGlyph` argument list and turn it into a request
pub fn parse_svg_args(args: &[Value]) -> Result<SvgGlyphRequest> {
    if args.len() != 5 {
        return Err(invalid(format!(
            "expected 5 arguments (iconPath, size, range, pathIndex, useAlpha|type), got {}",
            args.len()
        )));
    }
    let icon_path = string_arg(args, 0, "iconPath")?;
    let size = number_arg(args, 1, "size")?;
    let range = number_arg(args, 2, "range")?;
    let path_index = index_arg(args, 3, "pathIndex", i32::MAX as u64)? as usize;
    let format = match &args[4] {
        Value::Bool(use_alpha) => PixelFormat::from_use_alpha(*use_alpha),
        Value::String(name) => PixelFormat::from_type_name(name),
        _ => return Err(invalid("argument 5 (useAlpha) must be a boolean or a type name")),
    };

    Ok(SvgGlyphRequest::new(icon_path, path_index)
        .with_size(size)
        .with_range(range)
        .with_format(format))
}

/// `buildFontGlyph` with the default generator
pub fn build_font_glyph(args: &[Value]) -> Result<GlyphResponse> {
    let request = parse_font_args(args)?;
    Ok(Generator::new()?.font_glyph(&request)?.into())
}

/// `buildSVGGlyph` with the default generator
pub fn build_svg_glyph(args: &[Value]) -> Result<GlyphResponse> {
    let request = parse_svg_args(args)?;
    Ok(Generator::new()?.svg_glyph(&request)?.into())
}

/// `buildFontGlyph` on a caller-configured generator
pub fn build_font_glyph_with(generator: &Generator, args: &[Value]) -> Result<GlyphResponse> {
    let request = parse_font_args(args)?;
    Ok(generator.font_glyph(&request)?.into())
}

/// `buildSVGGlyph` on a caller-configured generator
pub fn build_svg_glyph_with(generator: &Generator, args: &[Value]) -> Result<GlyphResponse> {
    let request = parse_svg_args(args)?;
    Ok(generator.svg_glyph(&request)?.into())
}
