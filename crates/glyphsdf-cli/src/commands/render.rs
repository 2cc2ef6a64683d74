//! Font and SVG commands
//!
//! Both build one glyph, then either write it through an exporter chosen by
//! the output extension or print its metrics as JSON.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use glyphsdf::types::{GlyphOutcome, GlyphResult};
use glyphsdf::{FontGlyphRequest, Generator, SvgGlyphRequest};
use glyphsdf_export::{exporter_for_extension, Exporter, JsonExporter};

use crate::cli::{FontArgs, SvgArgs};

pub fn run_font(args: &FontArgs) -> Result<()> {
    let mut request = FontGlyphRequest::new(&args.font, args.code)
        .with_size(args.field.size)
        .with_range(args.field.range)
        .with_format(args.field_type.into())
        .with_face_index(args.face_index)
        .with_variations(args.variations.clone());
    request.code_is_index = args.index;

    let generator = Generator::with_config(args.field.config())?;
    let outcome = generator
        .font_glyph(&request)
        .with_context(|| format!("Failed to build glyph from {}", args.font.display()))?;
    finish(outcome, args.output.as_deref())
}

pub fn run_svg(args: &SvgArgs) -> Result<()> {
    let request = SvgGlyphRequest::new(&args.icon, args.path_index)
        .with_size(args.field.size)
        .with_range(args.field.range)
        .with_format(args.format());

    let generator = Generator::with_config(args.field.config())?;
    let outcome = generator
        .svg_glyph(&request)
        .with_context(|| format!("Failed to build icon from {}", args.icon.display()))?;
    finish(outcome, args.output.as_deref())
}

fn finish(outcome: GlyphOutcome, output: Option<&Path>) -> Result<()> {
    let glyph = match outcome {
        GlyphOutcome::Ready(glyph) => glyph,
        GlyphOutcome::Empty(reason) => bail!("Nothing to draw: {reason}"),
    };
    match output {
        Some(path) => write_output(&glyph, path),
        None => {
            let json = JsonExporter::with_pretty_print().export(&glyph)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&json).context("Failed to write metrics")?;
            writeln!(handle).context("Failed to write newline")?;
            Ok(())
        },
    }
}

fn write_output(glyph: &GlyphResult, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| anyhow!("Output {} has no extension", path.display()))?;
    let exporter = exporter_for_extension(extension)
        .ok_or_else(|| anyhow!("Unsupported output format: .{extension} (use png, raw, bin or json)"))?;

    let bytes = exporter.export(glyph)?;
    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!(
        "Wrote {} {}x{} {} ({} bytes) to {}",
        exporter.name(),
        glyph.bitmap.width,
        glyph.bitmap.height,
        glyph.bitmap.format,
        bytes.len(),
        path.display()
    );
    Ok(())
}
