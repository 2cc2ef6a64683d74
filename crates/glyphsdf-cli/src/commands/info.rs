//! Info command implementation
//!
//! Displays pixel formats, defaults, and facts about a font or SVG file.

use anyhow::{Context, Result};
use glyphsdf::config::{DEFAULT_ANGLE_THRESHOLD, DEFAULT_CLASH_THRESHOLD};
use glyphsdf::types::PixelFormat;
use glyphsdf::{SdfConfig, SdfParams};

use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    let show_all = !args.formats && !args.defaults && args.font.is_none() && args.svg.is_none();

    println!("glyphsdf v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if show_all || args.formats {
        print_formats();
        if show_all {
            println!();
        }
    }

    if show_all || args.defaults {
        print_defaults();
    }

    if let Some(path) = &args.font {
        let summary = glyphsdf_font::summarize(path, args.face_index)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        println!("Font {} (face {}):", path.display(), args.face_index);
        println!("  units per em      {}", summary.units_per_em);
        println!("  glyphs            {}", summary.glyph_count);
        println!("  line height       {}", summary.line_height);
        for (tag, min, default, max) in &summary.axes {
            println!("  axis {tag}         {min} .. {default} .. {max}");
        }
    }

    if let Some(path) = &args.svg {
        let count = glyphsdf_svg::path_count(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        println!("SVG {}: {count} paths", path.display());
    }

    Ok(())
}

fn print_formats() {
    println!("Pixel formats:");
    for format in PixelFormat::ALL {
        let channels = format.sampling_mode().channels();
        println!(
            "  {:<10} {} byte(s)/pixel, {} sampled channel(s)",
            format.type_name(),
            format.bytes_per_pixel(),
            channels
        );
    }
}

fn print_defaults() {
    let params = SdfParams::default();
    let config = SdfConfig::default();
    println!("Defaults:");
    println!("  size              {}", params.size);
    println!("  range             {}", params.range);
    println!("  type              {}", params.format);
    println!("  angle threshold   {DEFAULT_ANGLE_THRESHOLD}");
    println!("  clash threshold   {DEFAULT_CLASH_THRESHOLD}");
    println!("  coloring seed     {}", config.coloring_seed);
    println!("  max dimension     {}", config.max_dimension);
}
