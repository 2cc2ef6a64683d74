//! CLI argument definitions using Clap v4

use clap::{Args, Parser, Subcommand, ValueEnum};
use glyphsdf::config::DEFAULT_ANGLE_THRESHOLD;
use glyphsdf::types::PixelFormat;
use glyphsdf::SdfConfig;
use std::path::PathBuf;

/// glyphsdf - Distance fields for font glyphs and SVG icons
#[derive(Parser, Debug)]
#[command(name = "glyphsdf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log each pipeline stage (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the distance field of one font glyph
    #[command(alias = "f")]
    Font(FontArgs),

    /// Build the distance field of one path in an SVG icon
    #[command(alias = "s")]
    Svg(SvgArgs),

    /// Process buildFontGlyph/buildSVGGlyph jobs from a JSONL file
    Batch(BatchArgs),

    /// Display pixel formats, defaults and optionally a font summary
    #[command(alias = "i")]
    Info(InfoArgs),
}

/// Distance field type as named on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Sdf,
    Psdf,
    Msdf,
    Mtsdf,
}

impl From<FieldType> for PixelFormat {
    fn from(field: FieldType) -> Self {
        match field {
            FieldType::Sdf => PixelFormat::Sdf,
            FieldType::Psdf => PixelFormat::Psdf,
            FieldType::Msdf => PixelFormat::Msdf,
            FieldType::Mtsdf => PixelFormat::Mtsdf,
        }
    }
}

/// Sampling parameters and engine settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct FieldOptions {
    /// Em size (font) or document height (icon) in pixels
    #[arg(short = 's', long, default_value_t = 32.0)]
    pub size: f64,

    /// Width of the distance band in pixels
    #[arg(short = 'r', long, default_value_t = 4.0)]
    pub range: f64,

    /// Corner angle threshold in radians for edge coloring
    #[arg(long, default_value_t = DEFAULT_ANGLE_THRESHOLD)]
    pub angle_threshold: f64,

    /// Seed for the edge color cycle
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Leave clashing multi-channel pixels as sampled
    #[arg(long)]
    pub no_error_correction: bool,

    /// Refuse canvases wider or taller than this
    #[arg(long)]
    pub max_dimension: Option<u32>,
}

impl FieldOptions {
    pub fn config(&self) -> SdfConfig {
        let mut config = SdfConfig::default()
            .with_coloring_seed(self.seed)
            .with_error_correction(!self.no_error_correction);
        config.angle_threshold = self.angle_threshold;
        if let Some(max) = self.max_dimension {
            config = config.with_max_dimension(max);
        }
        config
    }
}

#[derive(Args, Debug)]
pub struct FontArgs {
    /// Font file path (.ttf, .otf, .ttc, .otc)
    pub font: PathBuf,

    /// Character (`A`), codepoint (`65`, `U+0041`) or glyph id with --index
    #[arg(short = 'c', long, value_parser = parse_code)]
    pub code: u32,

    /// Treat --code as a glyph index
    #[arg(long)]
    pub index: bool,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long, default_value_t = 0)]
    pub face_index: u32,

    /// Variable font axis setting, e.g. wght=700 (repeatable)
    #[arg(long = "variation", value_parser = parse_variation)]
    pub variations: Vec<(String, f32)>,

    #[arg(short = 't', long = "type", value_enum, default_value = "sdf")]
    pub field_type: FieldType,

    #[command(flatten)]
    pub field: FieldOptions,

    /// Output file (.png, .raw, .bin, .json); metrics go to stdout if omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SvgArgs {
    /// SVG document path
    pub icon: PathBuf,

    /// Zero-based path index, depth-first in document order
    #[arg(short = 'p', long, default_value_t = 0)]
    pub path_index: usize,

    #[arg(short = 't', long = "type", value_enum, default_value = "mtsdf", conflicts_with = "no_alpha")]
    pub field_type: FieldType,

    /// Three-byte MSDF without an alpha channel
    #[arg(long)]
    pub no_alpha: bool,

    #[command(flatten)]
    pub field: FieldOptions,

    /// Output file (.png, .raw, .bin, .json); metrics go to stdout if omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl SvgArgs {
    pub fn format(&self) -> PixelFormat {
        if self.no_alpha {
            PixelFormat::MsdfRgb
        } else {
            self.field_type.into()
        }
    }
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSONL job file (reads stdin if omitted)
    pub input: Option<PathBuf>,

    /// Write result lines here instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// Suppress the summary on stderr
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Seed for the edge color cycle
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Leave clashing multi-channel pixels as sampled
    #[arg(long)]
    pub no_error_correction: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// List pixel formats and their strides
    #[arg(long)]
    pub formats: bool,

    /// List default parameters
    #[arg(long)]
    pub defaults: bool,

    /// Summarize a font file
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Face index used with --font
    #[arg(short = 'y', long, default_value_t = 0)]
    pub face_index: u32,

    /// Count the paths of an SVG document
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

/// `A`, `65`, `0x41` or `U+0041`
pub fn parse_code(raw: &str) -> Result<u32, String> {
    let hex = raw
        .strip_prefix("U+")
        .or_else(|| raw.strip_prefix("u+"))
        .or_else(|| raw.strip_prefix("0x"));
    if let Some(hex) = hex {
        return u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex code {raw:?}: {e}"));
    }
    if let Ok(code) = raw.parse::<u32>() {
        return Ok(code);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => Err(format!("expected a single character or a number, got {raw:?}")),
    }
}

/// `wght=700`
pub fn parse_variation(raw: &str) -> Result<(String, f32), String> {
    let (tag, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=VALUE, got {raw:?}"))?;
    let tag = tag.trim();
    if tag.len() != 4 {
        return Err(format!("axis tag must be 4 characters, got {tag:?}"));
    }
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid value for {tag}: {e}"))?;
    Ok((tag.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("A"), Ok(65));
        assert_eq!(parse_code("65"), Ok(65));
        assert_eq!(parse_code("U+0041"), Ok(65));
        assert_eq!(parse_code("0x41"), Ok(65));
        // Digits are numbers, not characters
        assert_eq!(parse_code("7"), Ok(7));
        assert_eq!(parse_code("é"), Ok(0xE9));
        assert!(parse_code("AB").is_err());
        assert!(parse_code("U+ZZ").is_err());
    }

    #[test]
    fn test_parse_variation() {
        assert_eq!(parse_variation("wght=700"), Ok(("wght".to_string(), 700.0)));
        assert!(parse_variation("wght").is_err());
        assert!(parse_variation("weight=700").is_err());
    }

    #[test]
    fn test_svg_no_alpha() {
        let cli = match Cli::try_parse_from(["glyphsdf", "svg", "icon.svg", "--no-alpha"]) {
            Ok(cli) => cli,
            Err(e) => unreachable!("parse failed: {e}"),
        };
        match cli.command {
            Commands::Svg(args) => assert_eq!(args.format(), PixelFormat::MsdfRgb),
            other => unreachable!("unexpected command {other:?}"),
        }
    }
}
