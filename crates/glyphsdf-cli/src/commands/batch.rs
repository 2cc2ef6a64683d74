//! Batch command implementation
//!
//! Reads one job per line, runs them on the rayon pool and writes one
//! result line per job, in input order:
//!
//! ```text
//! {"id":"A","op":"buildFontGlyph","args":["Inter.ttf",65,32,4,"msdf"]}
//! {"id":"home","op":"buildSVGGlyph","args":["home.svg",48,6,0,true]}
//! ```
//!
//! A job that cannot be parsed or fails its argument checks becomes an
//! `error` line; the batch keeps going.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use glyphsdf::boundary::{build_font_glyph_with, build_svg_glyph_with};
use glyphsdf::response::GlyphResponse;
use glyphsdf::{Generator, SdfConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::BatchArgs;

/// One line of input
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJob {
    /// Echoed back untouched
    #[serde(default)]
    pub id: Value,
    /// `buildFontGlyph` or `buildSVGGlyph`
    pub op: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// One line of output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub id: Value,
    /// `ok`, `empty` or `error`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GlyphResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    fn error(id: Value, message: impl Into<String>) -> Self {
        Self {
            id,
            status: "error",
            result: None,
            error: Some(message.into()),
        }
    }

    fn from_response(id: Value, response: GlyphResponse) -> Self {
        let status = if response.is_empty() { "empty" } else { "ok" };
        Self {
            id,
            status,
            result: Some(response),
            error: None,
        }
    }
}

/// Run one raw input line
pub fn process_line(generator: &Generator, line_num: usize, line: &str) -> BatchResult {
    let job: BatchJob = match serde_json::from_str(line) {
        Ok(job) => job,
        Err(e) => {
            log::error!("Line {line_num}: Failed to parse JSON: {e}");
            return BatchResult::error(Value::from(line_num), format!("line {line_num}: {e}"));
        },
    };
    let response = match job.op.as_str() {
        "buildFontGlyph" => build_font_glyph_with(generator, &job.args),
        "buildSVGGlyph" => build_svg_glyph_with(generator, &job.args),
        other => return BatchResult::error(job.id, format!("unknown op {other:?}")),
    };
    match response {
        Ok(response) => BatchResult::from_response(job.id, response),
        Err(e) => BatchResult::error(job.id, e.to_string()),
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let start = Instant::now();

    if args.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read job line")?;
        if !line.trim().is_empty() {
            lines.push((index + 1, line));
        }
    }
    log::info!("Processing {} jobs", lines.len());

    let config = SdfConfig::default()
        .with_coloring_seed(args.seed)
        .with_error_correction(!args.no_error_correction);
    let generator = Generator::with_config(config)?;

    let results: Vec<BatchResult> = lines
        .par_iter()
        .map(|(line_num, line)| process_line(&generator, *line_num, line))
        .collect();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(io::BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    for result in &results {
        serde_json::to_writer(&mut out, result).context("Failed to write JSON result")?;
        writeln!(out).context("Failed to write newline")?;
    }
    out.flush().context("Failed to flush results")?;

    if !args.quiet {
        let failed = results.iter().filter(|r| r.status == "error").count();
        let empty = results.iter().filter(|r| r.status == "empty").count();
        eprintln!(
            "Completed {} jobs ({} empty, {} errors) in {:.2}s",
            results.len(),
            empty,
            failed,
            start.elapsed().as_secs_f64()
        );
    }
    Ok(())
}
