//! Glyphsdf SVG: icons as outlines
//!
//! An [`SvgSource`] picks one path out of an SVG document. `usvg` does the
//! hard part (CSS, `use` references, basic shapes turned into paths,
//! `viewBox` mapping); this crate walks the resulting tree and hands the
//! chosen path to the pipeline.
//!
//! Paths are numbered depth-first in document order, nested groups
//! included. Basic shapes (`<rect>`, `<circle>`, `<ellipse>`, `<line>`,
//! `<polyline>`, `<polygon>`) reach us as paths and take an index too, so
//! a document that mixes them with `<path>` elements numbers differently
//! than a `<path>`-only walk would. Each one is baked with its absolute transform and flipped so
//! that Y grows upward, the same way font outlines arrive. The natural unit
//! size of an icon is its document height.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glyphsdf_core::{outline::OutlineBuilder, types::Metrics, LoadedShape, ShapeError, ShapeSource};
use usvg::tiny_skia_path::PathSegment;

/// Documents larger than this are refused before parsing
pub const MAX_SVG_SIZE: u64 = 16 * 1024 * 1024;

/// One path inside one SVG document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgSource {
    path: PathBuf,
    path_index: usize,
}

impl SvgSource {
    pub fn new(path: impl Into<PathBuf>, path_index: usize) -> Self {
        Self {
            path: path.into(),
            path_index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }
}

fn read_svg_file(path: &Path) -> Result<Vec<u8>, ShapeError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ShapeError::FileNotFound(path.display().to_string()),
        _ => ShapeError::Io(e),
    })?;
    if metadata.len() > MAX_SVG_SIZE {
        return Err(ShapeError::TooLarge {
            size: metadata.len(),
            max: MAX_SVG_SIZE,
        });
    }
    Ok(fs::read(path)?)
}

fn parse_document(data: &[u8]) -> Result<usvg::Tree, ShapeError> {
    let options = usvg::Options::default();
    usvg::Tree::from_data(data, &options).map_err(|e| ShapeError::InvalidData(e.to_string()))
}

/// Depth-first, document order
fn collect_paths<'a>(group: &'a usvg::Group, out: &mut Vec<&'a usvg::Path>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(child) => collect_paths(child, out),
            usvg::Node::Path(path) => out.push(path),
            // Raster images carry no outline; text is skipped
            _ => {},
        }
    }
}

/// Replay one usvg path into an outline, Y flipped around `height`
fn trace_path(path: &usvg::Path, height: f64) -> Result<OutlineBuilder, ShapeError> {
    let data = path
        .data()
        .clone()
        .transform(path.abs_transform())
        .ok_or_else(|| ShapeError::InvalidData(format!("path {:?} has no finite geometry", path.id())))?;

    let flip = |p: usvg::tiny_skia_path::Point| (f64::from(p.x), height - f64::from(p.y));
    let mut builder = OutlineBuilder::new();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                let (x, y) = flip(p);
                builder.move_to(x, y);
            },
            PathSegment::LineTo(p) => {
                let (x, y) = flip(p);
                builder.line_to(x, y);
            },
            PathSegment::QuadTo(c, p) => {
                let (cx, cy) = flip(c);
                let (x, y) = flip(p);
                builder.quad_to(cx, cy, x, y);
            },
            PathSegment::CubicTo(c1, c2, p) => {
                let (c1x, c1y) = flip(c1);
                let (c2x, c2y) = flip(c2);
                let (x, y) = flip(p);
                builder.curve_to(c1x, c1y, c2x, c2y, x, y);
            },
            PathSegment::Close => builder.close(),
        }
    }
    Ok(builder)
}

/// How many paths a document offers to `path_index`
pub fn path_count(path: &Path) -> Result<usize, ShapeError> {
    let tree = parse_document(&read_svg_file(path)?)?;
    let mut paths = Vec::new();
    collect_paths(tree.root(), &mut paths);
    Ok(paths.len())
}

impl ShapeSource for SvgSource {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn load(&self) -> Result<LoadedShape, ShapeError> {
        let data = read_svg_file(&self.path)?;
        let tree = parse_document(&data)?;
        let height = f64::from(tree.size().height());

        let mut paths = Vec::new();
        collect_paths(tree.root(), &mut paths);
        let chosen = paths
            .get(self.path_index)
            .ok_or(ShapeError::PathIndexOutOfRange {
                index: self.path_index,
                count: paths.len(),
            })?;

        let shape = trace_path(chosen, height)?.finish();
        log::debug!(
            "Loaded path {} of {} from {}: {} contours, height {}",
            self.path_index,
            paths.len(),
            self.path.display(),
            shape.contours.len(),
            height
        );

        Ok(LoadedShape {
            shape,
            metrics: Metrics::icon(height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphsdf_core::types::EmptyReason;

    fn temp_svg(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("glyphsdf-svg-{}-{name}.svg", std::process::id()));
        if let Err(e) = fs::write(&path, body) {
            unreachable!("could not write temp file: {e}");
        }
        path
    }

    fn load(name: &str, body: &str, index: usize) -> Result<LoadedShape, ShapeError> {
        let path = temp_svg(name, body);
        let result = SvgSource::new(&path, index).load();
        let _ = fs::remove_file(&path);
        result
    }

    const TWO_PATHS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50" viewBox="0 0 100 50">
  <path d="M10 10 L40 10 L40 40 L10 40 Z"/>
  <g transform="translate(50 0)">
    <path d="M0 0 L20 0 L20 10 Z"/>
  </g>
</svg>"#;

    #[test]
    fn test_first_path_is_flipped() {
        let loaded = match load("first", TWO_PATHS, 0) {
            Ok(l) => l,
            Err(e) => unreachable!("load failed: {e}"),
        };
        assert_eq!(loaded.metrics.unit_size, 50.0);
        assert_eq!(loaded.metrics.line_height, None);
        assert_eq!(loaded.metrics.advance, 0.0);
        let bounds = match loaded.shape.bounds() {
            Some(b) => b,
            None => unreachable!("square has bounds"),
        };
        assert!((bounds.left - 10.0).abs() < 1e-4);
        assert!((bounds.right - 40.0).abs() < 1e-4);
        // y' = 50 - y
        assert!((bounds.bottom - 10.0).abs() < 1e-4);
        assert!((bounds.top - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_nested_path_gets_group_transform() {
        let loaded = match load("nested", TWO_PATHS, 1) {
            Ok(l) => l,
            Err(e) => unreachable!("load failed: {e}"),
        };
        let bounds = match loaded.shape.bounds() {
            Some(b) => b,
            None => unreachable!("triangle has bounds"),
        };
        assert!((bounds.left - 50.0).abs() < 1e-4);
        assert!((bounds.right - 70.0).abs() < 1e-4);
        assert!((bounds.top - 50.0).abs() < 1e-4);
        assert!((bounds.bottom - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_path_index_out_of_range() {
        match load("range", TWO_PATHS, 2) {
            Err(ShapeError::PathIndexOutOfRange { index: 2, count: 2 }) => {},
            other => unreachable!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_malformed() {
        match SvgSource::new("/nonexistent/glyphsdf/icon.svg", 0).load() {
            Err(e) => assert_eq!(e.reason(), EmptyReason::ResourceUnavailable),
            Ok(_) => unreachable!("missing file should not load"),
        }
        match load("broken", "<svg><path d=", 0) {
            Err(e) => assert_eq!(e.reason(), EmptyReason::ShapeLoadFailed),
            Ok(_) => unreachable!("broken document should not parse"),
        }
    }

    #[test]
    fn test_path_count() {
        let path = temp_svg("count", TWO_PATHS);
        let count = path_count(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(count, Ok(2)));
    }

    #[test]
    fn test_basic_shapes_take_path_indices() {
        let body = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40">
  <rect x="2" y="2" width="10" height="10"/>
  <path d="M20 20 L30 20 L30 30 Z"/>
  <circle cx="30" cy="8" r="4"/>
</svg>"#;
        let path = temp_svg("shapes", body);
        let count = path_count(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(count, Ok(3)), "{count:?}");

        // The <path> element is index 1 because the rect comes first
        let loaded = match load("shapes-path", body, 1) {
            Ok(l) => l,
            Err(e) => unreachable!("load failed: {e}"),
        };
        let bounds = match loaded.shape.bounds() {
            Some(b) => b,
            None => unreachable!("triangle has bounds"),
        };
        assert!((bounds.left - 20.0).abs() < 1e-4);
        assert!((bounds.right - 30.0).abs() < 1e-4);
    }
}
