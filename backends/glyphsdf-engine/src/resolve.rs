//! Rejecting outlines whose inside is ambiguous
//!
//! A contour that crosses itself has regions counted both ways, so the
//! sign of the distance next to the crossing depends on which edge happens
//! to be nearest. Overlaps between separate contours are common in
//! variable fonts; the sampler combines contours by winding, so they pass.

use glyphsdf_core::outline::{Contour, EdgeSegment, Shape};
use kurbo::Point;

/// Polyline steps per curve when looking for crossings
const QUAD_STEPS: usize = 8;
const CUBIC_STEPS: usize = 12;

/// Whether every contour is finite and free of self-crossings
pub fn is_resolvable(shape: &Shape) -> bool {
    if !shape.edges().all(|edge| edge.segment.is_finite()) {
        log::debug!("Outline has non-finite coordinates");
        return false;
    }
    for (index, contour) in shape.contours.iter().enumerate() {
        if crosses_itself(contour) {
            log::debug!("Contour {index} crosses itself");
            return false;
        }
    }
    true
}

fn flatten(contour: &Contour) -> Vec<Point> {
    let mut points = Vec::new();
    for edge in &contour.edges {
        let steps = match edge.segment {
            EdgeSegment::Line(_) => 1,
            EdgeSegment::Quad(_) => QUAD_STEPS,
            EdgeSegment::Cubic(_) => CUBIC_STEPS,
        };
        for i in 0..steps {
            points.push(edge.segment.point(i as f64 / steps as f64));
        }
    }
    points
}

/// One polyline step with its horizontal extent
struct Step {
    index: usize,
    from: Point,
    to: Point,
    min_x: f64,
    max_x: f64,
}

fn crosses_itself(contour: &Contour) -> bool {
    let points = flatten(contour);
    let n = points.len();
    if n < 4 {
        return false;
    }
    let mut steps: Vec<Step> = (0..n)
        .map(|index| {
            let from = points[index];
            let to = points[(index + 1) % n];
            Step {
                index,
                from,
                to,
                min_x: from.x.min(to.x),
                max_x: from.x.max(to.x),
            }
        })
        .collect();
    steps.sort_by(|a, b| a.min_x.total_cmp(&b.min_x));

    // Sweep left to right; only steps whose x ranges overlap can cross
    for (i, a) in steps.iter().enumerate() {
        for b in &steps[i + 1..] {
            if b.min_x > a.max_x {
                break;
            }
            if adjacent(a.index, b.index, n) {
                continue;
            }
            if properly_intersect(a.from, a.to, b.from, b.to) {
                return true;
            }
        }
    }
    false
}

/// Neighbouring steps share an endpoint
fn adjacent(a: usize, b: usize, n: usize) -> bool {
    (a + 1) % n == b || (b + 1) % n == a
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Strict crossing: touching or collinear overlap does not count
fn properly_intersect(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    if a0.x.max(a1.x) < b0.x.min(b1.x)
        || b0.x.max(b1.x) < a0.x.min(a1.x)
        || a0.y.max(a1.y) < b0.y.min(b1.y)
        || b0.y.max(b1.y) < a0.y.min(a1.y)
    {
        return false;
    }
    let d1 = orientation(b0, b1, a0);
    let d2 = orientation(b0, b1, a1);
    let d3 = orientation(a0, a1, b0);
    let d4 = orientation(a0, a1, b1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphsdf_core::outline::OutlineBuilder;

    #[test]
    fn test_square_resolves() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(0.0, 10.0);
        builder.line_to(10.0, 10.0);
        builder.line_to(10.0, 0.0);
        assert!(is_resolvable(&builder.finish()));
    }

    #[test]
    fn test_bow_tie_is_rejected() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(10.0, 10.0);
        builder.line_to(10.0, 0.0);
        builder.line_to(0.0, 10.0);
        assert!(!is_resolvable(&builder.finish()));
    }

    #[test]
    fn test_overlapping_contours_are_allowed() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(0.0, 10.0);
        builder.line_to(10.0, 10.0);
        builder.line_to(10.0, 0.0);
        builder.move_to(5.0, 5.0);
        builder.line_to(5.0, 15.0);
        builder.line_to(15.0, 15.0);
        builder.line_to(15.0, 5.0);
        assert!(is_resolvable(&builder.finish()));
    }

    #[test]
    fn test_curved_contour_resolves() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.quad_to(0.0, 10.0, 10.0, 10.0);
        builder.quad_to(20.0, 10.0, 20.0, 0.0);
        assert!(is_resolvable(&builder.finish()));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(f64::NAN, 10.0);
        builder.line_to(10.0, 0.0);
        assert!(!is_resolvable(&builder.finish()));
    }

    #[test]
    fn test_closing_edge_through_teeth_is_rejected() {
        // A long zig-zag whose closing edge cuts back through the first tooth
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        for i in 0..200 {
            let x = f64::from(i) * 2.0;
            builder.line_to(x + 1.0, 10.0);
            builder.line_to(x + 2.0, 0.0);
        }
        builder.line_to(400.0, -10.0);
        builder.line_to(0.5, 8.0);
        assert!(!is_resolvable(&builder.finish()));
    }

    #[test]
    fn test_long_wavy_ring_resolves_quickly() {
        // 4000 cubics whose control points sit on a wavy circle
        let count = 4000;
        let point = |k: usize| {
            let angle = std::f64::consts::TAU * k as f64 / (3 * count) as f64;
            let radius = 1000.0 + 5.0 * (angle * 400.0).sin();
            (radius * angle.cos(), -radius * angle.sin())
        };
        let mut builder = OutlineBuilder::new();
        let (x0, y0) = point(0);
        builder.move_to(x0, y0);
        for i in 1..=count {
            let (xa, ya) = point(3 * i - 2);
            let (xb, yb) = point(3 * i - 1);
            let (x, y) = point(3 * i);
            builder.curve_to(xa, ya, xb, yb, x, y);
        }
        let shape = builder.finish();
        assert!(shape.edge_count() >= count);

        let start = std::time::Instant::now();
        assert!(is_resolvable(&shape));
        assert!(start.elapsed().as_secs_f64() < 2.0, "took {:?}", start.elapsed());
    }

    #[test]
    fn test_empty_shape_resolves() {
        assert!(is_resolvable(&Shape::default()));
    }
}
