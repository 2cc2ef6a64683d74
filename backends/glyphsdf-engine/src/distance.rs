//! Signed distance from a point to a single edge segment
//!
//! Positive distances lie to the right of the direction of travel, which
//! for clockwise outer contours (Y up) is the filled side.

use std::cmp::Ordering;

use glyphsdf_core::outline::EdgeSegment;
use kurbo::{Point, Vec2};

use crate::math::{non_zero_sign, normalized, solve_cubic};

/// Newton iterations for cubic nearest-point search
const CUBIC_SEARCH_STARTS: usize = 4;
const CUBIC_SEARCH_STEPS: usize = 4;

/// A distance plus a tie-breaker
///
/// When two edges are equally close (typically at a shared corner), the
/// one whose end tangent points more directly away from the sample point
/// (smaller `dot`) wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    pub distance: f64,
    pub dot: f64,
}

impl SignedDistance {
    pub const INFINITE: SignedDistance = SignedDistance {
        distance: -f64::MAX,
        dot: 1.0,
    };

    pub fn new(distance: f64, dot: f64) -> Self {
        Self { distance, dot }
    }

    pub fn is_closer_than(&self, other: &SignedDistance) -> bool {
        self.cmp_magnitude(other) == Ordering::Less
    }

    fn cmp_magnitude(&self, other: &SignedDistance) -> Ordering {
        let a = self.distance.abs();
        let b = other.distance.abs();
        a.partial_cmp(&b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.dot.partial_cmp(&other.dot).unwrap_or(Ordering::Equal))
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

/// Distance from `origin` to `segment`, plus the curve parameter of the
/// nearest point (outside [0, 1] when an endpoint extension is nearest)
pub fn signed_distance(segment: &EdgeSegment, origin: Point) -> (SignedDistance, f64) {
    match segment {
        EdgeSegment::Line([p0, p1]) => line_distance(*p0, *p1, origin),
        EdgeSegment::Quad([p0, p1, p2]) => quad_distance(segment, *p0, *p1, *p2, origin),
        EdgeSegment::Cubic([p0, p1, p2, p3]) => {
            cubic_distance(segment, *p0, *p1, *p2, *p3, origin)
        },
    }
}

fn line_distance(p0: Point, p1: Point, origin: Point) -> (SignedDistance, f64) {
    let aq = origin - p0;
    let ab = p1 - p0;
    let param = aq.dot(ab) / ab.dot(ab);
    let eq = if param > 0.5 { p1 - origin } else { p0 - origin };
    let endpoint_distance = eq.hypot();
    if param > 0.0 && param < 1.0 {
        let ortho_distance = aq.cross(ab) / ab.hypot();
        if ortho_distance.abs() < endpoint_distance {
            return (SignedDistance::new(ortho_distance, 0.0), param);
        }
    }
    (
        SignedDistance::new(
            non_zero_sign(aq.cross(ab)) * endpoint_distance,
            normalized(ab).dot(normalized(eq)).abs(),
        ),
        param,
    )
}

fn quad_distance(
    segment: &EdgeSegment,
    p0: Point,
    p1: Point,
    p2: Point,
    origin: Point,
) -> (SignedDistance, f64) {
    let qa = p0 - origin;
    let ab = p1 - p0;
    let br = (p2 - p1) - ab;
    let a = br.dot(br);
    let b = 3.0 * ab.dot(br);
    let c = 2.0 * ab.dot(ab) + qa.dot(br);
    let d = qa.dot(ab);
    let solutions = solve_cubic(a, b, c, d);

    let mut ep_dir = segment.direction(0.0);
    let mut min_distance = non_zero_sign(ep_dir.cross(qa)) * qa.hypot();
    let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);

    ep_dir = segment.direction(1.0);
    let end = p2 - origin;
    if end.hypot() < min_distance.abs() {
        min_distance = non_zero_sign(ep_dir.cross(end)) * end.hypot();
        param = (origin - p1).dot(ep_dir) / ep_dir.dot(ep_dir);
    }

    for &t in solutions.as_slice() {
        if t > 0.0 && t < 1.0 {
            let qe = qa + 2.0 * t * ab + t * t * br;
            let distance = qe.hypot();
            if distance <= min_distance.abs() {
                min_distance = non_zero_sign((ab + t * br).cross(qe)) * distance;
                param = t;
            }
        }
    }

    finish(segment, min_distance, param, qa, end)
}

fn cubic_distance(
    segment: &EdgeSegment,
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    origin: Point,
) -> (SignedDistance, f64) {
    let qa = p0 - origin;
    let ab = p1 - p0;
    let br = (p2 - p1) - ab;
    let as_ = ((p3 - p2) - (p2 - p1)) - br;
    let at = |t: f64| qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * as_;

    let mut ep_dir = segment.direction(0.0);
    let mut min_distance = non_zero_sign(ep_dir.cross(qa)) * qa.hypot();
    let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);

    ep_dir = segment.direction(1.0);
    let end = p3 - origin;
    if end.hypot() < min_distance.abs() {
        min_distance = non_zero_sign(ep_dir.cross(end)) * end.hypot();
        param = (ep_dir - end).dot(ep_dir) / ep_dir.dot(ep_dir);
    }

    for i in 0..=CUBIC_SEARCH_STARTS {
        let mut t = i as f64 / CUBIC_SEARCH_STARTS as f64;
        let mut qe = at(t);
        for _ in 0..CUBIC_SEARCH_STEPS {
            let d1 = 3.0 * ab + 6.0 * t * br + 3.0 * t * t * as_;
            let d2 = 6.0 * br + 6.0 * t * as_;
            t -= qe.dot(d1) / (d1.dot(d1) + qe.dot(d2));
            if !(t > 0.0 && t < 1.0) {
                break;
            }
            qe = at(t);
            let distance = qe.hypot();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(segment.direction(t).cross(qe)) * distance;
                param = t;
            }
        }
    }

    finish(segment, min_distance, param, qa, end)
}

fn finish(
    segment: &EdgeSegment,
    min_distance: f64,
    param: f64,
    start_offset: Vec2,
    end_offset: Vec2,
) -> (SignedDistance, f64) {
    if (0.0..=1.0).contains(&param) {
        return (SignedDistance::new(min_distance, 0.0), param);
    }
    let dot = if param < 0.5 {
        normalized(segment.direction(0.0)).dot(normalized(start_offset))
    } else {
        normalized(segment.direction(1.0)).dot(normalized(end_offset))
    };
    (SignedDistance::new(min_distance, dot.abs()), param)
}

/// Replace a true distance with the distance to the segment's tangent
/// line when the nearest point lies beyond an endpoint
pub fn to_pseudo_distance(
    segment: &EdgeSegment,
    distance: &mut SignedDistance,
    origin: Point,
    param: f64,
) {
    if param < 0.0 {
        let dir = normalized(segment.direction(0.0));
        let aq = origin - segment.start();
        if aq.dot(dir) < 0.0 {
            let pseudo = aq.cross(dir);
            if pseudo.abs() <= distance.distance.abs() {
                *distance = SignedDistance::new(pseudo, 0.0);
            }
        }
    } else if param > 1.0 {
        let dir = normalized(segment.direction(1.0));
        let bq = origin - segment.end();
        if bq.dot(dir) > 0.0 {
            let pseudo = bq.cross(dir);
            if pseudo.abs() <= distance.distance.abs() {
                *distance = SignedDistance::new(pseudo, 0.0);
            }
        }
    }
}
