//! Vector outlines: segments, contours, shapes
//!
//! Everything lives in source space with Y pointing up. Backends that read
//! Y-down data (SVG) flip before handing contours over, so by the time a
//! shape reaches the engine a filled region is always on the right-hand
//! side of travel for clockwise outer contours.

use kurbo::{CubicBez, Line, ParamCurve, ParamCurveExtrema, Point, QuadBez, Vec2};

use crate::types::BoundingBox;

/// Channel mask carried by each edge
///
/// Bits: red = 1, green = 2, blue = 4. A channel "sees" an edge when the
/// edge's color contains that bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeColor(u8);

impl EdgeColor {
    pub const BLACK: EdgeColor = EdgeColor(0);
    pub const RED: EdgeColor = EdgeColor(1);
    pub const GREEN: EdgeColor = EdgeColor(2);
    pub const YELLOW: EdgeColor = EdgeColor(3);
    pub const BLUE: EdgeColor = EdgeColor(4);
    pub const MAGENTA: EdgeColor = EdgeColor(5);
    pub const CYAN: EdgeColor = EdgeColor(6);
    pub const WHITE: EdgeColor = EdgeColor(7);

    pub const fn from_bits(bits: u8) -> Self {
        EdgeColor(bits & 7)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether any channel of `other` is also set here
    pub const fn intersects(self, other: EdgeColor) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn intersection(self, other: EdgeColor) -> EdgeColor {
        EdgeColor(self.0 & other.0)
    }

    pub const fn symmetric_difference(self, other: EdgeColor) -> EdgeColor {
        EdgeColor((self.0 ^ other.0) & 7)
    }
}

impl Default for EdgeColor {
    fn default() -> Self {
        EdgeColor::WHITE
    }
}

/// One piece of a contour: a line, a quadratic or a cubic Bézier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeSegment {
    Line([Point; 2]),
    Quad([Point; 3]),
    Cubic([Point; 4]),
}

impl EdgeSegment {
    pub fn line(p0: Point, p1: Point) -> Self {
        Self::Line([p0, p1])
    }

    pub fn quad(p0: Point, p1: Point, p2: Point) -> Self {
        Self::Quad([p0, p1, p2])
    }

    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self::Cubic([p0, p1, p2, p3])
    }

    pub fn control_points(&self) -> &[Point] {
        match self {
            Self::Line(p) => p,
            Self::Quad(p) => p,
            Self::Cubic(p) => p,
        }
    }

    pub fn start(&self) -> Point {
        self.control_points()[0]
    }

    pub fn end(&self) -> Point {
        let points = self.control_points();
        points[points.len() - 1]
    }

    /// Position at parameter `t`
    pub fn point(&self, t: f64) -> Point {
        match self {
            Self::Line([p0, p1]) => p0.lerp(*p1, t),
            Self::Quad([p0, p1, p2]) => QuadBez::new(*p0, *p1, *p2).eval(t),
            Self::Cubic([p0, p1, p2, p3]) => CubicBez::new(*p0, *p1, *p2, *p3).eval(t),
        }
    }

    /// Tangent at parameter `t`, never zero unless the whole segment is a point
    pub fn direction(&self, t: f64) -> Vec2 {
        match self {
            Self::Line([p0, p1]) => *p1 - *p0,
            Self::Quad([p0, p1, p2]) => {
                let tangent = (*p1 - *p0).lerp(*p2 - *p1, t);
                if is_zero(tangent) {
                    *p2 - *p0
                } else {
                    tangent
                }
            },
            Self::Cubic([p0, p1, p2, p3]) => {
                let a = *p1 - *p0;
                let b = *p2 - *p1;
                let c = *p3 - *p2;
                let tangent = a.lerp(b, t).lerp(b.lerp(c, t), t);
                if is_zero(tangent) {
                    if t == 0.0 {
                        return *p2 - *p0;
                    }
                    if t == 1.0 {
                        return *p3 - *p1;
                    }
                }
                tangent
            },
        }
    }

    /// Exact bounds including curve extrema
    pub fn bounds(&self, bounds: &mut BoundingBox) {
        let rect = match self {
            Self::Line([p0, p1]) => Line::new(*p0, *p1).bounding_box(),
            Self::Quad([p0, p1, p2]) => QuadBez::new(*p0, *p1, *p2).bounding_box(),
            Self::Cubic([p0, p1, p2, p3]) => CubicBez::new(*p0, *p1, *p2, *p3).bounding_box(),
        };
        bounds.include(rect.x0, rect.y0);
        bounds.include(rect.x1, rect.y1);
    }

    /// Same path, opposite direction
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line([p0, p1]) => Self::Line([*p1, *p0]),
            Self::Quad([p0, p1, p2]) => Self::Quad([*p2, *p1, *p0]),
            Self::Cubic([p0, p1, p2, p3]) => Self::Cubic([*p3, *p2, *p1, *p0]),
        }
    }

    /// Cut at t = 1/3 and t = 2/3
    pub fn split_in_thirds(&self) -> [EdgeSegment; 3] {
        let third = 1.0 / 3.0;
        let two_thirds = 2.0 / 3.0;
        match self {
            Self::Line([p0, p1]) => {
                let a = self.point(third);
                let b = self.point(two_thirds);
                [Self::line(*p0, a), Self::line(a, b), Self::line(b, *p1)]
            },
            Self::Quad([p0, p1, p2]) => {
                let curve = QuadBez::new(*p0, *p1, *p2);
                [
                    Self::from_quad(curve.subsegment(0.0..third)),
                    Self::from_quad(curve.subsegment(third..two_thirds)),
                    Self::from_quad(curve.subsegment(two_thirds..1.0)),
                ]
            },
            Self::Cubic([p0, p1, p2, p3]) => {
                let curve = CubicBez::new(*p0, *p1, *p2, *p3);
                [
                    Self::from_cubic(curve.subsegment(0.0..third)),
                    Self::from_cubic(curve.subsegment(third..two_thirds)),
                    Self::from_cubic(curve.subsegment(two_thirds..1.0)),
                ]
            },
        }
    }

    /// All control points coincide
    pub fn is_degenerate(&self) -> bool {
        let start = self.start();
        self.control_points().iter().all(|p| *p == start)
    }

    pub fn is_finite(&self) -> bool {
        self.control_points().iter().all(|p| p.is_finite())
    }

    fn from_quad(curve: QuadBez) -> Self {
        Self::Quad([curve.p0, curve.p1, curve.p2])
    }

    fn from_cubic(curve: CubicBez) -> Self {
        Self::Cubic([curve.p0, curve.p1, curve.p2, curve.p3])
    }
}

fn is_zero(v: Vec2) -> bool {
    v.x == 0.0 && v.y == 0.0
}

/// A segment plus the channels it contributes to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub segment: EdgeSegment,
    pub color: EdgeColor,
}

impl Edge {
    pub fn new(segment: EdgeSegment) -> Self {
        Self {
            segment,
            color: EdgeColor::default(),
        }
    }
}

impl From<EdgeSegment> for Edge {
    fn from(segment: EdgeSegment) -> Self {
        Edge::new(segment)
    }
}

/// A closed loop of edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<Edge>,
}

impl Contour {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Signed area, positive for counter-clockwise loops (Y up)
    ///
    /// Curves are approximated by sample points; only the sign and the
    /// relative magnitude between contours matter to callers.
    pub fn signed_area(&self) -> f64 {
        let total = match self.edges.as_slice() {
            [] => return 0.0,
            [only] => {
                let a = only.segment.point(0.0);
                let b = only.segment.point(1.0 / 3.0);
                let c = only.segment.point(2.0 / 3.0);
                shoelace(a, b) + shoelace(b, c) + shoelace(c, a)
            },
            [first, second] => {
                let a = first.segment.point(0.0);
                let b = first.segment.point(0.5);
                let c = second.segment.point(0.0);
                let d = second.segment.point(0.5);
                shoelace(a, b) + shoelace(b, c) + shoelace(c, d) + shoelace(d, a)
            },
            edges => {
                let mut total = 0.0;
                let mut prev = edges[edges.len() - 1].segment.point(0.0);
                for edge in edges {
                    let cur = edge.segment.point(0.0);
                    total += shoelace(prev, cur);
                    prev = cur;
                }
                total
            },
        };
        -0.5 * total
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Walk the loop the other way round
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.segment = edge.segment.reversed();
        }
    }

    pub fn bounds(&self, bounds: &mut BoundingBox) {
        for edge in &self.edges {
            edge.segment.bounds(bounds);
        }
    }
}

fn shoelace(a: Point, b: Point) -> f64 {
    (b.x - a.x) * (a.y + b.y)
}

/// Everything one glyph or icon path is made of
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
}

impl Shape {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(|c| c.edges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.contours.iter().flat_map(|c| c.edges.iter())
    }

    /// Tight bounds, or `None` when there is nothing to bound
    pub fn bounds(&self) -> Option<BoundingBox> {
        if self.is_empty() {
            return None;
        }
        let mut bounds = BoundingBox::empty();
        for contour in &self.contours {
            contour.bounds(&mut bounds);
        }
        Some(bounds)
    }
}

/// Collects drawing commands into a [`Shape`]
///
/// Every subpath is closed when it ends, whether the input said so or
/// not: distance fields only make sense for filled regions.
#[derive(Debug, Default)]
pub struct OutlineBuilder {
    contours: Vec<Contour>,
    edges: Vec<Edge>,
    start: Point,
    current: Point,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.close();
        self.start = Point::new(x, y);
        self.current = self.start;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let to = Point::new(x, y);
        self.edges.push(EdgeSegment::line(self.current, to).into());
        self.current = to;
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let to = Point::new(x, y);
        self.edges
            .push(EdgeSegment::quad(self.current, Point::new(cx, cy), to).into());
        self.current = to;
    }

    pub fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        let to = Point::new(x, y);
        self.edges.push(
            EdgeSegment::cubic(self.current, Point::new(c1x, c1y), Point::new(c2x, c2y), to)
                .into(),
        );
        self.current = to;
    }

    /// End the current subpath, adding a closing line if needed
    pub fn close(&mut self) {
        if self.edges.is_empty() {
            return;
        }
        if self.current != self.start {
            self.edges
                .push(EdgeSegment::line(self.current, self.start).into());
        }
        self.contours.push(Contour::new(std::mem::take(&mut self.edges)));
        self.current = self.start;
    }

    pub fn finish(mut self) -> Shape {
        self.close();
        Shape::new(self.contours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64, clockwise: bool) -> Shape {
        let mut builder = OutlineBuilder::new();
        builder.move_to(x0, y0);
        if clockwise {
            builder.line_to(x0, y1);
            builder.line_to(x1, y1);
            builder.line_to(x1, y0);
        } else {
            builder.line_to(x1, y0);
            builder.line_to(x1, y1);
            builder.line_to(x0, y1);
        }
        builder.close();
        builder.finish()
    }

    #[test]
    fn test_builder_closes_subpaths() {
        let shape = square(0.0, 0.0, 10.0, 10.0, true);
        assert_eq!(shape.contours.len(), 1);
        assert_eq!(shape.contours[0].edges.len(), 4);
        let first = shape.contours[0].edges[0].segment.start();
        let last = shape.contours[0].edges[3].segment.end();
        assert_eq!(first, last);
    }

    #[test]
    fn test_builder_closes_open_subpath_on_move() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.line_to(5.0, 0.0);
        builder.line_to(5.0, 5.0);
        builder.move_to(10.0, 10.0);
        builder.line_to(12.0, 10.0);
        let shape = builder.finish();
        assert_eq!(shape.contours.len(), 2);
        assert_eq!(shape.contours[0].edges.len(), 3);
        assert_eq!(shape.contours[1].edges.len(), 2);
    }

    #[test]
    fn test_winding_sign() {
        let cw = square(0.0, 0.0, 10.0, 10.0, true);
        let ccw = square(0.0, 0.0, 10.0, 10.0, false);
        assert!(cw.contours[0].is_clockwise());
        assert!(!ccw.contours[0].is_clockwise());
        assert!((ccw.contours[0].signed_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_flips_winding() {
        let mut shape = square(0.0, 0.0, 10.0, 10.0, true);
        shape.contours[0].reverse();
        assert!(!shape.contours[0].is_clockwise());
    }

    #[test]
    fn test_bounds_include_curve_extrema() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.quad_to(5.0, 10.0, 10.0, 0.0);
        let shape = builder.finish();
        let bounds = match shape.bounds() {
            Some(b) => b,
            None => unreachable!("shape has edges"),
        };
        assert!((bounds.top - 5.0).abs() < 1e-9);
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.right, 10.0);
    }

    #[test]
    fn test_empty_shape_has_no_bounds() {
        assert!(Shape::default().bounds().is_none());
        assert!(OutlineBuilder::new().finish().is_empty());
    }

    #[test]
    fn test_split_in_thirds_preserves_endpoints() {
        let segment = EdgeSegment::cubic(
            Point::new(0.0, 0.0),
            Point::new(1.0, 3.0),
            Point::new(2.0, 3.0),
            Point::new(3.0, 0.0),
        );
        let parts = segment.split_in_thirds();
        assert_eq!(parts[0].start(), segment.start());
        assert_eq!(parts[2].end(), segment.end());
        assert!((parts[0].end() - parts[1].start()).hypot() < 1e-12);
        assert!((parts[1].end() - segment.point(2.0 / 3.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_direction_fallback_on_collapsed_handles() {
        let segment = EdgeSegment::cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
        );
        let start = segment.direction(0.0);
        assert_eq!(start, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_edge_color_bits() {
        assert!(EdgeColor::YELLOW.intersects(EdgeColor::RED));
        assert!(!EdgeColor::CYAN.intersects(EdgeColor::RED));
        assert_eq!(EdgeColor::WHITE.symmetric_difference(EdgeColor::CYAN), EdgeColor::RED);
        assert_eq!(EdgeColor::default(), EdgeColor::WHITE);
    }
}
