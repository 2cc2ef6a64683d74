//! Assigning edges to channels so corners survive
//!
//! Edges that meet at a corner must not share two channels, otherwise the
//! median of the three channels rounds the corner off. Smooth runs between
//! corners keep one color; the color cycles at every corner.
//!
//! This is the simple cycle coloring, not msdfgen's coloring by distance,
//! so channel assignments differ from msdfgen-built atlases even where the
//! median field matches.

use glyphsdf_core::outline::{Contour, Edge, EdgeColor, Shape};
use kurbo::Vec2;

use crate::math::normalized;

/// The three two-channel colors the cycle starts from
const START_COLORS: [EdgeColor; 3] = [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW];

/// Deterministic source of color choices
struct ColorCycle {
    color: EdgeColor,
    seed: u64,
}

impl ColorCycle {
    fn new(mut seed: u64) -> Self {
        let color = START_COLORS[(seed % 3) as usize];
        seed /= 3;
        Self { color, seed }
    }

    /// Move to the next color, avoiding `banned` where it matters
    fn switch(&mut self, banned: EdgeColor) -> EdgeColor {
        let combined = self.color.intersection(banned);
        if combined == EdgeColor::RED || combined == EdgeColor::GREEN || combined == EdgeColor::BLUE
        {
            self.color = combined.symmetric_difference(EdgeColor::WHITE);
            return self.color;
        }
        let bits = u32::from(self.color.bits());
        let shifted = bits << (1 + (self.seed & 1));
        self.color = EdgeColor::from_bits(((shifted | shifted >> 3) & 7) as u8);
        self.seed >>= 1;
        self.color
    }

    fn next(&mut self) -> EdgeColor {
        self.switch(EdgeColor::BLACK)
    }
}

fn is_corner(a: Vec2, b: Vec2, cross_threshold: f64) -> bool {
    a.dot(b) <= 0.0 || a.cross(b).abs() > cross_threshold
}

/// Position of edge `i` of `n` on a teardrop: -1, 0 or 1
fn symmetrical_trichotomy(position: usize, n: usize) -> isize {
    let value = 3.0 + 2.875 * position as f64 / (n as f64 - 1.0) - 1.4375 + 0.5;
    value as isize - 3
}

fn corners(contour: &Contour, cross_threshold: f64) -> Vec<usize> {
    let mut corners = Vec::new();
    let Some(last) = contour.edges.last() else {
        return corners;
    };
    let mut prev_direction = last.segment.direction(1.0);
    for (index, edge) in contour.edges.iter().enumerate() {
        if is_corner(
            normalized(prev_direction),
            normalized(edge.segment.direction(0.0)),
            cross_threshold,
        ) {
            corners.push(index);
        }
        prev_direction = edge.segment.direction(1.0);
    }
    corners
}

/// Color every edge of `shape`
///
/// `angle_threshold` is in radians; joins sharper than it become corners.
/// The same shape and seed always produce the same colors.
pub fn color_edges(shape: &mut Shape, angle_threshold: f64, seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut cycle = ColorCycle::new(seed);

    for contour in &mut shape.contours {
        if contour.is_empty() {
            continue;
        }
        let corners = corners(contour, cross_threshold);
        match corners.as_slice() {
            [] => {
                let color = cycle.next();
                for edge in &mut contour.edges {
                    edge.color = color;
                }
            },
            [corner] => color_teardrop(contour, *corner, &mut cycle),
            _ => color_polygon(contour, &corners, &mut cycle),
        }
    }
}

fn color_teardrop(contour: &mut Contour, corner: usize, cycle: &mut ColorCycle) {
    let colors = [cycle.next(), EdgeColor::WHITE, cycle.next()];
    let m = contour.edges.len();
    if m >= 3 {
        for i in 0..m {
            let slot = 1 + symmetrical_trichotomy(i, m);
            contour.edges[(corner + i) % m].color = colors[slot.clamp(0, 2) as usize];
        }
        return;
    }

    // Fewer than three edges for three colors: split them up
    let first = contour.edges[0].segment.split_in_thirds();
    let parts: Vec<Edge> = if m == 2 {
        let second = contour.edges[1].segment.split_in_thirds();
        let ordered = if corner == 0 {
            [first, second].concat()
        } else {
            [second, first].concat()
        };
        ordered
            .into_iter()
            .enumerate()
            .map(|(i, segment)| Edge {
                segment,
                color: colors[i / 2],
            })
            .collect()
    } else {
        first
            .into_iter()
            .zip(colors)
            .map(|(segment, color)| Edge { segment, color })
            .collect()
    };
    contour.edges = parts;
}

fn color_polygon(contour: &mut Contour, corners: &[usize], cycle: &mut ColorCycle) {
    let corner_count = corners.len();
    let m = contour.edges.len();
    let start = corners[0];
    let mut spline = 0;
    let initial = cycle.next();
    let mut color = initial;
    for i in 0..m {
        let index = (start + i) % m;
        if spline + 1 < corner_count && corners[spline + 1] == index {
            spline += 1;
            let banned = if spline == corner_count - 1 {
                initial
            } else {
                EdgeColor::BLACK
            };
            color = cycle.switch(banned);
        }
        contour.edges[index].color = color;
    }
}
