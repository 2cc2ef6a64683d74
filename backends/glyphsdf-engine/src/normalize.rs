//! Outline cleanup before anything is measured

use glyphsdf_core::outline::{Contour, Edge, Shape};

/// Bring a shape into the form the sampler expects
///
/// - zero-length edges and the contours they leave empty disappear
/// - a contour made of one edge is cut into three, so coloring has
///   something to work with
/// - if the largest contour runs counter-clockwise, every contour is
///   reversed, making filled regions clockwise (Y up)
pub fn normalize_shape(shape: &mut Shape) {
    for contour in &mut shape.contours {
        contour.edges.retain(|edge| !edge.segment.is_degenerate());
        if let [only] = contour.edges.as_slice() {
            let color = only.color;
            contour.edges = only
                .segment
                .split_in_thirds()
                .into_iter()
                .map(|segment| Edge { segment, color })
                .collect();
        }
    }
    shape.contours.retain(|contour| !contour.is_empty());

    let dominant = shape
        .contours
        .iter()
        .map(Contour::signed_area)
        .max_by(|a, b| a.abs().total_cmp(&b.abs()));
    if let Some(area) = dominant {
        if area > 0.0 {
            log::trace!("Outer contour runs counter-clockwise, reversing all contours");
            for contour in &mut shape.contours {
                contour.reverse();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphsdf_core::outline::{EdgeSegment, OutlineBuilder};
    use kurbo::Point;

    fn ring(outer_ccw: bool) -> Shape {
        let mut builder = OutlineBuilder::new();
        // Outer square
        builder.move_to(0.0, 0.0);
        if outer_ccw {
            builder.line_to(100.0, 0.0);
            builder.line_to(100.0, 100.0);
            builder.line_to(0.0, 100.0);
        } else {
            builder.line_to(0.0, 100.0);
            builder.line_to(100.0, 100.0);
            builder.line_to(100.0, 0.0);
        }
        builder.close();
        // Hole wound the other way
        builder.move_to(25.0, 25.0);
        if outer_ccw {
            builder.line_to(25.0, 75.0);
            builder.line_to(75.0, 75.0);
            builder.line_to(75.0, 25.0);
        } else {
            builder.line_to(75.0, 25.0);
            builder.line_to(75.0, 75.0);
            builder.line_to(25.0, 75.0);
        }
        builder.close();
        builder.finish()
    }

    #[test]
    fn test_counter_clockwise_outlines_are_flipped() {
        let mut shape = ring(true);
        normalize_shape(&mut shape);
        assert!(shape.contours[0].is_clockwise());
        assert!(!shape.contours[1].is_clockwise());
    }

    #[test]
    fn test_clockwise_outlines_are_kept() {
        let mut shape = ring(false);
        let before = shape.clone();
        normalize_shape(&mut shape);
        assert_eq!(shape, before);
    }

    #[test]
    fn test_degenerate_edges_and_contours_removed() {
        let p = Point::new(5.0, 5.0);
        let mut shape = Shape::new(vec![
            Contour::new(vec![Edge::new(EdgeSegment::line(p, p))]),
            Contour::default(),
        ]);
        normalize_shape(&mut shape);
        assert!(shape.contours.is_empty());
    }

    #[test]
    fn test_single_edge_contour_split_in_thirds() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.curve_to(0.0, 50.0, 50.0, 50.0, 0.0, 0.0);
        let mut shape = builder.finish();
        assert_eq!(shape.contours[0].edges.len(), 1);
        normalize_shape(&mut shape);
        assert_eq!(shape.contours[0].edges.len(), 3);
    }

    #[test]
    fn test_empty_shape_is_fine() {
        let mut shape = Shape::default();
        normalize_shape(&mut shape);
        assert!(shape.is_empty());
    }
}
