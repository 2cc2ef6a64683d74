//! Bridge from skrifa's drawing callbacks to our outline builder

use glyphsdf_core::outline::{OutlineBuilder, Shape};
use skrifa::outline::OutlinePen;

/// Records a glyph outline in font units, Y up
#[derive(Debug, Default)]
pub struct ShapePen(OutlineBuilder);

impl ShapePen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Shape {
        self.0.finish()
    }
}

impl OutlinePen for ShapePen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x.into(), y.into());
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x.into(), y.into());
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to(cx0.into(), cy0.into(), x.into(), y.into());
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(
            cx0.into(),
            cy0.into(),
            cx1.into(),
            cy1.into(),
            x.into(),
            y.into(),
        );
    }

    fn close(&mut self) {
        self.0.close();
    }
}
