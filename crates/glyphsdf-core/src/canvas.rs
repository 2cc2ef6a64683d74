//! Float sample storage the engine writes into

/// A `width × height × channels` grid of floats, row-major
///
/// Row 0 holds the lowest Y of the sampled region.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatCanvas {
    width: u32,
    height: u32,
    channels: usize,
    samples: Vec<f32>,
}

impl FloatCanvas {
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        let len = width as usize * height as usize * channels;
        Self {
            width,
            height,
            channels,
            samples: vec![0.0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Floats per row
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels
    }

    /// All channels of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        let start = self.offset(x, y);
        &self.samples[start..start + self.channels]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [f32] {
        let start = self.offset(x, y);
        &mut self.samples[start..start + self.channels]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }
}
