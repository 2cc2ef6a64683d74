//! Filling the canvas, one pixel center at a time
//!
//! Rows are independent, so with the `parallel` feature they are spread
//! over rayon's pool. Each row is computed by the same function either way,
//! which keeps the output byte-identical.

use glyphsdf_core::{
    canvas::FloatCanvas,
    error::{EngineError, Result},
    outline::{Contour, Edge, EdgeColor, Shape},
    transform::SamplingParams,
    types::SamplingMode,
};
use kurbo::Point;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::distance::{signed_distance, to_pseudo_distance, SignedDistance};

/// Nearest edge seen so far for one channel
#[derive(Clone, Copy)]
struct Nearest<'a> {
    distance: SignedDistance,
    edge: Option<&'a Edge>,
    param: f64,
}

impl<'a> Nearest<'a> {
    fn new() -> Self {
        Self {
            distance: SignedDistance::INFINITE,
            edge: None,
            param: 0.0,
        }
    }

    fn offer(&mut self, distance: SignedDistance, edge: &'a Edge, param: f64) {
        if distance.is_closer_than(&self.distance) {
            self.distance = distance;
            self.edge = Some(edge);
            self.param = param;
        }
    }

    fn merge(&mut self, other: &Nearest<'a>) {
        if other.distance.is_closer_than(&self.distance) {
            *self = *other;
        }
    }

    fn pseudo_distance(&self, origin: Point) -> f64 {
        let mut distance = self.distance;
        if let Some(edge) = self.edge {
            to_pseudo_distance(&edge.segment, &mut distance, origin, self.param);
        }
        distance.distance
    }
}

const CHANNEL_MASKS: [EdgeColor; 3] = [EdgeColor::RED, EdgeColor::GREEN, EdgeColor::BLUE];

/// Nearest edges of one contour, or of several contours merged together
#[derive(Clone, Copy)]
struct Selector<'a> {
    all: Nearest<'a>,
    channels: [Nearest<'a>; 3],
}

impl<'a> Selector<'a> {
    fn new() -> Self {
        Self {
            all: Nearest::new(),
            channels: [Nearest::new(); 3],
        }
    }

    fn add(&mut self, mode: SamplingMode, edge: &'a Edge, origin: Point) {
        let (distance, param) = signed_distance(&edge.segment, origin);
        self.all.offer(distance, edge, param);
        if mode.is_multi_channel() {
            for (nearest, mask) in self.channels.iter_mut().zip(CHANNEL_MASKS) {
                if edge.color.intersects(mask) {
                    nearest.offer(distance, edge, param);
                }
            }
        }
    }

    fn merge(&mut self, other: &Selector<'a>) {
        self.all.merge(&other.all);
        for (nearest, theirs) in self.channels.iter_mut().zip(&other.channels) {
            nearest.merge(theirs);
        }
    }

    fn sample(&self, mode: SamplingMode, origin: Point) -> Sample {
        let true_distance = self.all.distance.distance;
        let channels = match mode {
            SamplingMode::Sdf => [true_distance; 3],
            SamplingMode::PseudoSdf => [self.all.pseudo_distance(origin); 3],
            SamplingMode::Msdf | SamplingMode::Mtsdf => {
                self.channels.map(|nearest| nearest.pseudo_distance(origin))
            },
        };
        Sample {
            channels,
            true_distance,
        }
    }
}

/// Distances for one pixel, in shape units
///
/// Single-channel modes repeat their one distance in every channel, so the
/// median is that distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    channels: [f64; 3],
    true_distance: f64,
}

impl Sample {
    fn resolve(&self) -> f64 {
        let [a, b, c] = self.channels;
        a.min(b).max(a.max(b).min(c))
    }
}

/// +1 for filled contours (clockwise, Y up), -1 for holes, 0 for no area
fn winding(contour: &Contour) -> i8 {
    let area = contour.signed_area();
    if area < 0.0 {
        1
    } else if area > 0.0 {
        -1
    } else {
        0
    }
}

/// Per-contour state reused across the pixels of one row
struct Scratch<'a> {
    selectors: Vec<Selector<'a>>,
    samples: Vec<Sample>,
}

/// Combine per-contour distances so overlapping contours fill their union
///
/// A pixel inside a filled contour takes the largest inside distance
/// among the filled contours that agree, bounded by the nearest hole; a
/// pixel outside everything is measured against the whole shape.
fn combine(
    mode: SamplingMode,
    selectors: &[Selector<'_>],
    samples: &[Sample],
    windings: &[i8],
    origin: Point,
) -> Sample {
    let mut whole = Selector::new();
    let mut inner = Selector::new();
    let mut outer = Selector::new();
    for ((selector, sample), &winding) in selectors.iter().zip(samples).zip(windings) {
        whole.merge(selector);
        let distance = sample.resolve();
        if winding > 0 && distance >= 0.0 {
            inner.merge(selector);
        }
        if winding < 0 && distance <= 0.0 {
            outer.merge(selector);
        }
    }
    let whole = whole.sample(mode, origin);
    let inner = inner.sample(mode, origin);
    let outer = outer.sample(mode, origin);
    let inner_d = inner.resolve();
    let outer_d = outer.resolve();

    let (mut best, chosen) = if inner_d >= 0.0 && inner_d.abs() <= outer_d.abs() {
        let mut best = inner;
        for (sample, &winding) in samples.iter().zip(windings) {
            let d = sample.resolve();
            if winding > 0 && d.abs() < outer_d.abs() && d > best.resolve() {
                best = *sample;
            }
        }
        (best, 1)
    } else if outer_d <= 0.0 && outer_d.abs() < inner_d.abs() {
        let mut best = outer;
        for (sample, &winding) in samples.iter().zip(windings) {
            let d = sample.resolve();
            if winding < 0 && d.abs() < inner_d.abs() && d < best.resolve() {
                best = *sample;
            }
        }
        (best, -1)
    } else {
        return whole;
    };

    for (sample, &winding) in samples.iter().zip(windings) {
        if winding == chosen {
            continue;
        }
        let d = sample.resolve();
        let current = best.resolve();
        if d * current >= 0.0 && d.abs() < current.abs() {
            best = *sample;
        }
    }
    if best.resolve() == whole.resolve() {
        whole
    } else {
        best
    }
}

fn distance_at<'a>(
    mode: SamplingMode,
    shape: &'a Shape,
    windings: &[i8],
    origin: Point,
    scratch: &mut Scratch<'a>,
) -> Sample {
    scratch.selectors.clear();
    scratch.samples.clear();
    for contour in &shape.contours {
        let mut selector = Selector::new();
        for edge in &contour.edges {
            selector.add(mode, edge, origin);
        }
        scratch.selectors.push(selector);
        scratch.samples.push(selector.sample(mode, origin));
    }
    match scratch.samples.as_slice() {
        [] => Selector::new().sample(mode, origin),
        [only] => *only,
        samples => combine(mode, &scratch.selectors, samples, windings, origin),
    }
}

fn sample_pixel(mode: SamplingMode, sample: Sample, params: &SamplingParams, out: &mut [f32]) {
    match mode {
        SamplingMode::Sdf | SamplingMode::PseudoSdf => out[0] = params.encode(sample.resolve()),
        SamplingMode::Msdf | SamplingMode::Mtsdf => {
            for (slot, distance) in out.iter_mut().zip(sample.channels) {
                *slot = params.encode(distance);
            }
            if mode == SamplingMode::Mtsdf {
                out[3] = params.encode(sample.true_distance);
            }
        },
    }
}

fn sample_row(
    mode: SamplingMode,
    shape: &Shape,
    windings: &[i8],
    params: &SamplingParams,
    y: u32,
    row: &mut [f32],
) {
    let channels = mode.channels();
    let mut scratch = Scratch {
        selectors: Vec::with_capacity(shape.contours.len()),
        samples: Vec::with_capacity(shape.contours.len()),
    };
    for (x, pixel) in row.chunks_exact_mut(channels).enumerate() {
        let origin = params.pixel_to_shape(x as u32, y);
        let sample = distance_at(mode, shape, windings, origin, &mut scratch);
        sample_pixel(mode, sample, params, pixel);
    }
}

/// Sample `shape` into every pixel of `canvas`
pub fn generate(
    mode: SamplingMode,
    shape: &Shape,
    canvas: &mut FloatCanvas,
    params: &SamplingParams,
) -> Result<()> {
    if canvas.channels() != mode.channels() {
        return Err(EngineError::ChannelMismatch {
            expected: mode.channels(),
            found: canvas.channels(),
        }
        .into());
    }
    // chunks_mut panics on a zero chunk size
    if canvas.width() == 0 || canvas.height() == 0 {
        return Ok(());
    }
    let row_len = canvas.row_len();
    let windings: Vec<i8> = shape.contours.iter().map(winding).collect();

    #[cfg(feature = "parallel")]
    canvas
        .samples_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| sample_row(mode, shape, &windings, params, y as u32, row));

    #[cfg(not(feature = "parallel"))]
    canvas
        .samples_mut()
        .chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| sample_row(mode, shape, &windings, params, y as u32, row));

    Ok(())
}
