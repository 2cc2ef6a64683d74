//! Clash repair for multi-channel output
//!
//! Two neighbouring pixels can agree on inside/outside by majority while
//! two of their channels flip in opposite directions. Interpolating
//! between them then produces a spurious edge. Such pixels are collapsed
//! to their median, which turns them into plain distance samples.

use glyphsdf_core::canvas::FloatCanvas;

use crate::math::median;

fn inside_votes(p: &[f32]) -> usize {
    p[..3].iter().filter(|&&v| v > 0.5).count()
}

fn flips(a: f32, b: f32) -> bool {
    (a > 0.5) != (b > 0.5) && (a < 0.5) != (b < 0.5)
}

/// Whether `a` should be repaired because of its neighbour `b`
fn pixel_clash(a: &[f32], b: &[f32], threshold: f32) -> bool {
    let a_in = inside_votes(a) >= 2;
    let b_in = inside_votes(b) >= 2;
    if a_in != b_in {
        return false;
    }
    let uniform = |p: &[f32]| p[..3].iter().all(|&v| v > 0.5) || p[..3].iter().all(|&v| v < 0.5);
    if uniform(a) || uniform(b) {
        return false;
    }

    // (first flipping, second flipping, steady) channel indices
    let (i, j, k) = if flips(a[0], b[0]) {
        if flips(a[1], b[1]) {
            (0, 1, 2)
        } else if flips(a[2], b[2]) {
            (0, 2, 1)
        } else {
            return false;
        }
    } else if flips(a[1], b[1]) && flips(a[2], b[2]) {
        (1, 2, 0)
    } else {
        return false;
    };

    (a[i] - b[i]).abs() >= threshold
        && (a[j] - b[j]).abs() >= threshold
        // Of the pair, only the pixel farther from an edge gets repaired
        && (a[k] - 0.5).abs() >= (b[k] - 0.5).abs()
}

/// Collapse clashing pixels to their median
///
/// Works on the first three channels; a fourth (true distance) channel is
/// left untouched. Returns how many pixels were changed.
pub fn correct_clashes(canvas: &mut FloatCanvas, threshold: f64) -> usize {
    if canvas.channels() < 3 || canvas.is_empty() || !threshold.is_finite() {
        return 0;
    }
    let threshold = threshold as f32;
    let (w, h) = (canvas.width(), canvas.height());

    let mut clashes = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let here = canvas.pixel(x, y);
            let clash = (x > 0 && pixel_clash(here, canvas.pixel(x - 1, y), threshold))
                || (x + 1 < w && pixel_clash(here, canvas.pixel(x + 1, y), threshold))
                || (y > 0 && pixel_clash(here, canvas.pixel(x, y - 1), threshold))
                || (y + 1 < h && pixel_clash(here, canvas.pixel(x, y + 1), threshold));
            if clash {
                clashes.push((x, y));
            }
        }
    }

    for &(x, y) in &clashes {
        let pixel = canvas.pixel_mut(x, y);
        let m = median(pixel[0], pixel[1], pixel[2]);
        pixel[..3].fill(m);
    }
    if !clashes.is_empty() {
        log::debug!("Corrected {} clashing pixels", clashes.len());
    }
    clashes.len()
}
