//! Two-threshold (Canny-style) edge detection.
//!
//! # Algorithm
//!
//! 1. Convert to a BT.709 luminance plane.
//! 2. 3x3 Sobel gradients, borders replicated.
//! 3. L1 gradient magnitude `|gx| + |gy|`.
//! 4. Non-maximum suppression along the gradient direction, quantized to
//!    horizontal, vertical and the two diagonals.
//! 5. Pixels with magnitude above `high` are strong edges, above `low` weak
//!    candidates. Weak candidates survive only if 8-connected (directly or
//!    through other candidates) to a strong edge.
//!
//! The result is written back as RGB8: edges are [`EDGE_LEVEL`], everything
//! else [`BACKGROUND_LEVEL`]. Source colors are not preserved.

use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::error::EditError;
use crate::luminance::luminance_plane;

/// Output value for edge pixels.
pub const EDGE_LEVEL: u8 = 255;

/// Output value for background pixels.
pub const BACKGROUND_LEVEL: u8 = 0;

/// tan(22.5°) and tan(67.5°), used to bucket gradient directions.
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

// Per-pixel classification during hysteresis.
const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Hysteresis thresholds on the gradient magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 200.0,
        }
    }
}

impl EdgeThresholds {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Check that both thresholds are finite and non-negative.
    pub fn validate(self) -> Result<Self, EditError> {
        let valid = |t: f32| t.is_finite() && t >= 0.0;
        if valid(self.low) && valid(self.high) {
            Ok(self)
        } else {
            Err(EditError::InvalidThresholds {
                low: self.low,
                high: self.high,
            })
        }
    }

    /// `(low, high)` with `low <= high`; swapped thresholds are reordered.
    pub fn ordered(self) -> (f32, f32) {
        if self.low <= self.high {
            (self.low, self.high)
        } else {
            (self.high, self.low)
        }
    }
}

/// Run edge detection and return a black-and-white RGB image of the edges.
pub fn detect_edges(
    image: &ImageBuffer,
    thresholds: EdgeThresholds,
) -> Result<ImageBuffer, EditError> {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let (low, high) = thresholds.ordered();

    let luma = luminance_plane(image);
    let (gx, gy) = sobel(&luma, w, h);
    let magnitude: Vec<i32> = gx
        .iter()
        .zip(&gy)
        .map(|(x, y)| x.abs() + y.abs())
        .collect();

    let mut classes = vec![NOT_EDGE; w * h];
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let m = magnitude[idx];
            if m as f32 <= low || !is_local_maximum(&magnitude, gx[idx], gy[idx], x, y, w, h) {
                continue;
            }
            classes[idx] = if m as f32 > high { STRONG } else { WEAK };
        }
    }

    trace_hysteresis(&mut classes, w, h);

    let mut pixels = Vec::with_capacity(w * h * 3);
    for class in classes {
        let level = if class == STRONG {
            EDGE_LEVEL
        } else {
            BACKGROUND_LEVEL
        };
        pixels.extend_from_slice(&[level, level, level]);
    }

    Ok(ImageBuffer::new(width, height, pixels)?)
}

/// Horizontal and vertical Sobel responses with replicated borders.
fn sobel(luma: &[u8], w: usize, h: usize) -> (Vec<i32>, Vec<i32>) {
    let at = |x: isize, y: isize| -> i32 {
        let cx = x.clamp(0, w as isize - 1) as usize;
        let cy = y.clamp(0, h as isize - 1) as usize;
        luma[cy * w + cx] as i32
    };

    let mut gx = vec![0i32; w * h];
    let mut gy = vec![0i32; w * h];

    for y in 0..h as isize {
        for x in 0..w as isize {
            let idx = y as usize * w + x as usize;
            gx[idx] = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
            gy[idx] = (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1));
        }
    }

    (gx, gy)
}

/// Non-maximum suppression test for the pixel at `(x, y)`.
///
/// Neighbors outside the image count as zero magnitude. One side of each
/// comparison is non-strict so a plateau two pixels wide keeps one pixel.
fn is_local_maximum(
    magnitude: &[i32],
    gx: i32,
    gy: i32,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> bool {
    let mag_at = |dx: isize, dy: isize| -> i32 {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
            0
        } else {
            magnitude[ny as usize * w + nx as usize]
        }
    };

    let m = magnitude[y * w + x];
    let ax = gx.abs() as f32;
    let ay = gy.abs() as f32;

    if ay < ax * TAN_22_5 {
        // Gradient is mostly horizontal: compare left and right
        m > mag_at(-1, 0) && m >= mag_at(1, 0)
    } else if ay > ax * TAN_67_5 {
        // Mostly vertical: compare above and below
        m > mag_at(0, -1) && m >= mag_at(0, 1)
    } else {
        // Diagonal; same signs point down-right in image coordinates
        let s: isize = if (gx < 0) != (gy < 0) { -1 } else { 1 };
        m > mag_at(-s, -1) && m > mag_at(s, 1)
    }
}

/// Promote weak pixels connected to strong ones; drop the rest.
fn trace_hysteresis(classes: &mut [u8], w: usize, h: usize) {
    let mut stack: Vec<usize> = classes
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == STRONG)
        .map(|(i, _)| i)
        .collect();

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % w) as isize, (idx / w) as isize);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if classes[n] == WEAK {
                    classes[n] = STRONG;
                    stack.push(n);
                }
            }
        }
    }

    for class in classes.iter_mut() {
        if *class == WEAK {
            *class = NOT_EDGE;
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Output keeps the input dimensions and only uses the two levels.
        #[test]
        fn prop_output_shape_and_levels(
            (w, h) in (1u32..=24, 1u32..=24),
            seed in any::<u8>(),
            (low, high) in (0.0f32..=600.0, 0.0f32..=1200.0),
        ) {
            let pixels: Vec<u8> = (0..(w * h * 3))
                .map(|i| (i as u8).wrapping_mul(seed).wrapping_add(seed))
                .collect();
            let img = ImageBuffer::new(w, h, pixels).unwrap();
            let edges = detect_edges(&img, EdgeThresholds::new(low, high)).unwrap();

            prop_assert_eq!(edges.dimensions(), (w, h));
            for px in edges.pixels().chunks_exact(3) {
                prop_assert!(px == [EDGE_LEVEL; 3] || px == [BACKGROUND_LEVEL; 3]);
            }
        }

        /// Property: Raising the high threshold never adds edges.
        #[test]
        fn prop_higher_threshold_is_subset(
            seed in any::<u8>(),
            extra in 0.0f32..=500.0,
        ) {
            let pixels: Vec<u8> = (0..(16u32 * 16 * 3))
                .map(|i| ((i / 3) as u8).wrapping_mul(seed))
                .collect();
            let img = ImageBuffer::new(16, 16, pixels).unwrap();

            let base = detect_edges(&img, EdgeThresholds::new(100.0, 200.0)).unwrap();
            let strict = detect_edges(&img, EdgeThresholds::new(100.0, 200.0 + extra)).unwrap();

            for (a, b) in base.pixels().iter().zip(strict.pixels()) {
                prop_assert!(*b <= *a);
            }
        }
    }
}
