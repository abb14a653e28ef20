//! Luminance calculation using ITU-R BT.709 coefficients.
//!
//! The edge detector works on a single-channel luminance plane derived here.
//! No gamma linearization is performed; pixel values are weighted as stored.

use crate::buffer::ImageBuffer;

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate luminance from u8 RGB values (0 to 255).
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Single-channel luminance plane of an image, row-major, one byte per pixel.
pub fn luminance_plane(image: &ImageBuffer) -> Vec<u8> {
    image
        .pixels()
        .chunks_exact(3)
        .map(|px| calculate_luminance_u8(px[0], px[1], px[2]))
        .collect()
}
