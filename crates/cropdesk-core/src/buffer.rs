//! Immutable RGB8 image buffer shared by every stage of the editing session.
//!
//! An [`ImageBuffer`] is never mutated after construction. Transforms build a
//! new buffer; history stacks and the session's current slot hold handles to
//! existing ones. The pixel storage is reference counted, so cloning a buffer
//! hands out another handle to the same bytes rather than copying them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when pixel data does not describe a valid image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    ZeroDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions.
    #[error("Invalid pixel data: expected {expected} bytes for {width}x{height}, got {actual}")]
    PixelDataMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// `width * height * 3` does not fit in `usize`.
    #[error("Image too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },
}

/// Bytes needed for `width x height` pixels with `channels` bytes each.
fn byte_len(width: u32, height: u32, channels: usize) -> Result<usize, BufferError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(channels))
        .ok_or(BufferError::TooLarge { width, height })
}

/// Pixel layout of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorModel {
    /// 8-bit red, green, blue; three bytes per pixel.
    #[default]
    Rgb8,
}

impl ColorModel {
    /// Number of bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorModel::Rgb8 => 3,
        }
    }
}

/// One fully realized image state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    color_model: ColorModel,
    pixels: Arc<[u8]>,
}

impl ImageBuffer {
    /// Create a buffer from RGB8 pixel data in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ZeroDimensions`] if either dimension is zero and
    /// [`BufferError::PixelDataMismatch`] if `pixels.len() != width * height * 3`.
    /// Dimensions whose byte count overflows `usize` are [`BufferError::TooLarge`].
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimensions { width, height });
        }

        let color_model = ColorModel::Rgb8;
        let expected = byte_len(width, height, color_model.channels())?;
        if pixels.len() != expected {
            return Err(BufferError::PixelDataMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            color_model,
            pixels: pixels.into(),
        })
    }

    /// Create a buffer filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimensions { width, height });
        }
        let len = byte_len(width, height, ColorModel::Rgb8.channels())?;
        let pixels = rgb.iter().copied().cycle().take(len).collect();
        Self::new(width, height, pixels)
    }

    /// Take ownership of an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Borrow the pixels as an `image` crate view without copying.
    ///
    /// The view is always constructible because the buffer's length invariant
    /// is checked on creation; `None` is only returned if that was bypassed.
    pub fn as_rgb_view(&self) -> Option<image::ImageBuffer<image::Rgb<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, &self.pixels[..])
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    /// RGB pixel data in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Whether two handles point at the same pixel storage.
    pub fn shares_pixels_with(&self, other: &ImageBuffer) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}
