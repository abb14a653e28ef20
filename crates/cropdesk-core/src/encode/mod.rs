//! Image encoding for the persister side of the editing session.
//!
//! The session hands the current buffer to [`encode`] when the user saves;
//! writing the bytes to disk or offering them as a download is left to the
//! caller.

mod jpeg;
mod png;

use thiserror::Error;

use crate::buffer::ImageBuffer;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Default JPEG quality used when saving.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder itself failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output formats supported by the persister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Lossless PNG (the default save format).
    #[default]
    Png,
    /// JPEG with the given quality (1-100).
    Jpeg { quality: u8 },
}

/// Encode a buffer in the requested format.
pub fn encode(image: &ImageBuffer, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    match format {
        ExportFormat::Png => encode_png(image.pixels(), width, height),
        ExportFormat::Jpeg { quality } => encode_jpeg(image.pixels(), width, height, quality),
    }
}

/// Shared input validation for the RGB encoders.
fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(3))
        .ok_or(EncodeError::InvalidDimensions { width, height })?;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
