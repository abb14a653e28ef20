//! Rectangular crop with optional normalization to a fixed output size.
//!
//! The rectangle is expected to come from
//! [`SelectionController::complete`](crate::selection::SelectionController::complete),
//! which already sorts and clamps it. Anything else is rejected rather than
//! silently adjusted.
//!
//! # Example
//!
//! ```ignore
//! // Crop the center of a 100x100 image and normalize it to 200x200
//! let rect = SelectionRect::new(25, 25, 75, 75);
//! let out = crop_and_normalize(&image, &rect, 200, 200, FilterType::Bilinear)?;
//! ```

use super::{resize, FilterType};
use crate::buffer::ImageBuffer;
use crate::error::EditError;
use crate::selection::SelectionRect;

/// Extract the pixels covered by `rect`.
///
/// # Errors
///
/// Returns `EditError::InvalidRegion` if the rectangle is empty or extends
/// past the image.
pub fn crop_region(image: &ImageBuffer, rect: &SelectionRect) -> Result<ImageBuffer, EditError> {
    if rect.is_degenerate() || !rect.fits_within(image.width(), image.height()) {
        return Err(EditError::InvalidRegion);
    }

    // Fast path: full-image crop hands back the same pixels
    if rect.width() == image.width() && rect.height() == image.height() {
        return Ok(image.clone());
    }

    let src_stride = image.width() as usize * 3;
    let row_len = rect.width() as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.height() as usize);

    // Copy pixel data row by row
    for src_y in rect.y1..rect.y2 {
        let start = src_y as usize * src_stride + rect.x1 as usize * 3;
        output.extend_from_slice(&image.pixels()[start..start + row_len]);
    }

    Ok(ImageBuffer::new(rect.width(), rect.height(), output)?)
}

/// Crop `rect` and resample the result to exactly `target_width x target_height`.
///
/// # Errors
///
/// Returns `EditError::InvalidRegion` for an invalid rectangle and
/// `EditError::InvalidDimensions` for a zero target size.
pub fn crop_and_normalize(
    image: &ImageBuffer,
    rect: &SelectionRect,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, EditError> {
    if target_width == 0 || target_height == 0 {
        return Err(EditError::InvalidDimensions {
            width: target_width,
            height: target_height,
        });
    }

    let cropped = crop_region(image, rect)?;
    resize(&cropped, target_width, target_height, filter)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
