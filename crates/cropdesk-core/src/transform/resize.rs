//! Whole-image resampling.

use super::FilterType;
use crate::buffer::ImageBuffer;
use crate::error::EditError;

/// Resample an image to exact dimensions.
///
/// Range checks against the configured maximum belong to the caller; this
/// only rejects zero dimensions.
///
/// # Errors
///
/// Returns `EditError::InvalidDimensions` if `width` or `height` is zero.
pub fn resize(
    image: &ImageBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, EditError> {
    if width == 0 || height == 0 {
        return Err(EditError::InvalidDimensions { width, height });
    }

    // Fast path: same size hands back another handle to the same pixels
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let view = image
        .as_rgb_view()
        .ok_or(EditError::InvalidDimensions { width, height })?;
    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());

    Ok(ImageBuffer::from_rgb_image(resized)?)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Output always has exactly the requested dimensions.
        #[test]
        fn prop_output_matches_target(
            (src_w, src_h) in (1u32..=60, 1u32..=60),
            (dst_w, dst_h) in (1u32..=120, 1u32..=120),
        ) {
            let img = ImageBuffer::filled(src_w, src_h, [1, 2, 3]).unwrap();
            let resized = resize(&img, dst_w, dst_h, FilterType::Bilinear).unwrap();

            prop_assert_eq!(resized.dimensions(), (dst_w, dst_h));
        }

        /// Property: Resizing twice to the same target gives identical bytes.
        #[test]
        fn prop_resize_is_deterministic(
            (dst_w, dst_h) in (1u32..=80, 1u32..=80),
        ) {
            let pixels: Vec<u8> = (0..(32 * 24 * 3)).map(|i| (i * 31 % 256) as u8).collect();
            let img = ImageBuffer::new(32, 24, pixels).unwrap();

            let first = resize(&img, dst_w, dst_h, FilterType::Bilinear).unwrap();
            let second = resize(&img, dst_w, dst_h, FilterType::Bilinear).unwrap();
            prop_assert_eq!(first.pixels(), second.pixels());
        }
    }
}
