//! Transform pipeline: crop-and-normalize, resize and edge detection.
//!
//! Every operation takes an [`ImageBuffer`](crate::ImageBuffer) by reference
//! and returns a new one; inputs are never modified. All operations are
//! deterministic, so the same input and parameters always produce
//! byte-identical output.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in image pixels, `x2`/`y2` exclusive
//! - Origin is top-left corner

mod crop;
mod edges;
mod resize;

use serde::{Deserialize, Serialize};

pub use crop::{crop_and_normalize, crop_region};
pub use edges::{detect_edges, EdgeThresholds, BACKGROUND_LEVEL, EDGE_LEVEL};
pub use resize::resize;

/// Interpolation filter used when resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}
