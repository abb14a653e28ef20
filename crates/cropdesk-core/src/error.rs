//! Error taxonomy surfaced at the editing-session boundary.

use thiserror::Error;

use crate::buffer::BufferError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Why a loader could not hand the session an image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The remote source could not be fetched.
    #[error("Network error: {0}")]
    Network(String),

    /// The bytes were fetched but are not a decodable image.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The requested source does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors reported by the editing session and the transform pipeline.
///
/// None of these are fatal: the session state is left as it was before the
/// failing call.
#[derive(Debug, Error)]
pub enum EditError {
    /// Selection is degenerate or lies outside the image.
    #[error("Invalid region: selection must have a non-zero width and height inside the image")]
    InvalidRegion,

    /// Resize target is zero or above the configured limit.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Edge thresholds are negative or not finite.
    #[error("Invalid edge thresholds: low {low}, high {high}")]
    InvalidThresholds { low: f32, high: f32 },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// Operation needs an image but none has been loaded.
    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Load failed: {0}")]
    LoadFailure(#[from] LoadError),

    #[error("Save failed: {0}")]
    SaveFailure(#[from] EncodeError),

    #[error("Invalid image buffer: {0}")]
    InvalidBuffer(#[from] BufferError),
}
