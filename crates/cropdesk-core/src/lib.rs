//! Cropdesk Core - editing session for interactive crop, resize and edge detection
//!
//! This crate holds everything with real invariants: the immutable image
//! buffer, the pointer-drag selection controller, the transform pipeline and
//! the undo/redo history, tied together by [`EditingSession`]. Windows,
//! dialogs, network fetches and rendering live outside it.

pub mod buffer;
pub mod decode;
pub mod encode;
pub mod error;
pub mod history;
pub mod luminance;
pub mod selection;
pub mod session;
pub mod transform;

pub use buffer::{BufferError, ColorModel, ImageBuffer};
pub use encode::ExportFormat;
pub use error::{EditError, LoadError};
pub use history::HistoryManager;
pub use selection::{Point, SelectionController, SelectionRect};
pub use session::{EditOutcome, EditingSession, SessionState};
pub use transform::{EdgeThresholds, FilterType};

/// Side length of the crop normalization target.
pub const DEFAULT_CROP_SIZE: u32 = 200;

/// Upper bound accepted for resize targets.
pub const DEFAULT_MAX_DIMENSION: u32 = 5000;

/// Session configuration.
///
/// Every field has a default, so a partial config (for example a JS object
/// with only `crop_size`) deserializes cleanly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Output size of crop-and-normalize, `(width, height)`.
    pub crop_size: (u32, u32),
    /// Largest width or height accepted by resize.
    pub max_dimension: u32,
    /// Thresholds used by the default edge-detect command.
    pub edge_thresholds: EdgeThresholds,
    /// Resampling filter for crop-normalize and resize.
    pub filter: FilterType,
    /// Maximum undo depth; `None` keeps every state.
    pub history_limit: Option<usize>,
    /// Display pixels per image pixel.
    pub display_scale: f64,
    /// JPEG quality for [`EditingSession::export_jpeg`] (1-100).
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            crop_size: (DEFAULT_CROP_SIZE, DEFAULT_CROP_SIZE),
            max_dimension: DEFAULT_MAX_DIMENSION,
            edge_thresholds: EdgeThresholds::default(),
            filter: FilterType::default(),
            history_limit: None,
            display_scale: 1.0,
            jpeg_quality: encode::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every field into its usable range.
    ///
    /// `max_dimension` is capped at [`DEFAULT_MAX_DIMENSION`], the crop size
    /// is kept within `1..=max_dimension`, JPEG quality within 1-100, and
    /// unusable edge thresholds fall back to the defaults.
    pub fn normalized(self) -> Self {
        let max_dimension = self.max_dimension.clamp(1, DEFAULT_MAX_DIMENSION);
        let (crop_w, crop_h) = self.crop_size;
        let edge_thresholds = self.edge_thresholds.validate().unwrap_or_default();

        Self {
            crop_size: (crop_w.clamp(1, max_dimension), crop_h.clamp(1, max_dimension)),
            max_dimension,
            edge_thresholds,
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
            ..self
        }
    }

    /// Display scale, falling back to 1.0 when not a positive finite number.
    pub fn effective_display_scale(&self) -> f64 {
        if self.display_scale.is_finite() && self.display_scale > 0.0 {
            self.display_scale
        } else {
            1.0
        }
    }
}
