//! The editing session: the only writer of image and history state.
//!
//! UI layers translate their events into the calls below and render what
//! [`EditingSession::current`] and [`EditingSession::live_rect`] return.
//! Every call runs to completion before returning; nothing here blocks on I/O.
//!
//! Loading may happen elsewhere (a worker thread, a network fetch). Its
//! result is handed back through [`EditingSession::apply_load`] on the thread
//! that owns the session.

use std::fmt;

use crate::buffer::ImageBuffer;
use crate::decode::decode_image;
use crate::encode::{encode, ExportFormat};
use crate::error::{EditError, LoadError};
use crate::history::HistoryManager;
use crate::selection::{Point, SelectionController, SelectionRect};
use crate::transform::{crop_and_normalize, detect_edges, resize, EdgeThresholds};
use crate::SessionConfig;

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image loaded yet.
    Empty,
    /// Image present, no gesture in progress.
    Ready,
    /// Image present, pointer held down.
    Selecting,
}

/// What a successful command did. `Display` gives a status line for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Loaded { width: u32, height: u32 },
    Cropped { rect: SelectionRect, width: u32, height: u32 },
    Resized { width: u32, height: u32 },
    EdgesDetected,
    Undone,
    Redone,
    /// Release without a preceding press.
    NoSelection,
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Loaded { width, height } => {
                write!(f, "Loaded {}x{} image. Select a region to crop.", width, height)
            }
            EditOutcome::Cropped { width, height, .. } => {
                write!(f, "Cropped & resized to {}x{}.", width, height)
            }
            EditOutcome::Resized { width, height } => {
                write!(f, "Image resized to {}x{}.", width, height)
            }
            EditOutcome::EdgesDetected => f.write_str("Edge detection applied."),
            EditOutcome::Undone => f.write_str("Undo action performed."),
            EditOutcome::Redone => f.write_str("Redo action performed."),
            EditOutcome::NoSelection => f.write_str("No selection."),
        }
    }
}

/// Current image, its undo/redo history and the in-progress selection.
#[derive(Debug, Clone, Default)]
pub struct EditingSession {
    current: Option<ImageBuffer>,
    history: HistoryManager,
    selection: SelectionController,
    config: SessionConfig,
}

impl EditingSession {
    /// Session with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with `config`, clamped by [`SessionConfig::normalized`].
    pub fn with_config(config: SessionConfig) -> Self {
        let config = config.normalized();
        let history = match config.history_limit {
            Some(limit) => HistoryManager::with_limit(limit),
            None => HistoryManager::new(),
        };
        Self {
            current: None,
            history,
            selection: SelectionController::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match (&self.current, self.selection.is_active()) {
            (None, _) => SessionState::Empty,
            (Some(_), false) => SessionState::Ready,
            (Some(_), true) => SessionState::Selecting,
        }
    }

    /// Image to display or persist.
    pub fn current(&self) -> Option<&ImageBuffer> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some() && self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Adopt a freshly decoded image. Valid in any state.
    ///
    /// A replaced image goes onto the undo stack, so a second load can be
    /// undone. The first load records nothing.
    pub fn load(&mut self, buffer: ImageBuffer) -> EditOutcome {
        let (width, height) = buffer.dimensions();
        self.adopt(buffer);
        log::info!("loaded {}x{} image", width, height);
        EditOutcome::Loaded { width, height }
    }

    /// Decode PNG/JPEG bytes and load the result.
    ///
    /// # Errors
    ///
    /// Returns `EditError::LoadFailure` if the bytes cannot be decoded; the
    /// session is left as it was.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<EditOutcome, EditError> {
        let decoded = decode_image(bytes).map_err(LoadError::from);
        self.apply_load(decoded)
    }

    /// Accept the result of a load performed by an external loader.
    pub fn apply_load(
        &mut self,
        result: Result<ImageBuffer, LoadError>,
    ) -> Result<EditOutcome, EditError> {
        match result {
            Ok(buffer) => Ok(self.load(buffer)),
            Err(err) => {
                log::warn!("load failed: {}", err);
                Err(EditError::LoadFailure(err))
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection gesture
    // ------------------------------------------------------------------

    /// Pointer pressed at `point` (display coordinates).
    pub fn on_press_start(&mut self, point: Point) -> Result<(), EditError> {
        if self.current.is_none() {
            return Err(EditError::NoImageLoaded);
        }
        let point = self.to_image_point(point);
        log::debug!("selection started at ({}, {})", point.x, point.y);
        self.selection.begin(point);
        Ok(())
    }

    /// Pointer moved while pressed. Returns the rectangle to draw, if any.
    pub fn on_drag(&mut self, point: Point) -> Option<SelectionRect> {
        let (width, height) = self.current.as_ref()?.dimensions();
        let point = self.to_image_point(point);
        self.selection.update(point, width, height)
    }

    /// Pointer released: crop the selection and normalize it to the crop size.
    ///
    /// # Errors
    ///
    /// `InvalidRegion` for an empty selection and `NoImageLoaded` without an
    /// image. The current image is unchanged on error.
    pub fn on_release_end(&mut self, point: Point) -> Result<EditOutcome, EditError> {
        let Some(current) = self.current.as_ref() else {
            self.selection.cancel();
            return Err(EditError::NoImageLoaded);
        };

        let (width, height) = current.dimensions();
        let point = self.to_image_point(point);
        let rect = match self.selection.complete(point, width, height) {
            Ok(Some(rect)) => rect,
            Ok(None) => return Ok(EditOutcome::NoSelection),
            Err(err) => {
                log::warn!("selection rejected: {}", err);
                return Err(err);
            }
        };

        let (target_w, target_h) = self.config.crop_size;
        let cropped = crop_and_normalize(current, &rect, target_w, target_h, self.config.filter)?;
        self.adopt(cropped);
        log::info!(
            "cropped ({}, {})-({}, {}) to {}x{}",
            rect.x1,
            rect.y1,
            rect.x2,
            rect.y2,
            target_w,
            target_h
        );

        Ok(EditOutcome::Cropped {
            rect,
            width: target_w,
            height: target_h,
        })
    }

    /// Abandon the gesture in progress, if any.
    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    /// Rectangle to draw during a drag, in image pixels.
    pub fn live_rect(&self) -> Option<SelectionRect> {
        let (width, height) = self.current.as_ref()?.dimensions();
        self.selection.live_rect(width, height)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Resize the whole image to `width x height`.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` unless both values are in `1..=max_dimension`.
    pub fn request_resize(&mut self, width: u32, height: u32) -> Result<EditOutcome, EditError> {
        let current = self.current.as_ref().ok_or(EditError::NoImageLoaded)?;

        let max = self.config.max_dimension;
        let in_range = |v: u32| (1..=max).contains(&v);
        if !in_range(width) || !in_range(height) {
            log::warn!("resize to {}x{} rejected (limit {})", width, height, max);
            return Err(EditError::InvalidDimensions { width, height });
        }

        let resized = resize(current, width, height, self.config.filter)?;
        self.adopt(resized);
        log::info!("resized to {}x{}", width, height);
        Ok(EditOutcome::Resized { width, height })
    }

    /// Replace the image with its edge map.
    pub fn request_edge_detect(
        &mut self,
        thresholds: EdgeThresholds,
    ) -> Result<EditOutcome, EditError> {
        let current = self.current.as_ref().ok_or(EditError::NoImageLoaded)?;
        let thresholds = thresholds.validate()?;

        let edges = detect_edges(current, thresholds)?;
        self.adopt(edges);
        log::info!(
            "edge detection applied (low {}, high {})",
            thresholds.low,
            thresholds.high
        );
        Ok(EditOutcome::EdgesDetected)
    }

    /// Edge detection with the configured thresholds.
    pub fn request_edge_detect_default(&mut self) -> Result<EditOutcome, EditError> {
        self.request_edge_detect(self.config.edge_thresholds)
    }

    pub fn undo(&mut self) -> Result<EditOutcome, EditError> {
        let current = self.current.take().ok_or(EditError::NoImageLoaded)?;
        match self.history.undo(current) {
            Ok(previous) => {
                self.current = Some(previous);
                self.selection.cancel();
                log::debug!("undo ({} left)", self.history.undo_depth());
                Ok(EditOutcome::Undone)
            }
            Err((current, err)) => {
                self.current = Some(current);
                Err(err)
            }
        }
    }

    pub fn redo(&mut self) -> Result<EditOutcome, EditError> {
        let current = self.current.take().ok_or(EditError::NoImageLoaded)?;
        match self.history.redo(current) {
            Ok(next) => {
                self.current = Some(next);
                self.selection.cancel();
                log::debug!("redo ({} left)", self.history.redo_depth());
                Ok(EditOutcome::Redone)
            }
            Err((current, err)) => {
                self.current = Some(current);
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encode the current image for saving.
    ///
    /// # Errors
    ///
    /// `NoImageLoaded` without an image, `SaveFailure` if encoding fails.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, EditError> {
        let current = self.current.as_ref().ok_or(EditError::NoImageLoaded)?;
        encode(current, format).map_err(|err| {
            log::warn!("save failed: {}", err);
            EditError::SaveFailure(err)
        })
    }

    /// JPEG export at the configured quality.
    pub fn export_jpeg(&self) -> Result<Vec<u8>, EditError> {
        self.export(ExportFormat::Jpeg {
            quality: self.config.jpeg_quality,
        })
    }

    // ------------------------------------------------------------------

    /// Make `buffer` current, pushing the replaced image onto the undo stack.
    fn adopt(&mut self, buffer: ImageBuffer) {
        self.selection.cancel();
        if let Some(previous) = self.current.replace(buffer) {
            self.history.record(previous);
        }
    }

    fn to_image_point(&self, point: Point) -> Point {
        let scale = self.config.effective_display_scale();
        if scale == 1.0 {
            return point;
        }
        Point::new(
            (point.x as f64 / scale).floor() as i32,
            (point.y as f64 / scale).floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_DIMENSION;
    use std::io::Cursor;

    fn gradient(width: u32, height: u32) -> ImageBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        ImageBuffer::new(width, height, pixels).unwrap()
    }

    fn loaded(width: u32, height: u32) -> EditingSession {
        let mut session = EditingSession::new();
        session.load(gradient(width, height));
        session
    }

    fn select(
        session: &mut EditingSession,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Result<EditOutcome, EditError> {
        session.on_press_start(Point::new(from.0, from.1))?;
        session.on_drag(Point::new(to.0, to.1));
        session.on_release_end(Point::new(to.0, to.1))
    }

    #[test]
    fn test_state_transitions() {
        let mut session = EditingSession::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.current().is_none());

        session.load(gradient(100, 100));
        assert_eq!(session.state(), SessionState::Ready);

        session.on_press_start(Point::new(10, 10)).unwrap();
        assert_eq!(session.state(), SessionState::Selecting);

        session.cancel_selection();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_undo_after_first_load_is_nothing_to_undo() {
        let mut session = loaded(50, 50);
        let before = session.current().cloned();

        assert!(matches!(session.undo(), Err(EditError::NothingToUndo)));
        assert_eq!(session.current().cloned(), before);
    }

    #[test]
    fn test_crop_produces_fixed_size() {
        let mut session = loaded(100, 100);
        let outcome = select(&mut session, (50, 50), (10, 10)).unwrap();

        assert_eq!(
            outcome,
            EditOutcome::Cropped {
                rect: SelectionRect::new(10, 10, 50, 50),
                width: 200,
                height: 200
            }
        );
        assert_eq!(session.current().unwrap().dimensions(), (200, 200));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(outcome.to_string(), "Cropped & resized to 200x200.");
    }

    #[test]
    fn test_invalid_region_leaves_image_unchanged() {
        let mut session = loaded(100, 100);
        let before = session.current().cloned().unwrap();

        let result = select(&mut session, (5, 5), (5, 80));
        assert!(matches!(result, Err(EditError::InvalidRegion)));
        assert_eq!(session.current(), Some(&before));
        assert!(!session.can_undo());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_release_without_press() {
        let mut session = loaded(100, 100);
        let outcome = session.on_release_end(Point::new(10, 10)).unwrap();

        assert_eq!(outcome, EditOutcome::NoSelection);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_live_rect_during_drag() {
        let mut session = loaded(100, 100);
        assert_eq!(session.live_rect(), None);

        session.on_press_start(Point::new(30, 30)).unwrap();
        let live = session.on_drag(Point::new(10, 60));

        assert_eq!(live, Some(SelectionRect::new(10, 30, 30, 60)));
        assert_eq!(session.live_rect(), live);
        // Dragging never changes the image or history.
        assert_eq!(session.current().unwrap().dimensions(), (100, 100));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_operations_without_image() {
        let mut session = EditingSession::new();

        assert!(matches!(
            session.on_press_start(Point::new(1, 1)),
            Err(EditError::NoImageLoaded)
        ));
        assert_eq!(session.on_drag(Point::new(2, 2)), None);
        assert!(matches!(
            session.on_release_end(Point::new(3, 3)),
            Err(EditError::NoImageLoaded)
        ));
        assert!(matches!(
            session.request_resize(10, 10),
            Err(EditError::NoImageLoaded)
        ));
        assert!(matches!(
            session.request_edge_detect_default(),
            Err(EditError::NoImageLoaded)
        ));
        assert!(matches!(session.undo(), Err(EditError::NoImageLoaded)));
        assert!(matches!(session.redo(), Err(EditError::NoImageLoaded)));
        assert!(matches!(
            session.export(ExportFormat::Png),
            Err(EditError::NoImageLoaded)
        ));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_resize() {
        let mut session = loaded(64, 48);
        let outcome = session.request_resize(300, 150).unwrap();

        assert_eq!(outcome.to_string(), "Image resized to 300x150.");
        assert_eq!(session.current().unwrap().dimensions(), (300, 150));
        assert!(session.can_undo());
    }

    #[test]
    fn test_resize_rejects_out_of_range() {
        let mut session = loaded(64, 48);

        for (w, h) in [(0, 10), (10, 0), (5001, 10), (10, 5001)] {
            assert!(matches!(
                session.request_resize(w, h),
                Err(EditError::InvalidDimensions { .. })
            ));
        }
        assert!(session.request_resize(5000, 1).is_ok());
        assert_eq!(session.history().undo_depth(), 1);
    }

    #[test]
    fn test_edge_detect_replaces_colors() {
        let mut session = loaded(32, 32);
        let outcome = session.request_edge_detect_default().unwrap();

        assert_eq!(outcome, EditOutcome::EdgesDetected);
        let current = session.current().unwrap();
        assert_eq!(current.dimensions(), (32, 32));
        assert!(current.pixels().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_edge_detect_invalid_thresholds() {
        let mut session = loaded(8, 8);
        let result = session.request_edge_detect(EdgeThresholds::new(-5.0, 10.0));

        assert!(matches!(result, Err(EditError::InvalidThresholds { .. })));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut session = loaded(120, 80);
        let original = session.current().cloned().unwrap();

        select(&mut session, (10, 10), (60, 70)).unwrap();
        session.request_resize(90, 45).unwrap();
        session.request_edge_detect_default().unwrap();
        let last = session.current().cloned().unwrap();

        for _ in 0..3 {
            session.undo().unwrap();
        }
        assert_eq!(session.current(), Some(&original));
        assert!(matches!(session.undo(), Err(EditError::NothingToUndo)));

        for _ in 0..3 {
            session.redo().unwrap();
        }
        assert_eq!(session.current(), Some(&last));
        assert!(matches!(session.redo(), Err(EditError::NothingToRedo)));
    }

    #[test]
    fn test_mutation_after_undo_clears_redo() {
        let mut session = loaded(50, 50);
        session.request_resize(20, 20).unwrap();
        session.undo().unwrap();
        assert!(session.can_redo());

        session.request_resize(30, 30).unwrap();
        assert!(matches!(session.redo(), Err(EditError::NothingToRedo)));
    }

    #[test]
    fn test_current_never_on_stack() {
        let mut session = loaded(40, 40);
        session.request_resize(20, 20).unwrap();
        session.undo().unwrap();

        // One past state (the resize) on redo, nothing on undo.
        assert_eq!(session.history().undo_depth(), 0);
        assert_eq!(session.history().redo_depth(), 1);
        assert_eq!(session.current().unwrap().dimensions(), (40, 40));
    }

    #[test]
    fn test_second_load_is_undoable() {
        let mut session = loaded(10, 10);
        session.load(gradient(20, 20));

        session.undo().unwrap();
        assert_eq!(session.current().unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn test_load_cancels_gesture() {
        let mut session = loaded(10, 10);
        session.on_press_start(Point::new(1, 1)).unwrap();
        session.load(gradient(20, 20));

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(
            session.on_release_end(Point::new(15, 15)).unwrap(),
            EditOutcome::NoSelection
        );
    }

    #[test]
    fn test_load_failure_leaves_state() {
        let mut session = loaded(10, 10);
        let before = session.current().cloned();

        let result = session.apply_load(Err(LoadError::Network("timed out".to_string())));
        assert!(matches!(
            result,
            Err(EditError::LoadFailure(LoadError::Network(_)))
        ));

        let result = session.load_bytes(b"definitely not an image");
        assert!(matches!(
            result,
            Err(EditError::LoadFailure(LoadError::Decode(_)))
        ));

        assert_eq!(session.current().cloned(), before);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_load_failure_then_retry() {
        let mut session = EditingSession::new();
        assert!(session
            .apply_load(Err(LoadError::NotFound("a.png".to_string())))
            .is_err());
        assert_eq!(session.state(), SessionState::Empty);

        let outcome = session.apply_load(Ok(gradient(4, 4))).unwrap();
        assert_eq!(outcome, EditOutcome::Loaded { width: 4, height: 4 });
    }

    #[test]
    fn test_load_bytes_png() {
        let mut out = Cursor::new(Vec::new());
        image::RgbImage::from_pixel(6, 3, image::Rgb([1, 2, 3]))
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();

        let mut session = EditingSession::new();
        session.load_bytes(&out.into_inner()).unwrap();
        assert_eq!(session.current().unwrap().pixel(5, 2), Some([1, 2, 3]));
    }

    #[test]
    fn test_export_png_round_trips() {
        let session = loaded(12, 9);
        let png = session.export(ExportFormat::Png).unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(Some(&decoded), session.current());
    }

    #[test]
    fn test_export_jpeg() {
        let session = loaded(12, 9);
        let jpeg = session.export_jpeg().unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_custom_config() {
        let config = SessionConfig {
            crop_size: (64, 32),
            max_dimension: 100,
            display_scale: 2.0,
            ..SessionConfig::default()
        };
        let mut session = EditingSession::with_config(config);
        session.load(gradient(100, 100));

        // Display (20, 20)-(100, 60) is image (10, 10)-(50, 30).
        let outcome = select(&mut session, (20, 20), (100, 60)).unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Cropped {
                rect: SelectionRect::new(10, 10, 50, 30),
                width: 64,
                height: 32
            }
        );
        assert!(matches!(
            session.request_resize(101, 10),
            Err(EditError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_unbounded_config_is_clamped() {
        let config = SessionConfig {
            crop_size: (0, 0),
            max_dimension: u32::MAX,
            ..SessionConfig::default()
        };
        let mut session = EditingSession::with_config(config);
        session.load(gradient(20, 20));

        assert!(matches!(
            session.request_resize(DEFAULT_MAX_DIMENSION + 1, 10),
            Err(EditError::InvalidDimensions { .. })
        ));
        let outcome = select(&mut session, (0, 0), (10, 10)).unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Cropped {
                rect: SelectionRect::new(0, 0, 10, 10),
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = SessionConfig {
            history_limit: Some(1),
            ..SessionConfig::default()
        };
        let mut session = EditingSession::with_config(config);
        session.load(gradient(10, 10));
        session.request_resize(20, 20).unwrap();
        session.request_resize(30, 30).unwrap();

        session.undo().unwrap();
        assert_eq!(session.current().unwrap().dimensions(), (20, 20));
        assert!(matches!(session.undo(), Err(EditError::NothingToUndo)));
    }

    #[test]
    fn test_load_results_cross_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<EditingSession>();
        assert_send::<Result<ImageBuffer, LoadError>>();

        let handle = std::thread::spawn(|| Ok::<_, LoadError>(gradient(8, 8)));
        let mut session = EditingSession::new();
        session.apply_load(handle.join().unwrap()).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(EditOutcome::Undone.to_string(), "Undo action performed.");
        assert_eq!(EditOutcome::Redone.to_string(), "Redo action performed.");
        assert_eq!(
            EditOutcome::EdgesDetected.to_string(),
            "Edge detection applied."
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
