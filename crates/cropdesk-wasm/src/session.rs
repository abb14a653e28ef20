//! Editing session bindings.
//!
//! `JsEditingSession` owns one [`EditingSession`]. Browser code forwards
//! pointer events and button clicks to it and repaints from `current()` and
//! `live_rect()` afterwards. Commands return the status line to show.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsEditingSession({ crop_size: [200, 200] });
//! session.load_bytes(new Uint8Array(await file.arrayBuffer()));
//!
//! canvas.onpointerdown = (e) => session.pointer_down(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => { if (session.pointer_move(e.offsetX, e.offsetY)) redraw(); };
//! canvas.onpointerup = (e) => { status.textContent = session.pointer_up(e.offsetX, e.offsetY); };
//! ```

use cropdesk_core::decode::DecodeError;
use cropdesk_core::{
    EdgeThresholds, EditingSession, ExportFormat, ImageBuffer, LoadError, Point, SessionConfig,
    SessionState,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsImageBuffer, JsRect};

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Map a loader failure reported from JS onto the core error.
///
/// Known kinds are `"network"` and `"not_found"`; anything else is treated
/// as undecodable content.
pub(crate) fn load_error_from_kind(kind: &str, message: String) -> LoadError {
    match kind.to_ascii_lowercase().as_str() {
        "network" => LoadError::Network(message),
        "not_found" | "notfound" | "not-found" => LoadError::NotFound(message),
        _ => LoadError::Decode(DecodeError::CorruptedFile(message)),
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Empty => "empty",
        SessionState::Ready => "ready",
        SessionState::Selecting => "selecting",
    }
}

#[wasm_bindgen]
pub struct JsEditingSession {
    inner: EditingSession,
}

#[wasm_bindgen]
impl JsEditingSession {
    /// Create a session. `config` may be omitted or a partial object; missing
    /// fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<JsValue>) -> Result<JsEditingSession, JsValue> {
        let config = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                serde_wasm_bindgen::from_value::<SessionConfig>(value).map_err(to_js_error)?
            }
            _ => SessionConfig::default(),
        };
        Ok(Self::with_config(config))
    }

    /// Current configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    /// `"empty"`, `"ready"` or `"selecting"`.
    pub fn state(&self) -> String {
        state_name(self.inner.state()).to_string()
    }

    /// Decode PNG or JPEG bytes and make them the current image.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<String, JsValue> {
        self.inner
            .load_bytes(bytes)
            .map(|outcome| outcome.to_string())
            .map_err(to_js_error)
    }

    /// Load already-decoded RGB pixels, e.g. from an `OffscreenCanvas`.
    pub fn load_pixels(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<String, JsValue> {
        let buffer = ImageBuffer::new(width, height, pixels).map_err(to_js_error)?;
        Ok(self.inner.load(buffer).to_string())
    }

    /// Record that a JS-side loader failed. Returns the status line.
    pub fn report_load_failure(&mut self, kind: &str, message: String) -> String {
        match self.inner.apply_load(Err(load_error_from_kind(kind, message))) {
            Ok(outcome) => outcome.to_string(),
            Err(err) => err.to_string(),
        }
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.inner.on_press_start(Point::new(x, y)).map_err(to_js_error)
    }

    /// Returns whether a selection rectangle should be drawn.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        self.inner.on_drag(Point::new(x, y)).is_some()
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) -> Result<String, JsValue> {
        self.inner
            .on_release_end(Point::new(x, y))
            .map(|outcome| outcome.to_string())
            .map_err(to_js_error)
    }

    pub fn cancel_selection(&mut self) {
        self.inner.cancel_selection();
    }

    /// Live selection as `{ x, y, width, height }` in image pixels, or `undefined`.
    pub fn live_rect(&self) -> Result<JsValue, JsValue> {
        match self.inner.live_rect() {
            Some(rect) => serde_wasm_bindgen::to_value(&JsRect::from(rect)).map_err(to_js_error),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<String, JsValue> {
        self.inner
            .request_resize(width, height)
            .map(|outcome| outcome.to_string())
            .map_err(to_js_error)
    }

    /// Canny edge detection. Omitted thresholds fall back to the configured ones.
    pub fn edge_detect(&mut self, low: Option<f32>, high: Option<f32>) -> Result<String, JsValue> {
        let defaults = self.inner.config().edge_thresholds;
        let thresholds = EdgeThresholds::new(
            low.unwrap_or(defaults.low),
            high.unwrap_or(defaults.high),
        );
        self.inner
            .request_edge_detect(thresholds)
            .map(|outcome| outcome.to_string())
            .map_err(to_js_error)
    }

    pub fn undo(&mut self) -> Result<String, JsValue> {
        self.inner
            .undo()
            .map(|outcome| outcome.to_string())
            .map_err(to_js_error)
    }

    pub fn redo(&mut self) -> Result<String, JsValue> {
        self.inner
            .redo()
            .map(|outcome| outcome.to_string())
            .map_err(to_js_error)
    }

    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    /// The image to display, or `undefined` before the first load.
    pub fn current(&self) -> Option<JsImageBuffer> {
        self.inner.current().cloned().map(JsImageBuffer::from_core)
    }

    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.export(ExportFormat::Png).map_err(to_js_error)
    }

    /// JPEG bytes at `quality`, or the configured quality when omitted.
    pub fn export_jpeg(&self, quality: Option<u8>) -> Result<Vec<u8>, JsValue> {
        let result = match quality {
            Some(quality) => self.inner.export(ExportFormat::Jpeg { quality }),
            None => self.inner.export_jpeg(),
        };
        result.map_err(to_js_error)
    }

    /// Adopt an image produced elsewhere in JS (consumes the handle).
    pub fn load_image(&mut self, image: JsImageBuffer) -> String {
        self.inner.load(image.into_core()).to_string()
    }
}

impl JsEditingSession {
    pub(crate) fn with_config(config: SessionConfig) -> Self {
        Self {
            inner: EditingSession::with_config(config),
        }
    }
}
