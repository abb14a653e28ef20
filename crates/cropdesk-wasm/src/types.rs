//! WASM-compatible wrapper types for image data.

use cropdesk_core::{ImageBuffer, SelectionRect};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// An RGB image handed to JavaScript.
///
/// Wraps the core [`ImageBuffer`]. Cloning shares the pixel storage, so
/// handing out the current image costs nothing until JS asks for the bytes.
#[wasm_bindgen]
pub struct JsImageBuffer {
    inner: ImageBuffer,
}

#[wasm_bindgen]
impl JsImageBuffer {
    /// Create an image from RGB pixel data (3 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsImageBuffer, JsValue> {
        ImageBuffer::new(width, height, pixels)
            .map(Self::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Number of bytes in the RGB buffer (width * height * 3).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// RGB pixel data as a `Uint8Array` copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// RGBA pixel data with opaque alpha, ready for `new ImageData(...)`.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.inner.pixel_count() as usize * 4);
        for px in self.inner.pixels().chunks_exact(3) {
            out.extend_from_slice(px);
            out.push(255);
        }
        out
    }
}

impl JsImageBuffer {
    pub(crate) fn from_core(inner: ImageBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn into_core(self) -> ImageBuffer {
        self.inner
    }
}

/// Plain-object form of a selection rectangle for `serde-wasm-bindgen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<SelectionRect> for JsRect {
    fn from(rect: SelectionRect) -> Self {
        Self {
            x: rect.x1,
            y: rect.y1,
            width: rect.width(),
            height: rect.height(),
        }
    }
}
