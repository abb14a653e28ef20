//! Cropdesk WASM - WebAssembly bindings for the Cropdesk editing session
//!
//! Exposes `cropdesk-core` to JavaScript/TypeScript. The browser owns the
//! canvas, file pickers and network; this crate owns image state.
//!
//! # Module Structure
//!
//! - `session` - `JsEditingSession`, the event-driven editing API
//! - `types` - WASM-compatible wrapper types for image data
//! - `logger` - routes `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditingSession } from '@cropdesk/wasm';
//!
//! await init();
//! const session = new JsEditingSession();
//! session.load_bytes(bytes);
//! ```

use wasm_bindgen::prelude::*;

mod logger;
mod session;
mod types;

pub use session::JsEditingSession;
pub use types::{JsImageBuffer, JsRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init(log::LevelFilter::Info);
    log::debug!("cropdesk-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
