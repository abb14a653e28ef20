//! Image decoding for the loader side of the editing session.
//!
//! The session never performs I/O itself: a loader reads a file or fetches a
//! URL, then hands the bytes to [`decode_image`] (directly or through
//! `EditingSession::load_bytes`).
//!
//! # Examples
//!
//! ```ignore
//! use cropdesk_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod reader;
mod types;

pub use reader::decode_image;
pub use types::DecodeError;
pub(crate) use types::Orientation;
