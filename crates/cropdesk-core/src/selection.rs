//! Pointer-drag gesture to selection rectangle.
//!
//! A gesture has three phases: press ([`SelectionController::begin`]), drag
//! ([`SelectionController::update`]) and release
//! ([`SelectionController::complete`]). Only release produces a rectangle
//! the transform pipeline may act on; drag rectangles are for on-screen
//! feedback.
//!
//! Bounds are clamped here rather than in the crop transform, so anything
//! leaving this module is already inside the image.

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Pointer position in image-pixel coordinates.
///
/// Signed because a drag may leave the canvas on the top or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle in image-pixel coordinates with `x1 <= x2` and `y1 <= y2`.
///
/// `x2`/`y2` are exclusive, matching a crop box: the rectangle covers
/// columns `x1..x2` and rows `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl SelectionRect {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Zero width or zero height.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the rectangle is ordered and lies within a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2 && self.x2 <= width && self.y2 <= height
    }

    /// Sort two corners and clamp them into `[0, width] x [0, height]`.
    pub fn from_corners(a: Point, b: Point, width: u32, height: u32) -> Self {
        let (x1, x2) = sorted(a.x, b.x);
        let (y1, y2) = sorted(a.y, b.y);

        Self {
            x1: clamp_coord(x1, width),
            y1: clamp_coord(y1, height),
            x2: clamp_coord(x2, width),
            y2: clamp_coord(y2, height),
        }
    }
}

/// Phase of the pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    /// No button held.
    #[default]
    Idle,
    /// Pressed, not yet moved.
    Armed { anchor: Point },
    /// Pressed and moved at least once.
    Dragging { anchor: Point, current: Point },
}

/// Turns press/drag/release events into a validated [`SelectionRect`].
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    gesture: Gesture,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Whether a press is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Start a gesture at `point`, discarding any gesture in progress.
    pub fn begin(&mut self, point: Point) {
        if self.is_active() {
            log::debug!("selection restarted, previous gesture discarded");
        }
        self.gesture = Gesture::Armed { anchor: point };
    }

    /// Track the pointer and return the live rectangle for display.
    ///
    /// The rectangle is clamped to the image but may be degenerate. Returns
    /// `None` if no gesture is active.
    pub fn update(&mut self, point: Point, width: u32, height: u32) -> Option<SelectionRect> {
        let anchor = self.anchor()?;
        self.gesture = Gesture::Dragging {
            anchor,
            current: point,
        };
        Some(SelectionRect::from_corners(anchor, point, width, height))
    }

    /// Live rectangle of the current drag, if the pointer has moved since the press.
    pub fn live_rect(&self, width: u32, height: u32) -> Option<SelectionRect> {
        match self.gesture {
            Gesture::Dragging { anchor, current } => {
                Some(SelectionRect::from_corners(anchor, current, width, height))
            }
            _ => None,
        }
    }

    /// Finish the gesture at `point`.
    ///
    /// Returns `Ok(None)` if no gesture was active and `Err(InvalidRegion)` if
    /// the clamped rectangle has zero area. The gesture is reset in every case.
    pub fn complete(
        &mut self,
        point: Point,
        width: u32,
        height: u32,
    ) -> Result<Option<SelectionRect>, EditError> {
        let anchor = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => return Ok(None),
            Gesture::Armed { anchor } | Gesture::Dragging { anchor, .. } => anchor,
        };

        let rect = SelectionRect::from_corners(anchor, point, width, height);
        if rect.is_degenerate() {
            log::debug!("selection rejected: {:?} is empty", rect);
            return Err(EditError::InvalidRegion);
        }

        Ok(Some(rect))
    }

    /// Drop the gesture without producing a rectangle.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    fn anchor(&self) -> Option<Point> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Armed { anchor } | Gesture::Dragging { anchor, .. } => Some(anchor),
        }
    }
}

#[inline]
fn sorted(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
fn clamp_coord(v: i32, max: u32) -> u32 {
    (v.max(0) as u32).min(max)
}
