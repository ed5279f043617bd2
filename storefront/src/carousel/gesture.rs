//! Pure gesture math.
//!
//! No state lives here; the reducer feeds in displacements and boundary
//! flags and gets back decisions.

use serde::{Deserialize, Serialize};

/// A pointer position in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to this point
    #[must_use]
    pub fn delta_from(self, origin: Self) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// The axis a gesture is locked to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Navigate between images
    Horizontal,
    /// Swipe down to dismiss
    Vertical,
}

/// Direction of a decided swipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Toward the previous image (positive drag)
    Previous,
    /// Toward the next image (negative drag)
    Next,
}

impl SwipeDirection {
    /// Track offset at which the snap-through animation ends
    #[must_use]
    pub fn snap_offset(self, width: f64) -> f64 {
        match self {
            Self::Previous => width,
            Self::Next => -width,
        }
    }
}

/// Outcome of releasing a horizontal drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Animate a full slide toward `direction`, then move the index
    SnapThrough(SwipeDirection),
    /// Animate back to the current image
    SnapBack,
}

/// Decides the axis once the deadzone is left, `None` while inside it.
///
/// Horizontal wins only when strictly dominant; ties lock vertical.
#[must_use]
pub fn lock_axis(dx: f64, dy: f64, deadzone: f64) -> Option<Axis> {
    if dx.abs() < deadzone && dy.abs() < deadzone {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(Axis::Horizontal)
    } else {
        Some(Axis::Vertical)
    }
}

/// Damps a horizontal drag past a boundary
#[must_use]
pub fn rubber_band(dx: f64, at_first: bool, at_last: bool, factor: f64) -> f64 {
    if (at_first && dx > 0.0) || (at_last && dx < 0.0) {
        dx * factor
    } else {
        dx
    }
}

/// Horizontal distance a drag must exceed to count as a swipe
#[must_use]
pub fn swipe_threshold(width: f64, minimum: f64, ratio: f64) -> f64 {
    minimum.max(width * ratio)
}

/// Decides what releasing a horizontal drag at `offset` does
#[must_use]
pub fn resolve_swipe(offset: f64, threshold: f64, at_first: bool, at_last: bool) -> SwipeOutcome {
    if offset < -threshold && !at_last {
        SwipeOutcome::SnapThrough(SwipeDirection::Next)
    } else if offset > threshold && !at_first {
        SwipeOutcome::SnapThrough(SwipeDirection::Previous)
    } else {
        SwipeOutcome::SnapBack
    }
}
