//! Domain types for the gesture carousel.
//!
//! A viewer session exists from the moment a product is opened until the
//! viewer closes. Its gesture phase is a finite-state machine whose variants
//! carry exactly the data valid in that phase, so a vertical offset can never
//! coexist with a horizontal lock.

use super::gesture::{Point, SwipeDirection};
use crate::catalog::ProductCode;
use crate::error::StorefrontError;
use serde::{Deserialize, Serialize};
use vitrine_macros::Action;

/// Identity of one viewer session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a session id
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Token carried by a deferred settle callback.
///
/// The callback only applies while both the session and its settle
/// generation still match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettleTicket {
    /// Session that scheduled the callback
    pub session: SessionId,
    /// Settle generation at scheduling time
    pub generation: u64,
}

impl std::fmt::Display for SettleTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/g{}", self.session, self.generation)
    }
}

/// Gesture phase of an open viewer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GesturePhase {
    /// No pointer down, no animation
    Idle,
    /// Pointer down, still inside the deadzone
    Pressed {
        /// Where the pointer went down
        origin: Point,
    },
    /// Locked to the horizontal axis
    Horizontal {
        /// Where the pointer went down
        origin: Point,
        /// Rubber-banded track displacement
        offset: f64,
    },
    /// Locked to the vertical axis
    Vertical {
        /// Where the pointer went down
        origin: Point,
        /// Downward sheet displacement, never negative
        offset: f64,
    },
    /// Snap animation in flight, waiting for its settle callback
    Settling {
        /// Where the snap is heading; `None` snaps back
        target: Option<SwipeDirection>,
        /// Track offset the animation ends at
        offset: f64,
        /// Ticket the settle callback must present
        ticket: SettleTicket,
    },
}

/// Coarse interaction mode, as the view layer sees it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    /// No axis locked
    Idle,
    /// Horizontal drag in progress
    LockedHorizontal,
    /// Vertical drag in progress
    LockedVertical,
}

impl GesturePhase {
    /// Coarse mode; pressed and settling report idle
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        match self {
            Self::Horizontal { .. } => InteractionMode::LockedHorizontal,
            Self::Vertical { .. } => InteractionMode::LockedVertical,
            Self::Idle | Self::Pressed { .. } | Self::Settling { .. } => InteractionMode::Idle,
        }
    }

    /// True only while a snap animation is in flight
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        matches!(self, Self::Settling { .. })
    }

    /// True while a pointer is down
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        matches!(
            self,
            Self::Pressed { .. } | Self::Horizontal { .. } | Self::Vertical { .. }
        )
    }

    /// Current track displacement
    #[must_use]
    pub const fn horizontal_offset(&self) -> f64 {
        match self {
            Self::Horizontal { offset, .. } | Self::Settling { offset, .. } => *offset,
            _ => 0.0,
        }
    }

    /// Current sheet displacement
    #[must_use]
    pub const fn vertical_offset(&self) -> f64 {
        match self {
            Self::Vertical { offset, .. } => *offset,
            _ => 0.0,
        }
    }
}

/// State of one open viewer
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSession {
    /// Session identity, fresh for every open
    pub id: SessionId,
    /// Product on display
    pub product: ProductCode,
    /// Number of images, at least 1
    pub image_count: usize,
    /// Current image, within `0..image_count`
    pub index: usize,
    /// Selected size, if any
    pub selected_size: Option<String>,
    /// Gesture machine
    pub phase: GesturePhase,
    /// Bumped whenever a settle is scheduled or cancelled
    pub generation: u64,
}

impl ViewerSession {
    /// Creates a session at the first image
    #[must_use]
    pub fn new(
        id: SessionId,
        product: ProductCode,
        image_count: usize,
        selected_size: Option<String>,
    ) -> Self {
        Self {
            id,
            product,
            image_count,
            index: 0,
            selected_size,
            phase: GesturePhase::Idle,
            generation: 0,
        }
    }

    /// Whether the current image is the first
    #[must_use]
    pub const fn at_first(&self) -> bool {
        self.index == 0
    }

    /// Whether the current image is the last
    #[must_use]
    pub const fn at_last(&self) -> bool {
        self.index + 1 >= self.image_count
    }

    /// Index of the previous slide, clamped to the first
    #[must_use]
    pub const fn previous_index(&self) -> usize {
        self.index.saturating_sub(1)
    }

    /// Index of the next slide, clamped to the last
    #[must_use]
    pub fn next_index(&self) -> usize {
        (self.index + 1).min(self.image_count.saturating_sub(1))
    }

    /// Coarse interaction mode
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.phase.mode()
    }

    /// Whether a snap animation is in flight
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    /// Ticket for the current generation
    #[must_use]
    pub const fn ticket(&self) -> SettleTicket {
        SettleTicket {
            session: self.id,
            generation: self.generation,
        }
    }
}

/// State of the carousel feature
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarouselState {
    /// Open viewer, if any
    pub session: Option<ViewerSession>,
    /// Last measured viewport width
    pub viewport_width: Option<f64>,
    /// Counter behind fresh session ids
    pub sessions_opened: u64,
    /// Last recovered failure (if any)
    pub last_error: Option<StorefrontError>,
}

impl CarouselState {
    /// Creates a closed carousel
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a viewer is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Measured viewport width, or `fallback` before any measurement
    #[must_use]
    pub fn effective_width(&self, fallback: f64) -> f64 {
        self.viewport_width.unwrap_or(fallback)
    }
}

/// Commands and events for the carousel
#[derive(Action, Clone, Debug, PartialEq)]
pub enum CarouselAction {
    // ========== Commands ==========
    /// Command: Open the viewer on a product, replacing any open session
    #[command]
    Open {
        /// Product to show
        product: ProductCode,
        /// Number of images the product has
        image_count: usize,
        /// Preselected size
        size: Option<String>,
    },

    /// Command: Close the viewer
    #[command]
    Close,

    /// Command: Pointer or touch went down
    #[command]
    PointerDown {
        /// Pointer position
        point: Point,
    },

    /// Command: Pointer moved (last write wins)
    #[command]
    PointerMove {
        /// Pointer position
        point: Point,
    },

    /// Command: Pointer released
    #[command]
    PointerUp,

    /// Command: Gesture abandoned by the platform
    #[command]
    PointerCancel,

    /// Command: Position dot activated
    #[command]
    JumpTo {
        /// Target image
        index: usize,
    },

    /// Command: Left tap zone activated
    #[command]
    StepPrevious,

    /// Command: Right tap zone activated
    #[command]
    StepNext,

    /// Command: The view layer measured the viewport
    #[command]
    ViewportResized {
        /// Width in logical pixels
        width: f64,
    },

    /// Command: Record the selected size on the session
    #[command]
    SelectSize {
        /// Size label
        size: String,
    },

    // ========== Events ==========
    /// Event: A settle delay elapsed
    #[event]
    SettleElapsed {
        /// Ticket issued when the settle was scheduled
        ticket: SettleTicket,
    },

    /// Event: A vertical swipe dismissed the viewer
    #[event]
    Dismissed {
        /// Session that was torn down
        session: SessionId,
    },
}
