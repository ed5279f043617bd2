//! Gesture carousel constants
//!
//! Defaults for every threshold the carousel gesture machine uses. Values are
//! in logical pixels unless noted. `CarouselConfig::default()` reads from
//! here; deployments override through `STOREFRONT_CAROUSEL_*`.

use std::time::Duration;

/// Touch thresholds for axis locking and gesture decisions.
pub mod gesture {
    /// Displacement on either axis that ends the deadzone and locks an axis.
    pub const DEADZONE: f64 = 10.0;
    /// Share of the raw drag applied when dragging past the first or last image.
    pub const RUBBER_BAND_FACTOR: f64 = 0.28;
    /// Downward drag beyond which releasing dismisses the viewer.
    pub const DISMISS_THRESHOLD: f64 = 120.0;
    /// Smallest horizontal drag that can count as a swipe.
    pub const MIN_SWIPE_THRESHOLD: f64 = 60.0;
    /// Swipe threshold as a share of viewport width, when that is larger.
    pub const SWIPE_RATIO: f64 = 0.18;
}

/// Snap animation timing.
pub mod animation {
    use super::Duration;

    /// Pause between a decided swipe and the committed index change.
    pub const SETTLE_DELAY: Duration = Duration::from_millis(180);
}

/// Rendering defaults.
pub mod render {
    /// Opacity of a clamped (duplicated) boundary slide.
    pub const BOUNDARY_SLIDE_OPACITY: f64 = 0.7;
    /// Viewport width used until the view layer reports a measurement.
    pub const FALLBACK_VIEWPORT_WIDTH: f64 = 390.0;
}
