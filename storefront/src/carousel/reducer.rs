//! Reducer logic for the gesture carousel.
//!
//! Pointer input drives the gesture machine in [`GesturePhase`]. Decided
//! swipes schedule a `SettleElapsed` delay carrying a [`SettleTicket`]; the
//! runtime never cancels delays, so every cancellation path bumps the
//! session generation and the late callback fails the ticket check.

use super::gesture::{self, Axis, Point, SwipeDirection, SwipeOutcome};
use super::types::{CarouselAction, CarouselState, GesturePhase, SessionId, SettleTicket, ViewerSession};
use crate::catalog::ProductCode;
use crate::config::CarouselConfig;
use crate::error::StorefrontError;
use vitrine_core::{delay, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Environment dependencies for the carousel reducer
#[derive(Clone, Debug, Default)]
pub struct CarouselEnvironment {
    /// Gesture thresholds and timing
    pub config: CarouselConfig,
}

impl CarouselEnvironment {
    /// Creates a new `CarouselEnvironment`
    #[must_use]
    pub const fn new(config: CarouselConfig) -> Self {
        Self { config }
    }
}

/// Reducer for the gesture carousel
#[derive(Clone, Debug, Default)]
pub struct CarouselReducer;

impl CarouselReducer {
    /// Creates a new `CarouselReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn open(
        state: &mut CarouselState,
        product: ProductCode,
        image_count: usize,
        size: Option<String>,
    ) {
        if image_count == 0 {
            tracing::warn!(%product, "Refusing to open a product without images");
            return;
        }

        state.sessions_opened += 1;
        let id = SessionId::new(state.sessions_opened);

        if let Some(previous) = state.session.as_ref() {
            tracing::debug!(previous = %previous.id, "Replacing open viewer session");
        }

        tracing::debug!(session = %id, %product, image_count, "Viewer opened");
        state.session = Some(ViewerSession::new(id, product, image_count, size));
        state.last_error = None;
    }

    fn pointer_down(session: &mut ViewerSession, point: Point) {
        match session.phase {
            GesturePhase::Idle => {
                session.phase = GesturePhase::Pressed { origin: point };
            },
            GesturePhase::Settling { target: None, .. } => {
                // The pending snap-back callback goes stale
                session.generation += 1;
                session.phase = GesturePhase::Pressed { origin: point };
            },
            GesturePhase::Settling { target: Some(_), .. } => {
                tracing::trace!(session = %session.id, "Pointer down ignored during snap-through");
            },
            GesturePhase::Pressed { .. }
            | GesturePhase::Horizontal { .. }
            | GesturePhase::Vertical { .. } => {
                tracing::trace!(session = %session.id, "Additional contact point ignored");
            },
        }
    }

    fn pointer_move(session: &mut ViewerSession, point: Point, config: &CarouselConfig) {
        let (at_first, at_last) = (session.at_first(), session.at_last());
        let band = |dx: f64| gesture::rubber_band(dx, at_first, at_last, config.rubber_band_factor);

        session.phase = match session.phase {
            GesturePhase::Pressed { origin } => {
                let (dx, dy) = point.delta_from(origin);
                match gesture::lock_axis(dx, dy, config.deadzone) {
                    None => return,
                    Some(Axis::Horizontal) => GesturePhase::Horizontal {
                        origin,
                        offset: band(dx),
                    },
                    Some(Axis::Vertical) => GesturePhase::Vertical {
                        origin,
                        offset: dy.max(0.0),
                    },
                }
            },
            GesturePhase::Horizontal { origin, .. } => {
                let (dx, _) = point.delta_from(origin);
                GesturePhase::Horizontal {
                    origin,
                    offset: band(dx),
                }
            },
            GesturePhase::Vertical { origin, .. } => {
                let (_, dy) = point.delta_from(origin);
                GesturePhase::Vertical {
                    origin,
                    offset: dy.max(0.0),
                }
            },
            GesturePhase::Idle | GesturePhase::Settling { .. } => return,
        };
    }

    /// Enters `Settling` and returns the delay that will commit it
    fn begin_settle(
        session: &mut ViewerSession,
        target: Option<SwipeDirection>,
        offset: f64,
        config: &CarouselConfig,
    ) -> Effect<CarouselAction> {
        session.generation += 1;
        let ticket = session.ticket();
        session.phase = GesturePhase::Settling {
            target,
            offset,
            ticket,
        };

        delay! {
            duration: config.settle_delay,
            action: CarouselAction::SettleElapsed { ticket }
        }
    }

    /// Leaves any gesture or animation and shows `index` directly
    fn jump(session: &mut ViewerSession, index: usize) {
        if session.phase.is_animating() {
            tracing::trace!(session = %session.id, "Jump cancels pending settle");
        }
        session.generation += 1;
        session.phase = GesturePhase::Idle;
        session.index = index;
    }

    /// Checks a settle ticket against the live session
    fn validate_ticket(state: &CarouselState, ticket: SettleTicket) -> Result<(), StorefrontError> {
        let stale = StorefrontError::StaleCallback {
            session: ticket.session.value(),
            generation: ticket.generation,
        };

        let Some(session) = state.session.as_ref() else {
            return Err(stale);
        };

        let expected = session.ticket();
        match session.phase {
            GesturePhase::Settling { ticket: pending, .. } if pending == ticket && expected == ticket => {
                Ok(())
            },
            _ => Err(stale),
        }
    }

    /// Applies an event to state
    fn apply_event(state: &mut CarouselState, action: &CarouselAction) {
        match action {
            CarouselAction::SettleElapsed { ticket } => {
                let Some(session) = state.session.as_mut() else {
                    return;
                };
                if let GesturePhase::Settling {
                    target,
                    ticket: pending,
                    ..
                } = session.phase
                {
                    if pending != *ticket {
                        return;
                    }
                    match target {
                        Some(SwipeDirection::Next) => session.index = session.next_index(),
                        Some(SwipeDirection::Previous) => session.index = session.previous_index(),
                        None => {},
                    }
                    session.phase = GesturePhase::Idle;
                }
            },
            CarouselAction::Dismissed { session } => {
                if state.session.as_ref().is_some_and(|s| s.id == *session) {
                    state.session = None;
                }
            },
            // Commands are not applied to state
            CarouselAction::Open { .. }
            | CarouselAction::Close
            | CarouselAction::PointerDown { .. }
            | CarouselAction::PointerMove { .. }
            | CarouselAction::PointerUp
            | CarouselAction::PointerCancel
            | CarouselAction::JumpTo { .. }
            | CarouselAction::StepPrevious
            | CarouselAction::StepNext
            | CarouselAction::ViewportResized { .. }
            | CarouselAction::SelectSize { .. } => {},
        }
    }

    fn pointer_up(
        state: &mut CarouselState,
        config: &CarouselConfig,
    ) -> SmallVec<[Effect<CarouselAction>; 4]> {
        let width = state.effective_width(config.fallback_viewport_width);
        let Some(session) = state.session.as_mut() else {
            return SmallVec::new();
        };

        match session.phase {
            GesturePhase::Pressed { .. } => {
                session.phase = GesturePhase::Idle;
                SmallVec::new()
            },
            GesturePhase::Vertical { offset, .. } => {
                if offset > config.dismiss_threshold {
                    let id = session.id;
                    tracing::debug!(session = %id, offset, "Viewer dismissed by swipe");
                    Self::apply_event(state, &CarouselAction::Dismissed { session: id });
                } else {
                    session.phase = GesturePhase::Idle;
                }
                SmallVec::new()
            },
            GesturePhase::Horizontal { offset, .. } => {
                let threshold = config.swipe_threshold(width);
                let outcome =
                    gesture::resolve_swipe(offset, threshold, session.at_first(), session.at_last());

                let (target, end_offset) = match outcome {
                    SwipeOutcome::SnapThrough(direction) => {
                        (Some(direction), direction.snap_offset(width))
                    },
                    SwipeOutcome::SnapBack => (None, 0.0),
                };

                tracing::trace!(session = %session.id, offset, threshold, ?outcome, "Horizontal release");
                smallvec![Self::begin_settle(session, target, end_offset, config)]
            },
            GesturePhase::Idle | GesturePhase::Settling { .. } => SmallVec::new(),
        }
    }
}

impl Reducer for CarouselReducer {
    type State = CarouselState;
    type Action = CarouselAction;
    type Environment = CarouselEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action keeps the machine readable
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let config = &env.config;

        match action {
            // ========== Commands ==========
            CarouselAction::Open {
                product,
                image_count,
                size,
            } => {
                Self::open(state, product, image_count, size);
                SmallVec::new()
            },

            CarouselAction::Close => {
                if let Some(session) = state.session.take() {
                    tracing::debug!(session = %session.id, "Viewer closed");
                }
                SmallVec::new()
            },

            CarouselAction::PointerDown { point } => {
                if let Some(session) = state.session.as_mut() {
                    Self::pointer_down(session, point);
                }
                SmallVec::new()
            },

            CarouselAction::PointerMove { point } => {
                if let Some(session) = state.session.as_mut() {
                    Self::pointer_move(session, point, config);
                }
                SmallVec::new()
            },

            CarouselAction::PointerUp => Self::pointer_up(state, config),

            CarouselAction::PointerCancel => {
                let Some(session) = state.session.as_mut() else {
                    return SmallVec::new();
                };
                match session.phase {
                    GesturePhase::Horizontal { .. } => {
                        smallvec![Self::begin_settle(session, None, 0.0, config)]
                    },
                    GesturePhase::Pressed { .. } | GesturePhase::Vertical { .. } => {
                        session.phase = GesturePhase::Idle;
                        SmallVec::new()
                    },
                    GesturePhase::Idle | GesturePhase::Settling { .. } => SmallVec::new(),
                }
            },

            CarouselAction::JumpTo { index } => {
                let Some(session) = state.session.as_mut() else {
                    return SmallVec::new();
                };
                if index >= session.image_count {
                    tracing::debug!(session = %session.id, index, "Jump target out of range");
                    return SmallVec::new();
                }
                Self::jump(session, index);
                SmallVec::new()
            },

            CarouselAction::StepPrevious => {
                if let Some(session) = state.session.as_mut() {
                    if !session.at_first() {
                        let index = session.previous_index();
                        Self::jump(session, index);
                    }
                }
                SmallVec::new()
            },

            CarouselAction::StepNext => {
                if let Some(session) = state.session.as_mut() {
                    if !session.at_last() {
                        let index = session.next_index();
                        Self::jump(session, index);
                    }
                }
                SmallVec::new()
            },

            CarouselAction::ViewportResized { width } => {
                if width.is_finite() && width > 0.0 {
                    state.viewport_width = Some(width);
                } else {
                    tracing::debug!(width, "Ignoring unusable viewport width");
                }
                SmallVec::new()
            },

            CarouselAction::SelectSize { size } => {
                if let Some(session) = state.session.as_mut() {
                    session.selected_size = Some(size);
                }
                SmallVec::new()
            },

            // ========== Events ==========
            CarouselAction::SettleElapsed { ticket } => {
                if let Err(error) = Self::validate_ticket(state, ticket) {
                    tracing::debug!(%ticket, "Discarding stale settle callback");
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                Self::apply_event(state, &action);
                SmallVec::new()
            },

            CarouselAction::Dismissed { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
