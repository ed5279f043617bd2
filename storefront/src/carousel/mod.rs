//! Gesture carousel controller.
//!
//! A full-screen image viewer with a three-slide window, horizontal
//! swipe-to-navigate with edge rubber-banding, vertical swipe-to-dismiss and
//! snap animations committed by a deferred settle callback.
//!
//! The carousel holds no stock data. Size availability comes from the cart
//! through [`crate::cart::StockGate`] at render time.

pub mod constants;
pub mod gesture;
pub mod reducer;
pub mod types;

pub use gesture::{Point, SwipeDirection};
pub use reducer::{CarouselEnvironment, CarouselReducer};
pub use types::{
    CarouselAction, CarouselState, GesturePhase, InteractionMode, SessionId, SettleTicket,
    ViewerSession,
};
