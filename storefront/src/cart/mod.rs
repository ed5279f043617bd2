//! Stock-aware cart engine.
//!
//! Owns the reservations and is the single source of truth for availability.
//! Readers go through [`StockGate`]; writers send [`CartAction`]s.

pub mod ledger;
pub mod reducer;
pub mod types;

pub use ledger::{CartLedger, StockGate};
pub use reducer::{CartEnvironment, CartReducer};
pub use types::{CartAction, CartState, Reservation};
