//! Error taxonomy for the storefront core.
//!
//! Domain failures never cross the core boundary as `Err`. Reducers record
//! them in `last_error` and trace them; the view layer turns availability
//! into disabled controls. Only catalog construction returns these as
//! `Result`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised inside the storefront core
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorefrontError {
    /// Increment with no size selected, or with nothing left to reserve
    #[error("size {size:?} of {product} is unavailable")]
    Unavailable {
        /// Product code the increment targeted
        product: String,
        /// Size label (empty when none was selected)
        size: String,
    },

    /// Operation referenced a product absent from the catalog
    #[error("unknown product {0}")]
    UnknownProduct(String),

    /// Stored cart blob failed to parse
    #[error("stored cart is corrupt: {0}")]
    PersistenceCorrupt(String),

    /// Deferred settle callback fired for a session or generation that is gone
    #[error("stale settle callback (session {session}, generation {generation})")]
    StaleCallback {
        /// Session the callback was scheduled for
        session: u64,
        /// Settle generation the callback was scheduled for
        generation: u64,
    },

    /// Catalog data failed validation or could not be read
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}
