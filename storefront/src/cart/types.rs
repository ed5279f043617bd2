//! Domain types for the stock-aware cart.

use crate::catalog::{Catalog, Product, ProductCode};
use crate::error::StorefrontError;
use crate::storage::CartSnapshot;
use serde::{Deserialize, Serialize};
use vitrine_core::state::Revision;
use vitrine_macros::{Action, State};

/// A cart entry drawn against one size's stock
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Reserved product
    pub product_id: ProductCode,
    /// Reserved size
    pub size: String,
    /// Units reserved, at least 1
    pub quantity: u32,
}

impl Reservation {
    fn matches(&self, product: &ProductCode, size: &str) -> bool {
        &self.product_id == product && self.size == size
    }
}

/// State of the cart
///
/// At most one reservation exists per (product, size) and none has
/// quantity 0. Insertion order is the cart panel's display order.
#[derive(State, Clone, Debug, Default, PartialEq, Eq)]
pub struct CartState {
    reservations: Vec<Reservation>,
    /// Bumped on every applied mutation
    #[revision]
    revision: Revision,
    /// Last rejected command (if any)
    pub last_error: Option<StorefrontError>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from persisted reservations, merging duplicate pairs
    /// and dropping zero quantities
    #[must_use]
    pub fn from_reservations(reservations: impl IntoIterator<Item = Reservation>) -> Self {
        let mut cart = Self::new();
        for reservation in reservations {
            if reservation.quantity == 0 {
                continue;
            }
            match cart
                .reservations
                .iter_mut()
                .find(|r| r.matches(&reservation.product_id, &reservation.size))
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(reservation.quantity);
                },
                None => cart.reservations.push(reservation),
            }
        }
        cart
    }

    /// Reservations in display order
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Whether the cart has no reservations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Reserved quantity for a pair, 0 when absent
    #[must_use]
    pub fn quantity_of(&self, product: &ProductCode, size: &str) -> u32 {
        self.reservations
            .iter()
            .find(|r| r.matches(product, size))
            .map_or(0, |r| r.quantity)
    }

    /// Total stock minus reserved quantity.
    ///
    /// Negative only when stock data shrank under an existing reservation.
    /// Unknown products and sizes have total stock 0.
    #[must_use]
    pub fn remaining(&self, catalog: &Catalog, product: &ProductCode, size: &str) -> i64 {
        let total = catalog.get(product).map_or(0, |p| p.total_stock(size));
        i64::from(total) - i64::from(self.quantity_of(product, size))
    }

    /// First size in display order with stock left
    #[must_use]
    pub fn first_available_size<'p>(&self, product: &'p Product) -> Option<&'p str> {
        product.sizes.iter().find_map(|s| {
            let remaining = i64::from(s.stock) - i64::from(self.quantity_of(&product.code, &s.size));
            (remaining > 0).then_some(s.size.as_str())
        })
    }

    /// Sum of all quantities, for the badge
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.reservations
            .iter()
            .fold(0u32, |total, r| total.saturating_add(r.quantity))
    }

    /// Current reservations tagged with the current revision
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            revision: self.revision(),
            reservations: self.reservations.clone(),
        }
    }

    /// Sets the quantity of a pair, inserting or removing as needed
    pub(crate) fn set_quantity(&mut self, product: &ProductCode, size: &str, quantity: u32) {
        let position = self.reservations.iter().position(|r| r.matches(product, size));
        match (position, quantity) {
            (Some(index), 0) => {
                self.reservations.remove(index);
            },
            (Some(index), quantity) => self.reservations[index].quantity = quantity,
            (None, 0) => {},
            (None, quantity) => self.reservations.push(Reservation {
                product_id: product.clone(),
                size: size.to_string(),
                quantity,
            }),
        }
    }

    pub(crate) fn clear_reservations(&mut self) {
        self.reservations.clear();
    }
}

/// Actions representing commands and events for the cart
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum CartAction {
    // ========== Commands ==========
    /// Command: Reserve one more unit of a size
    #[command]
    Increment {
        /// Product to reserve
        product: ProductCode,
        /// Size to reserve; empty when none is selected
        size: String,
    },

    /// Command: Release one unit of a size
    #[command]
    Decrement {
        /// Product to release
        product: ProductCode,
        /// Size to release
        size: String,
    },

    /// Command: Release everything
    #[command]
    Clear,

    // ========== Events ==========
    /// Event: A reservation grew to `quantity`
    #[event]
    ReservationIncremented {
        /// Reserved product
        product: ProductCode,
        /// Reserved size
        size: String,
        /// New quantity
        quantity: u32,
    },

    /// Event: A reservation shrank to `quantity` (0 removes it)
    #[event]
    ReservationDecremented {
        /// Released product
        product: ProductCode,
        /// Released size
        size: String,
        /// New quantity
        quantity: u32,
    },

    /// Event: The cart was emptied
    #[event]
    CartCleared,

    /// Event: An increment was refused
    #[event]
    IncrementRejected {
        /// Why it was refused
        error: StorefrontError,
    },
}
