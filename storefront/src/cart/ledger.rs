//! Read-only availability seam between the cart and its readers.

use super::types::CartState;
use crate::catalog::{Catalog, Product, ProductCode};

/// Availability queries the carousel and the view layer are allowed to make.
///
/// Mutation goes through `CartAction::Increment`, never through this trait.
pub trait StockGate {
    /// Total stock minus reserved quantity, possibly negative
    fn remaining(&self, product: &ProductCode, size: &str) -> i64;

    /// First size in display order with stock left
    fn first_available_size<'p>(&self, product: &'p Product) -> Option<&'p str>;

    /// Whether one more unit can be reserved
    fn is_available(&self, product: &ProductCode, size: &str) -> bool {
        self.remaining(product, size) > 0
    }

    /// Remaining stock floored at zero, for display
    fn remaining_for_display(&self, product: &ProductCode, size: &str) -> u32 {
        u32::try_from(self.remaining(product, size).max(0)).unwrap_or(u32::MAX)
    }
}

/// The cart read against the catalog
#[derive(Clone, Copy, Debug)]
pub struct CartLedger<'a> {
    catalog: &'a Catalog,
    cart: &'a CartState,
}

impl<'a> CartLedger<'a> {
    /// Pairs a cart with the catalog it reserves from
    #[must_use]
    pub const fn new(catalog: &'a Catalog, cart: &'a CartState) -> Self {
        Self { catalog, cart }
    }
}

impl StockGate for CartLedger<'_> {
    fn remaining(&self, product: &ProductCode, size: &str) -> i64 {
        self.cart.remaining(self.catalog, product, size)
    }

    fn first_available_size<'p>(&self, product: &'p Product) -> Option<&'p str> {
        self.cart.first_available_size(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Reservation;

    #[test]
    fn test_shrunk_stock_reads_negative_but_displays_zero() {
        let catalog = Catalog::builtin();
        let code = ProductCode::new("FK-02");
        // More reserved than the catalog now holds
        let cart = CartState::from_reservations([Reservation {
            product_id: code.clone(),
            size: "S".to_string(),
            quantity: 3,
        }]);
        let ledger = CartLedger::new(&catalog, &cart);

        assert_eq!(ledger.remaining(&code, "S"), -2);
        assert_eq!(ledger.remaining_for_display(&code, "S"), 0);
        assert!(!ledger.is_available(&code, "S"));
    }

    #[test]
    fn test_unknown_pairs_have_no_stock() {
        let catalog = Catalog::builtin();
        let cart = CartState::new();
        let ledger = CartLedger::new(&catalog, &cart);

        assert_eq!(ledger.remaining(&ProductCode::new("FK-99"), "S"), 0);
        assert_eq!(ledger.remaining(&ProductCode::new("FK-01"), "XXL"), 0);
    }

    #[test]
    fn test_first_available_size_skips_sold_out() {
        let catalog = Catalog::builtin();
        let cart = CartState::from_reservations([Reservation {
            product_id: ProductCode::new("FK-02"),
            size: "S".to_string(),
            quantity: 1,
        }]);
        let ledger = CartLedger::new(&catalog, &cart);
        let Some(product) = catalog.get(&ProductCode::new("FK-02")) else {
            unreachable!("FK-02 is built in");
        };

        // S is fully reserved and M has no stock
        assert_eq!(ledger.first_available_size(product), Some("L"));
    }
}
