//! Reducer logic for the stock-aware cart.
//!
//! Commands are validated against the catalog, turned into events, and the
//! events are applied. Every applied mutation bumps the cart revision and
//! returns a persistence effect carrying a snapshot of that revision.

use super::types::{CartAction, CartState};
use crate::catalog::{Catalog, ProductCode};
use crate::error::StorefrontError;
use crate::storage::CartRepository;
use std::sync::Arc;
use vitrine_core::action::Action as _;
use vitrine_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Environment dependencies for the cart reducer
#[derive(Clone, Debug)]
pub struct CartEnvironment {
    /// Product stock totals
    pub catalog: Arc<Catalog>,
    /// Where mutations are persisted
    pub repository: Arc<CartRepository>,
}

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>, repository: Arc<CartRepository>) -> Self {
        Self {
            catalog,
            repository,
        }
    }
}

/// Reducer for the cart
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `Increment` command and returns the new quantity
    fn validate_increment(
        state: &CartState,
        catalog: &Catalog,
        product: &ProductCode,
        size: &str,
    ) -> Result<u32, StorefrontError> {
        let unavailable = || StorefrontError::Unavailable {
            product: product.to_string(),
            size: size.to_string(),
        };

        if size.trim().is_empty() {
            return Err(unavailable());
        }

        if catalog.get(product).is_none() {
            return Err(StorefrontError::UnknownProduct(product.to_string()));
        }

        if state.remaining(catalog, product, size) <= 0 {
            return Err(unavailable());
        }

        Ok(state.quantity_of(product, size) + 1)
    }

    /// Applies an event to state, returning whether the reservations changed
    fn apply_event(state: &mut CartState, action: &CartAction) -> bool {
        match action {
            CartAction::ReservationIncremented {
                product,
                size,
                quantity,
            }
            | CartAction::ReservationDecremented {
                product,
                size,
                quantity,
            } => {
                state.set_quantity(product, size, *quantity);
                state.last_error = None;
                true
            },
            CartAction::CartCleared => {
                state.clear_reservations();
                state.last_error = None;
                true
            },
            CartAction::IncrementRejected { error } => {
                state.last_error = Some(error.clone());
                false
            },
            // Commands are not applied to state
            CartAction::Increment { .. } | CartAction::Decrement { .. } | CartAction::Clear => false,
        }
    }

    /// Applies `event`; mutations bump the revision and persist
    fn commit(
        state: &mut CartState,
        event: &CartAction,
        env: &CartEnvironment,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        if !Self::apply_event(state, event) {
            return SmallVec::new();
        }

        let revision = state.bump_revision();
        tracing::debug!(
            event = event.name(),
            %revision,
            items = state.total_item_count(),
            "Cart updated"
        );

        smallvec![Self::persist(state, env)]
    }

    /// Effect that writes the current snapshot off the async workers
    fn persist(state: &CartState, env: &CartEnvironment) -> Effect<CartAction> {
        let snapshot = state.snapshot();
        let repository = Arc::clone(&env.repository);

        async_effect! {
            let revision = snapshot.revision;
            if let Err(error) =
                tokio::task::spawn_blocking(move || repository.save(&snapshot)).await
            {
                tracing::error!(%revision, %error, "Cart persistence task failed");
            }
            None::<CartAction>
        }
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CartAction::Increment { product, size } => {
                // Check and mutation happen in this one call, under the store's write lock
                match Self::validate_increment(state, &env.catalog, &product, &size) {
                    Ok(quantity) => {
                        let event = CartAction::ReservationIncremented {
                            product,
                            size,
                            quantity,
                        };
                        Self::commit(state, &event, env)
                    },
                    Err(error) => {
                        tracing::debug!(%error, "Increment rejected");
                        Self::commit(state, &CartAction::IncrementRejected { error }, env)
                    },
                }
            },

            CartAction::Decrement { product, size } => {
                let current = state.quantity_of(&product, &size);
                if current == 0 {
                    tracing::trace!(%product, size = %size, "Decrement without reservation ignored");
                    return SmallVec::new();
                }

                let event = CartAction::ReservationDecremented {
                    product,
                    size,
                    quantity: current - 1,
                };
                Self::commit(state, &event, env)
            },

            CartAction::Clear => {
                if state.is_empty() {
                    return SmallVec::new();
                }
                Self::commit(state, &CartAction::CartCleared, env)
            },

            // ========== Events ==========
            // Only commands produce events; a sent event would bypass the stock check
            CartAction::ReservationIncremented { .. }
            | CartAction::ReservationDecremented { .. }
            | CartAction::CartCleared
            | CartAction::IncrementRejected { .. } => {
                tracing::warn!(event = action.name(), "Ignoring cart event sent as input");
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Faction, Product, SizeStock};
    use crate::cart::Reservation;
    use vitrine_testing::{assertions, InMemoryKeyValueStore, ReducerTest};

    fn test_catalog() -> Arc<Catalog> {
        let product = Product {
            code: ProductCode::new("P"),
            faction: Faction::Civil,
            number: "07".to_string(),
            slug: "cvl-07".to_string(),
            drop: None,
            sort: None,
            active: true,
            price_uyu: None,
            images: vec!["/p/1.jpg".to_string()],
            sizes: vec![SizeStock::new("S", 2), SizeStock::new("M", 0)],
        };
        let Ok(catalog) = Catalog::new(vec![product]) else {
            unreachable!("test catalog is valid");
        };
        Arc::new(catalog)
    }

    fn create_test_env() -> CartEnvironment {
        let repository = CartRepository::new(Arc::new(InMemoryKeyValueStore::new()), "feiqui_cart");
        CartEnvironment::new(test_catalog(), Arc::new(repository))
    }

    fn increment(size: &str) -> CartAction {
        CartAction::Increment {
            product: ProductCode::new("P"),
            size: size.to_string(),
        }
    }

    fn p() -> ProductCode {
        ProductCode::new("P")
    }

    #[test]
    fn test_increment_creates_reservation_and_persists() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_action(increment("S"))
            .then_state(|state| {
                assert_eq!(state.quantity_of(&p(), "S"), 1);
                assert_eq!(state.revision().value(), 1);
                assert!(state.last_error.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_sold_out_size_is_unavailable() {
        // Scenario: M has no stock
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_action(increment("M"))
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.revision().value(), 0);
                assert!(matches!(
                    state.last_error,
                    Some(StorefrontError::Unavailable { .. })
                ));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_increment_stops_at_stock() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_actions([increment("S"), increment("S"), increment("S")])
            .then_state(|state| {
                assert_eq!(state.quantity_of(&p(), "S"), 2);
                assert_eq!(state.remaining(&test_catalog(), &p(), "S"), 0);
                assert_eq!(state.reservations().len(), 1);
                assert!(matches!(
                    state.last_error,
                    Some(StorefrontError::Unavailable { .. })
                ));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_increment_requires_size() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_action(increment(" "))
            .then_state(|state| {
                assert!(state.is_empty());
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn test_increment_unknown_product() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_action(CartAction::Increment {
                product: ProductCode::new("NOPE"),
                size: "S".to_string(),
            })
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(
                    state.last_error,
                    Some(StorefrontError::UnknownProduct("NOPE".to_string()))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::from_reservations([Reservation {
                product_id: p(),
                size: "S".to_string(),
                quantity: 1,
            }]))
            .when_action(CartAction::Decrement {
                product: p(),
                size: "S".to_string(),
            })
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.quantity_of(&p(), "S"), 0);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_decrement_without_reservation_is_noop() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_action(CartAction::Decrement {
                product: p(),
                size: "S".to_string(),
            })
            .then_state(|state| {
                assert_eq!(*state, CartState::new());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_clear_empty_cart_is_noop() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_action(CartAction::Clear)
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.revision().value(), 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_clear_removes_everything() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_actions([increment("S"), CartAction::Clear])
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.total_item_count(), 0);
                assert_eq!(state.revision().value(), 2);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_sent_events_do_not_mutate() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_actions([
                CartAction::ReservationIncremented {
                    product: p(),
                    size: "M".to_string(),
                    quantity: 99,
                },
                CartAction::IncrementRejected {
                    error: StorefrontError::UnknownProduct("P".to_string()),
                },
            ])
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.quantity_of(&p(), "M"), 0);
                assert_eq!(state.revision().value(), 0);
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_sent_clear_event_keeps_reservations() {
        ReducerTest::new(CartReducer::new())
            .with_env(create_test_env())
            .given_state(CartState::new())
            .when_actions([increment("S"), CartAction::CartCleared])
            .then_state(|state| {
                assert_eq!(state.quantity_of(&p(), "S"), 1);
                assert_eq!(state.revision().value(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn test_persist_effect_writes_snapshot() {
        let storage = InMemoryKeyValueStore::new();
        let repository = CartRepository::new(Arc::new(storage.clone()), "feiqui_cart");
        let env = CartEnvironment::new(test_catalog(), Arc::new(repository));
        let mut state = CartState::new();

        let effects = CartReducer::new().reduce(&mut state, increment("S"), &env);
        assert_eq!(effects.len(), 1);
        for effect in effects {
            let Effect::Future(write) = effect else {
                unreachable!("persistence runs as a future effect");
            };
            assert!(write.await.is_none());
        }

        assert_eq!(
            storage.raw("feiqui_cart").as_deref(),
            Some(r#"[{"productId":"P","size":"S","quantity":1}]"#)
        );
    }

    #[test]
    fn test_first_available_size_follows_display_order() {
        let catalog = test_catalog();
        let Some(product) = catalog.get(&p()) else {
            unreachable!("P is in the test catalog");
        };

        let mut state = CartState::new();
        assert_eq!(state.first_available_size(product), Some("S"));

        let env = create_test_env();
        let _ = CartReducer.reduce(&mut state, increment("S"), &env);
        let _ = CartReducer.reduce(&mut state, increment("S"), &env);
        assert_eq!(state.first_available_size(product), None);
    }
}
