//! Storefront composition.
//!
//! One store holds both features. The parent reducer owns the decisions
//! that need both of them (preselecting a size, gating size selection on
//! stock, adding the viewer's selection to the cart) and delegates the rest,
//! lifting child effects with [`Effect::map`].

use crate::cart::{CartAction, CartEnvironment, CartLedger, CartReducer, CartState, StockGate};
use crate::carousel::{CarouselAction, CarouselEnvironment, CarouselReducer, CarouselState};
use crate::catalog::{Catalog, ProductCode};
use crate::checkout::CheckoutLink;
use crate::config::Config;
use crate::error::StorefrontError;
use crate::storage::CartRepository;
use std::sync::Arc;
use vitrine_core::environment::KeyValueStore;
use vitrine_core::{effect::Effect, reducer::Reducer, SmallVec};
use vitrine_macros::Action;
use vitrine_runtime::Store;

/// Combined state of the storefront
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorefrontState {
    /// Reservations
    pub cart: CartState,
    /// Image viewer
    pub carousel: CarouselState,
    /// Last failure of a storefront-level command (if any)
    pub last_error: Option<StorefrontError>,
}

impl StorefrontState {
    /// Creates state around a restored cart
    #[must_use]
    pub fn with_cart(cart: CartState) -> Self {
        Self {
            cart,
            ..Self::default()
        }
    }
}

/// Actions for the storefront
#[derive(Action, Clone, Debug, PartialEq)]
pub enum StorefrontAction {
    /// Command: Open the viewer on a product with a size preselected
    #[command]
    OpenProduct {
        /// Product to open
        product: ProductCode,
    },

    /// Command: Select a size in the viewer
    #[command]
    SelectSize {
        /// Size label
        size: String,
    },

    /// Command: Reserve one unit of the viewer's product in the selected size
    #[command]
    AddToCart,

    /// Carousel action
    Carousel(CarouselAction),

    /// Cart action
    Cart(CartAction),
}

/// Environment for the storefront
#[derive(Clone, Debug)]
pub struct StorefrontEnvironment {
    /// The catalog
    pub catalog: Arc<Catalog>,
    /// Cart dependencies
    pub cart: CartEnvironment,
    /// Carousel dependencies
    pub carousel: CarouselEnvironment,
    /// Checkout link builder
    pub checkout: CheckoutLink,
}

impl StorefrontEnvironment {
    /// Wires every child environment to one catalog
    #[must_use]
    pub fn new(config: &Config, catalog: Arc<Catalog>, repository: Arc<CartRepository>) -> Self {
        Self {
            cart: CartEnvironment::new(Arc::clone(&catalog), repository),
            carousel: CarouselEnvironment::new(config.carousel.clone()),
            checkout: CheckoutLink::from_config(&config.checkout),
            catalog,
        }
    }
}

/// Reducer for the storefront
#[derive(Clone, Debug, Default)]
pub struct StorefrontReducer {
    cart: CartReducer,
    carousel: CarouselReducer,
}

/// The storefront store
pub type StorefrontStore =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

impl StorefrontReducer {
    /// Creates a new `StorefrontReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cart: CartReducer::new(),
            carousel: CarouselReducer::new(),
        }
    }

    fn delegate_cart(
        &self,
        state: &mut StorefrontState,
        action: CartAction,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        self.cart
            .reduce(&mut state.cart, action, &env.cart)
            .into_iter()
            .map(|effect| effect.map(StorefrontAction::Cart))
            .collect()
    }

    fn delegate_carousel(
        &self,
        state: &mut StorefrontState,
        action: CarouselAction,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        self.carousel
            .reduce(&mut state.carousel, action, &env.carousel)
            .into_iter()
            .map(|effect| effect.map(StorefrontAction::Carousel))
            .collect()
    }

    /// Opens the viewer with the first size that has stock preselected
    fn open_product(
        &self,
        state: &mut StorefrontState,
        product: ProductCode,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        let Some(record) = env.catalog.get(&product) else {
            tracing::warn!(%product, "Open requested for unknown product");
            state.last_error = Some(StorefrontError::UnknownProduct(product.to_string()));
            return SmallVec::new();
        };

        let ledger = CartLedger::new(&env.catalog, &state.cart);
        let size = ledger.first_available_size(record).map(str::to_string);
        let open = CarouselAction::Open {
            product,
            image_count: record.image_count(),
            size,
        };

        state.last_error = None;
        self.delegate_carousel(state, open, env)
    }

    fn select_size(
        &self,
        state: &mut StorefrontState,
        size: String,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        if let Err(error) = Self::validate_select_size(state, &env.catalog, &size) {
            tracing::debug!(%error, "Size selection ignored");
            state.last_error = Some(error);
            return SmallVec::new();
        }

        state.last_error = None;
        self.delegate_carousel(state, CarouselAction::SelectSize { size }, env)
    }

    /// Validates a `SelectSize` command against the open product's stock
    fn validate_select_size(
        state: &StorefrontState,
        catalog: &Catalog,
        size: &str,
    ) -> Result<(), StorefrontError> {
        let Some(session) = state.carousel.session.as_ref() else {
            return Err(StorefrontError::Unavailable {
                product: String::new(),
                size: size.to_string(),
            });
        };

        let Some(product) = catalog.get(&session.product) else {
            return Err(StorefrontError::UnknownProduct(session.product.to_string()));
        };

        let ledger = CartLedger::new(catalog, &state.cart);
        if !product.carries_size(size) || !ledger.is_available(&product.code, size) {
            return Err(StorefrontError::Unavailable {
                product: product.code.to_string(),
                size: size.to_string(),
            });
        }

        Ok(())
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            StorefrontAction::OpenProduct { product } => self.open_product(state, product, env),

            StorefrontAction::SelectSize { size } => self.select_size(state, size, env),

            StorefrontAction::AddToCart => {
                let Some(session) = state.carousel.session.as_ref() else {
                    tracing::debug!("Add to cart without an open viewer ignored");
                    return SmallVec::new();
                };

                let increment = CartAction::Increment {
                    product: session.product.clone(),
                    size: session.selected_size.clone().unwrap_or_default(),
                };
                self.delegate_cart(state, increment, env)
            },

            // Opening and size selection need the cart, so they take the checked paths
            StorefrontAction::Carousel(CarouselAction::Open { product, .. }) => {
                self.open_product(state, product, env)
            },
            StorefrontAction::Carousel(CarouselAction::SelectSize { size }) => {
                self.select_size(state, size, env)
            },
            StorefrontAction::Carousel(action) => self.delegate_carousel(state, action, env),

            StorefrontAction::Cart(action) => self.delegate_cart(state, action, env),
        }
    }
}

/// Restores the persisted cart and returns a ready store
#[must_use]
pub fn bootstrap(
    config: &Config,
    catalog: Catalog,
    storage: Arc<dyn KeyValueStore>,
) -> StorefrontStore {
    let repository = Arc::new(CartRepository::new(storage, config.storage.cart_key.clone()));
    let cart = repository.load();
    let catalog = Arc::new(catalog);

    tracing::info!(
        products = catalog.len(),
        visible = catalog.visible().len(),
        cart_items = cart.total_item_count(),
        "Storefront ready"
    );

    let environment = StorefrontEnvironment::new(config, catalog, repository);
    Store::new(
        StorefrontState::with_cart(cart),
        StorefrontReducer::new(),
        environment,
    )
}
