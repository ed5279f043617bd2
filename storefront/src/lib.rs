//! # Storefront
//!
//! Core of a stock-gated product viewer: a full-screen gesture carousel and a
//! cart that never reserves more units of a size than the catalog holds.
//!
//! Both features are reducers composed under one [`StorefrontReducer`] and
//! run by a single Vitrine [`Store`](vitrine_runtime::Store). Every state
//! change goes through the store's write lock, so the stock check and the
//! reservation that follows it can never interleave with another increment.
//!
//! ## Modules
//!
//! - [`catalog`]: immutable product records and their validation
//! - [`cart`]: reservations, availability, and the cart reducer
//! - [`carousel`]: the gesture machine and settle scheduling
//! - [`app`]: composition and [`bootstrap`]
//! - [`view`]: render models derived from state
//! - [`checkout`]: purchase messages and messaging deep links
//! - [`storage`]: cart persistence over a key-value store
//! - [`config`]: environment configuration
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::{bootstrap, Catalog, Config, FileKeyValueStore, StorefrontAction};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let storage = Arc::new(FileKeyValueStore::new(config.storage.dir.clone()));
//! let store = bootstrap(&config, Catalog::builtin(), storage);
//!
//! store
//!     .send(StorefrontAction::OpenProduct { product: "FK-01".into() })
//!     .await?;
//! store.send(StorefrontAction::AddToCart).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;
pub mod view;

pub use app::{
    bootstrap, StorefrontAction, StorefrontEnvironment, StorefrontReducer, StorefrontState,
    StorefrontStore,
};
pub use catalog::{Catalog, Faction, Product, ProductCode, SizeStock};
pub use checkout::CheckoutLink;
pub use config::Config;
pub use error::StorefrontError;
pub use storage::{CartRepository, FileKeyValueStore};
pub use view::{CartPanelView, ViewerView};
