//! # Vitrine Testing
//!
//! Testing utilities and helpers for the Vitrine reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - The [`ReducerTest`] Given-When-Then harness
//! - Assertion helpers for reducer effects
//!
//! ## Example
//!
//! ```ignore
//! use vitrine_testing::mocks::InMemoryKeyValueStore;
//! use vitrine_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_add_to_cart() {
//!     let storage = InMemoryKeyValueStore::new();
//!     let store = bootstrap(&config, catalog, Arc::new(storage.clone()));
//!
//!     store.send(StorefrontAction::AddToCart).await?.wait().await;
//!
//!     assert_eq!(storage.write_count(), 1);
//! }
//! ```

/// Mock implementations of Environment traits
pub mod mocks {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use vitrine_core::environment::{KeyValueStore, StorageError};

    /// In-memory key-value store for deterministic tests
    ///
    /// Clones share the same map, so a test can keep one handle and give
    /// another to the code under test.
    ///
    /// # Example
    ///
    /// ```
    /// use vitrine_testing::mocks::InMemoryKeyValueStore;
    /// use vitrine_core::environment::KeyValueStore;
    ///
    /// let store = InMemoryKeyValueStore::new().with_entry("cart", "[]");
    /// assert_eq!(store.raw("cart").as_deref(), Some("[]"));
    /// assert_eq!(store.write_count(), 0);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryKeyValueStore {
        entries: Arc<Mutex<HashMap<String, String>>>,
        writes: Arc<AtomicUsize>,
    }

    impl InMemoryKeyValueStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed an entry without counting it as a write
        #[must_use]
        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self
        }

        /// Current raw value under `key`
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of successful `set` calls so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Store whose every operation fails, like storage disabled by the host
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingKeyValueStore;

    impl KeyValueStore for FailingKeyValueStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Output goes through the libtest capture. Safe to call from every
    /// test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}


// Re-export commonly used items
pub use mocks::{FailingKeyValueStore, InMemoryKeyValueStore};
pub use reducer_test::{assertions, ReducerTest};
