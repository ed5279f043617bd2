//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::carousel::constants::{animation, gesture, render};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Storage key the cart has always been saved under
pub const DEFAULT_CART_KEY: &str = "feiqui_cart";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Cart persistence configuration
    pub storage: StorageConfig,
    /// Catalog JSON file; the built-in launch drop when unset
    pub catalog_path: Option<PathBuf>,
    /// Outbound checkout link configuration
    pub checkout: CheckoutConfig,
    /// Gesture thresholds
    pub carousel: CarouselConfig,
}

/// Cart persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per key
    pub dir: PathBuf,
    /// Key the cart is stored under
    pub cart_key: String,
}

/// Checkout deep-link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Messaging deep-link base
    pub base_url: String,
    /// Destination phone number, digits only
    pub phone: String,
}

/// Gesture carousel thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Displacement that locks an axis
    pub deadzone: f64,
    /// Damping past the first or last image
    pub rubber_band_factor: f64,
    /// Downward drag that dismisses on release
    pub dismiss_threshold: f64,
    /// Smallest horizontal swipe
    pub min_swipe_threshold: f64,
    /// Swipe threshold as a share of viewport width
    pub swipe_ratio: f64,
    /// Pause between a decided swipe and the index commit
    pub settle_delay: Duration,
    /// Opacity of clamped boundary slides
    pub boundary_opacity: f64,
    /// Width assumed before the viewport is measured
    pub fallback_viewport_width: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            deadzone: gesture::DEADZONE,
            rubber_band_factor: gesture::RUBBER_BAND_FACTOR,
            dismiss_threshold: gesture::DISMISS_THRESHOLD,
            min_swipe_threshold: gesture::MIN_SWIPE_THRESHOLD,
            swipe_ratio: gesture::SWIPE_RATIO,
            settle_delay: animation::SETTLE_DELAY,
            boundary_opacity: render::BOUNDARY_SLIDE_OPACITY,
            fallback_viewport_width: render::FALLBACK_VIEWPORT_WIDTH,
        }
    }
}

impl CarouselConfig {
    /// Swipe threshold for a viewport of `width`
    #[must_use]
    pub fn swipe_threshold(&self, width: f64) -> f64 {
        crate::carousel::gesture::swipe_threshold(width, self.min_swipe_threshold, self.swipe_ratio)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wa.me".to_string(),
            phone: "59899079595".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let carousel_defaults = CarouselConfig::default();
        let checkout_defaults = CheckoutConfig::default();

        // Parses a positive finite float, falling back on anything else
        let positive = |key: &str, default: f64| {
            lookup(key)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(default)
        };

        Self {
            log_level: lookup("STOREFRONT_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            storage: StorageConfig {
                dir: lookup("STOREFRONT_STORAGE_DIR")
                    .map_or_else(|| PathBuf::from(".storefront"), PathBuf::from),
                cart_key: lookup("STOREFRONT_CART_KEY")
                    .filter(|k| !k.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CART_KEY.to_string()),
            },
            catalog_path: lookup("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            checkout: CheckoutConfig {
                base_url: lookup("STOREFRONT_CHECKOUT_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(checkout_defaults.base_url),
                phone: lookup("STOREFRONT_CHECKOUT_PHONE").unwrap_or(checkout_defaults.phone),
            },
            carousel: CarouselConfig {
                deadzone: positive("STOREFRONT_CAROUSEL_DEADZONE", carousel_defaults.deadzone),
                rubber_band_factor: positive(
                    "STOREFRONT_CAROUSEL_RUBBER_BAND",
                    carousel_defaults.rubber_band_factor,
                ),
                dismiss_threshold: positive(
                    "STOREFRONT_CAROUSEL_DISMISS_THRESHOLD",
                    carousel_defaults.dismiss_threshold,
                ),
                min_swipe_threshold: positive(
                    "STOREFRONT_CAROUSEL_MIN_SWIPE",
                    carousel_defaults.min_swipe_threshold,
                ),
                swipe_ratio: positive(
                    "STOREFRONT_CAROUSEL_SWIPE_RATIO",
                    carousel_defaults.swipe_ratio,
                ),
                settle_delay: lookup("STOREFRONT_CAROUSEL_SETTLE_MS")
                    .and_then(|s| s.parse().ok())
                    .map_or(carousel_defaults.settle_delay, Duration::from_millis),
                boundary_opacity: positive(
                    "STOREFRONT_CAROUSEL_BOUNDARY_OPACITY",
                    carousel_defaults.boundary_opacity,
                ),
                fallback_viewport_width: positive(
                    "STOREFRONT_CAROUSEL_FALLBACK_WIDTH",
                    carousel_defaults.fallback_viewport_width,
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.storage.cart_key, "feiqui_cart");
        assert_eq!(config.checkout.phone, "59899079595");
        assert_eq!(config.checkout.base_url, "https://wa.me");
        assert!(config.catalog_path.is_none());
        assert_eq!(config.carousel.settle_delay, Duration::from_millis(180));
        assert!((config.carousel.deadzone - 10.0).abs() < f64::EPSILON);
        assert!((config.carousel.fallback_viewport_width - 390.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("STOREFRONT_CART_KEY", "test_cart"),
            ("STOREFRONT_CHECKOUT_BASE_URL", "https://example.test/"),
            ("STOREFRONT_CAROUSEL_SETTLE_MS", "5"),
            ("STOREFRONT_CAROUSEL_DISMISS_THRESHOLD", "80"),
            ("STOREFRONT_CATALOG_PATH", "/srv/catalog.json"),
        ]));

        assert_eq!(config.storage.cart_key, "test_cart");
        assert_eq!(config.checkout.base_url, "https://example.test");
        assert_eq!(config.carousel.settle_delay, Duration::from_millis(5));
        assert!((config.carousel.dismiss_threshold - 80.0).abs() < f64::EPSILON);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("STOREFRONT_CART_KEY", "  "),
            ("STOREFRONT_CAROUSEL_DEADZONE", "-3"),
            ("STOREFRONT_CAROUSEL_SWIPE_RATIO", "wide"),
        ]));

        assert_eq!(config.storage.cart_key, "feiqui_cart");
        assert!((config.carousel.deadzone - 10.0).abs() < f64::EPSILON);
        assert!((config.carousel.swipe_ratio - 0.18).abs() < f64::EPSILON);
    }
}
