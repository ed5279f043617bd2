//! Outbound checkout link.
//!
//! The core builds the message and the deep link; opening it is the view
//! layer's job.

use crate::cart::Reservation;
use crate::catalog::Catalog;
use crate::config::CheckoutConfig;

/// Builds messaging deep links for a fixed destination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutLink {
    base_url: String,
    phone: String,
}

impl CheckoutLink {
    /// Creates a link builder for `phone` under `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>, phone: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            phone: phone.into(),
        }
    }

    /// Creates a link builder from configuration
    #[must_use]
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self::new(config.base_url.clone(), config.phone.clone())
    }

    /// Deep link carrying `message` as percent-encoded text
    #[must_use]
    pub fn link(&self, message: &str) -> String {
        format!(
            "{}/{}?text={}",
            self.base_url,
            self.phone,
            urlencoding::encode(message)
        )
    }

    /// Deep link for the whole cart
    #[must_use]
    pub fn cart_link(&self, catalog: &Catalog, reservations: &[Reservation]) -> String {
        self.link(&cart_message(catalog, reservations))
    }

    /// Deep link for one product in one size
    #[must_use]
    pub fn product_link(&self, display_code: &str, size: &str) -> String {
        self.link(&product_message(display_code, size))
    }
}

impl Default for CheckoutLink {
    fn default() -> Self {
        Self::from_config(&CheckoutConfig::default())
    }
}

/// Purchase message listing every reservation.
///
/// Products missing from the catalog are listed by their raw code.
#[must_use]
pub fn cart_message(catalog: &Catalog, reservations: &[Reservation]) -> String {
    let lines: Vec<String> = reservations
        .iter()
        .map(|r| {
            let name = catalog
                .get(&r.product_id)
                .map_or_else(|| r.product_id.to_string(), |p| p.display_code());
            format!("- {name} / {} x{}", r.size, r.quantity)
        })
        .collect();

    format!("Hola, quiero iniciar la compra:\n{}", lines.join("\n"))
}

/// Purchase message for one product in one size
#[must_use]
pub fn product_message(display_code: &str, size: &str) -> String {
    format!("Hola, quiero iniciar la compra de {display_code} talle {size}.")
}
