//! Product catalog: immutable records supplied at startup.
//!
//! The core never mutates the catalog. It is shared behind an `Arc` by every
//! environment that needs stock totals or display data.

use crate::error::StorefrontError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Sort key used for products without one
pub const DEFAULT_SORT_KEY: i32 = 9999;

/// Internal product identifier, never displayed to shoppers
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Creates a product code
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the raw code
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl std::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Story faction a product belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// `CVL`
    Civil,
    /// `RST`
    Resistencia,
    /// `PFT`
    Profetas,
}

impl Faction {
    /// Prefix used in display codes
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Civil => "CVL",
            Self::Resistencia => "RST",
            Self::Profetas => "PFT",
        }
    }
}

/// Total stock for one size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStock {
    /// Size label, e.g. `"M"`
    pub size: String,
    /// Units in stock
    pub stock: u32,
}

impl SizeStock {
    /// Creates a size entry
    #[must_use]
    pub fn new(size: impl Into<String>, stock: u32) -> Self {
        Self {
            size: size.into(),
            stock,
        }
    }
}

/// An immutable catalog record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Internal identifier
    pub code: ProductCode,
    /// Faction, which picks the display prefix
    pub faction: Faction,
    /// Faction-scoped display number, e.g. `"01"`
    pub number: String,
    /// Organisational folder name
    pub slug: String,
    /// Drop label shown in the viewer header
    #[serde(default)]
    pub drop: Option<String>,
    /// Ordering key for the catalog grid
    #[serde(default)]
    pub sort: Option<i32>,
    /// Whether the product shows up in the catalog grid
    #[serde(default = "default_active")]
    pub active: bool,
    /// Price in Uruguayan pesos
    #[serde(default, rename = "priceUYU")]
    pub price_uyu: Option<u32>,
    /// Ordered image references, never empty
    pub images: Vec<String>,
    /// Sizes in display order with their total stock
    pub sizes: Vec<SizeStock>,
}

const fn default_active() -> bool {
    true
}

impl Product {
    /// Shopper-facing code, e.g. `CVL-01`
    #[must_use]
    pub fn display_code(&self) -> String {
        format!("{}-{}", self.faction.prefix(), self.number)
    }

    /// Total stock for `size`, 0 for sizes this product does not carry
    #[must_use]
    pub fn total_stock(&self, size: &str) -> u32 {
        self.sizes
            .iter()
            .find(|s| s.size == size)
            .map_or(0, |s| s.stock)
    }

    /// Whether `size` is one of this product's sizes
    #[must_use]
    pub fn carries_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.size == size)
    }

    /// Size labels in display order
    pub fn size_labels(&self) -> impl Iterator<Item = &str> {
        self.sizes.iter().map(|s| s.size.as_str())
    }

    /// Number of images
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Drop label, treating an empty label as absent
    #[must_use]
    pub fn drop_label(&self) -> Option<&str> {
        self.drop.as_deref().filter(|d| !d.is_empty())
    }

    /// Viewer header: display code, then drop and price when present
    #[must_use]
    pub fn header(&self) -> String {
        let mut header = self.display_code();
        if let Some(drop) = self.drop_label() {
            header.push_str(" — ");
            header.push_str(drop);
        }
        if let Some(price) = self.price_uyu.filter(|p| *p > 0) {
            header.push_str(&format!(" — UYU {price}"));
        }
        header
    }

    fn sort_key(&self) -> i32 {
        self.sort.unwrap_or(DEFAULT_SORT_KEY)
    }
}

/// The validated, read-only product list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, validating every product
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidCatalog`] when a product has no
    /// images, product codes repeat, or a product has an empty or repeated
    /// size label.
    pub fn new(products: Vec<Product>) -> Result<Self, StorefrontError> {
        let mut codes = HashSet::new();

        for product in &products {
            if !codes.insert(product.code.clone()) {
                return Err(StorefrontError::InvalidCatalog(format!(
                    "duplicate product code {}",
                    product.code
                )));
            }

            if product.images.is_empty() {
                return Err(StorefrontError::InvalidCatalog(format!(
                    "product {} has no images",
                    product.code
                )));
            }

            let mut sizes = HashSet::new();
            for label in product.size_labels() {
                if label.trim().is_empty() {
                    return Err(StorefrontError::InvalidCatalog(format!(
                        "product {} has an empty size label",
                        product.code
                    )));
                }
                if !sizes.insert(label) {
                    return Err(StorefrontError::InvalidCatalog(format!(
                        "product {} repeats size {label}",
                        product.code
                    )));
                }
            }
        }

        Ok(Self { products })
    }

    /// Parses a JSON array of products
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidCatalog`] when the JSON is malformed
    /// or fails validation.
    pub fn from_json(json: &str) -> Result<Self, StorefrontError> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| StorefrontError::InvalidCatalog(e.to_string()))?;
        Self::new(products)
    }

    /// Reads and parses a JSON catalog file
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidCatalog`] when the file cannot be
    /// read, is malformed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, StorefrontError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| StorefrontError::InvalidCatalog(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// The launch drop
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            products: vec![
                Product {
                    code: ProductCode::new("FK-01"),
                    faction: Faction::Civil,
                    number: "01".to_string(),
                    slug: "cvl-01".to_string(),
                    drop: None,
                    sort: Some(10),
                    active: true,
                    price_uyu: Some(1690),
                    images: vec![
                        "/products/civil/cvl-01/1.jpg".to_string(),
                        "/products/civil/cvl-01/2.jpg".to_string(),
                        "/products/civil/cvl-01/3.jpg".to_string(),
                    ],
                    sizes: vec![
                        SizeStock::new("S", 2),
                        SizeStock::new("M", 3),
                        SizeStock::new("L", 2),
                        SizeStock::new("XL", 1),
                    ],
                },
                Product {
                    code: ProductCode::new("FK-02"),
                    faction: Faction::Resistencia,
                    number: "01".to_string(),
                    slug: "rst-01".to_string(),
                    drop: Some("DROP-01".to_string()),
                    sort: Some(20),
                    active: false,
                    price_uyu: Some(1790),
                    images: vec![
                        "/products/resistencia/rst-01/1.jpg".to_string(),
                        "/products/resistencia/rst-01/2.jpg".to_string(),
                    ],
                    sizes: vec![
                        SizeStock::new("S", 1),
                        SizeStock::new("M", 0),
                        SizeStock::new("L", 2),
                        SizeStock::new("XL", 1),
                    ],
                },
            ],
        }
    }

    /// Looks a product up by code
    #[must_use]
    pub fn get(&self, code: &ProductCode) -> Option<&Product> {
        self.products.iter().find(|p| &p.code == code)
    }

    /// All products in catalog order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Active products ordered by sort key, ties keeping catalog order
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        let mut visible: Vec<&Product> = self.products.iter().filter(|p| p.active).collect();
        visible.sort_by_key(|p| p.sort_key());
        visible
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
