//! Render models derived from storefront state.
//!
//! Everything here is a pure function of [`StorefrontState`] and the
//! environment, recomputed on every render. Availability is read through
//! [`StockGate`] only.

use crate::app::{StorefrontEnvironment, StorefrontState};
use crate::cart::{CartLedger, StockGate};
use crate::carousel::{InteractionMode, ViewerSession};
use crate::catalog::{Product, ProductCode};
use serde::Serialize;

/// Hint on a control with nothing left to reserve
pub const SOLD_OUT_HINT: &str = "Agotado";
/// Hint on the add-to-cart button before a size is chosen
pub const CHOOSE_SIZE_HINT: &str = "Elegí talle";
/// Hint on a cart line's plus button once its size is exhausted
pub const NO_STOCK_HINT: &str = "Sin stock";
/// Cart lines show their remaining stock at or below this
pub const LOW_STOCK_LIMIT: u32 = 3;

/// One slide of the three-slide strip
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlideView {
    /// Image reference
    pub image: String,
    /// Image index the slide shows
    pub index: usize,
    /// Reduced for a clamped boundary slide
    pub opacity: f64,
}

/// Horizontal strip transform
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackTransform {
    /// Displacement in pixels added to the `-100%` resting position
    pub offset: f64,
    /// Whether a snap animation is running
    pub animated: bool,
}

impl TrackTransform {
    /// CSS transform value
    #[must_use]
    pub fn css(&self) -> String {
        format!("translateX(calc(-100% + {}px))", self.offset)
    }
}

/// Vertical sheet transform for swipe-to-dismiss
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SheetTransform {
    /// Downward displacement in pixels
    pub offset: f64,
    /// False while the sheet follows the pointer
    pub animated: bool,
}

impl SheetTransform {
    /// CSS transform value
    #[must_use]
    pub fn css(&self) -> String {
        format!("translateY({}px)", self.offset)
    }
}

/// Position marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DotView {
    /// Image index this dot jumps to
    pub index: usize,
    /// Whether this is the current image
    pub active: bool,
}

/// Size selector button
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SizeOptionView {
    /// Size label
    pub size: String,
    /// Enabled iff one more unit can be reserved
    pub enabled: bool,
    /// Whether this size is the session's selection
    pub selected: bool,
    /// Remaining stock floored at zero
    pub remaining: u32,
    /// Tooltip for a disabled option
    pub hint: Option<&'static str>,
}

/// Add-to-cart button
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddToCartView {
    /// Enabled iff a size is selected and it has stock left
    pub enabled: bool,
    /// Why the button is disabled
    pub hint: Option<&'static str>,
}

/// Everything the full-screen viewer renders
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewerView {
    /// Shopper-facing product code
    pub display_code: String,
    /// Header line with drop and price
    pub header: String,
    /// Previous, current and next slides
    pub slides: [SlideView; 3],
    /// Strip transform
    pub track: TrackTransform,
    /// Sheet transform
    pub sheet: SheetTransform,
    /// One marker per image
    pub dots: Vec<DotView>,
    /// Current image is the first
    pub at_first: bool,
    /// Current image is the last
    pub at_last: bool,
    /// Left tap zone is active
    pub can_step_previous: bool,
    /// Right tap zone is active
    pub can_step_next: bool,
    /// Size buttons in display order
    pub sizes: Vec<SizeOptionView>,
    /// Add-to-cart button
    pub add_to_cart: AddToCartView,
    /// Single-product checkout link, present once a size is selected
    pub checkout_link: Option<String>,
}

impl ViewerView {
    /// Derives the viewer, `None` when no viewer is open
    #[must_use]
    pub fn derive(state: &StorefrontState, env: &StorefrontEnvironment) -> Option<Self> {
        let session = state.carousel.session.as_ref()?;
        let product = env.catalog.get(&session.product)?;
        let ledger = CartLedger::new(&env.catalog, &state.cart);
        let boundary_opacity = env.carousel.config.boundary_opacity;

        let selected = session.selected_size.as_deref();
        let sizes = product
            .sizes
            .iter()
            .map(|s| size_option(&ledger, product, &s.size, selected))
            .collect();

        let add_to_cart = match selected {
            None => AddToCartView {
                enabled: false,
                hint: Some(CHOOSE_SIZE_HINT),
            },
            Some(size) if !ledger.is_available(&product.code, size) => AddToCartView {
                enabled: false,
                hint: Some(SOLD_OUT_HINT),
            },
            Some(_) => AddToCartView {
                enabled: true,
                hint: None,
            },
        };

        let display_code = product.display_code();
        let checkout_link = selected.map(|size| env.checkout.product_link(&display_code, size));

        Some(Self {
            header: product.header(),
            slides: slides(product, session, boundary_opacity),
            track: TrackTransform {
                offset: session.phase.horizontal_offset(),
                animated: session.is_animating(),
            },
            sheet: SheetTransform {
                offset: session.phase.vertical_offset(),
                animated: session.mode() != InteractionMode::LockedVertical,
            },
            dots: (0..session.image_count)
                .map(|index| DotView {
                    index,
                    active: index == session.index,
                })
                .collect(),
            at_first: session.at_first(),
            at_last: session.at_last(),
            can_step_previous: !session.at_first(),
            can_step_next: !session.at_last(),
            sizes,
            add_to_cart,
            checkout_link,
            display_code,
        })
    }
}

fn slides(product: &Product, session: &ViewerSession, boundary_opacity: f64) -> [SlideView; 3] {
    let slide = |index: usize, clamped: bool| SlideView {
        image: product.images.get(index).cloned().unwrap_or_default(),
        index,
        opacity: if clamped { boundary_opacity } else { 1.0 },
    };

    [
        slide(session.previous_index(), session.at_first()),
        slide(session.index, false),
        slide(session.next_index(), session.at_last()),
    ]
}

fn size_option(
    ledger: &CartLedger<'_>,
    product: &Product,
    size: &str,
    selected: Option<&str>,
) -> SizeOptionView {
    let enabled = ledger.is_available(&product.code, size);
    SizeOptionView {
        size: size.to_string(),
        enabled,
        selected: selected == Some(size),
        remaining: ledger.remaining_for_display(&product.code, size),
        hint: (!enabled).then_some(SOLD_OUT_HINT),
    }
}

/// One cart panel row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    /// Reserved product
    pub product: ProductCode,
    /// Display code, or the raw code for products missing from the catalog
    pub label: String,
    /// Reserved size
    pub size: String,
    /// Units reserved
    pub quantity: u32,
    /// `stock: N` once few units are left
    pub stock_hint: Option<String>,
    /// Whether one more unit can be reserved
    pub plus_enabled: bool,
    /// Tooltip for a disabled plus button
    pub plus_hint: Option<&'static str>,
}

/// Everything the cart panel renders
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartPanelView {
    /// Total units in the cart
    pub badge: u32,
    /// Rows in insertion order
    pub lines: Vec<CartLineView>,
    /// Clear button is active
    pub clear_enabled: bool,
    /// Cart checkout link, present when the cart is non-empty
    pub checkout_link: Option<String>,
}

impl CartPanelView {
    /// Derives the cart panel
    #[must_use]
    pub fn derive(state: &StorefrontState, env: &StorefrontEnvironment) -> Self {
        let ledger = CartLedger::new(&env.catalog, &state.cart);
        let reservations = state.cart.reservations();

        let lines = reservations
            .iter()
            .map(|r| {
                let known = env.catalog.get(&r.product_id);
                let remaining = ledger.remaining_for_display(&r.product_id, &r.size);
                let plus_enabled = ledger.is_available(&r.product_id, &r.size);

                CartLineView {
                    product: r.product_id.clone(),
                    label: known.map_or_else(|| r.product_id.to_string(), Product::display_code),
                    size: r.size.clone(),
                    quantity: r.quantity,
                    stock_hint: known
                        .filter(|_| remaining <= LOW_STOCK_LIMIT)
                        .map(|_| format!("stock: {remaining}")),
                    plus_enabled,
                    plus_hint: (!plus_enabled).then_some(NO_STOCK_HINT),
                }
            })
            .collect();

        Self {
            badge: state.cart.total_item_count(),
            lines,
            clear_enabled: !state.cart.is_empty(),
            checkout_link: (!state.cart.is_empty())
                .then(|| env.checkout.cart_link(&env.catalog, reservations)),
        }
    }
}
