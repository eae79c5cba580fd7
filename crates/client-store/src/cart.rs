//! The shopping cart store.
//!
//! Lines are keyed by product and variant selection; adding the same variant
//! twice merges quantities instead of duplicating the line. Mutations that
//! grow or change a purchase are auth-gated, removals are not. Every
//! successful mutation is written through to storage immediately, partitioned
//! by the auth flag at write time, so a guest browser never accumulates a
//! persisted cart.

use std::num::NonZeroU32;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stylesphere_core::{CurrencyCode, LineKey, Price, ProductId, ProductRecord, VariantKey};

use crate::auth::{self, AuthFlag, LocationProvider};
use crate::storage::{self, StorageBackend, keys};

/// A single cart line: one product variant and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// The product this line purchases.
    pub product_id: ProductId,
    /// Display name copied from the catalog at add time.
    pub name: String,
    /// Unit price at add time.
    pub unit_price: Price,
    /// Primary image, if the catalog had one.
    pub image: Option<String>,
    /// The selected variant, stored flat as `size` and `color`.
    #[serde(flatten)]
    pub variant: VariantKey,
    /// Units purchased. Never below 1 in a stored line.
    pub quantity: u32,
}

impl CartLineItem {
    /// The identity of this line.
    #[must_use]
    pub fn line_key(&self) -> LineKey {
        LineKey::new(self.product_id, self.variant.clone())
    }

    /// Price of the whole line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Persisted snapshot of the cart store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CartSnapshot {
    cart: Vec<CartLineItem>,
}

/// Checkout estimate parameters.
///
/// Defaults model the storefront's flat-rate shipping and single tax
/// jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsPolicy {
    /// Flat shipping charge applied to any non-empty cart.
    pub flat_shipping: Price,
    /// Sales tax rate applied to the subtotal (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for TotalsPolicy {
    fn default() -> Self {
        Self {
            flat_shipping: Price::from_cents(599, CurrencyCode::USD),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// A checkout estimate over the current cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of all line totals.
    pub subtotal: Price,
    /// Shipping charge (zero for an empty cart).
    pub shipping: Price,
    /// Sales tax on the subtotal.
    pub tax: Price,
    /// Grand total.
    pub total: Price,
}

/// The shopping cart.
///
/// Derived reads ([`item_count`](Self::item_count), [`subtotal`](Self::subtotal),
/// [`totals`](Self::totals)) are recomputed from the lines on every call and
/// never consult the auth flag, so a logged-out session still renders
/// whatever state is in memory.
pub struct CartStore {
    backend: Arc<dyn StorageBackend>,
    auth: Arc<dyn AuthFlag>,
    location: Arc<dyn LocationProvider>,
    lines: Vec<CartLineItem>,
    hydrated: bool,
}

impl CartStore {
    /// Create an empty cart wired to its collaborators.
    ///
    /// Call [`hydrate`](Self::hydrate) before first render to restore
    /// persisted state.
    #[must_use]
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        auth: Arc<dyn AuthFlag>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            backend,
            auth,
            location,
            lines: Vec::new(),
            hydrated: false,
        }
    }

    /// Load the persisted cart.
    ///
    /// Tolerant of anything: a missing, corrupt, or incompatible snapshot
    /// yields an empty cart. The hydrated flag is set either way, so callers
    /// can defer persistence-dependent rendering until this has run.
    pub fn hydrate(&mut self) {
        self.lines = match storage::load_envelope::<CartSnapshot>(
            self.backend.as_ref(),
            keys::CART_STORAGE,
        ) {
            Ok(Some(snapshot)) => snapshot.cart,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Discarding persisted cart: {e}");
                Vec::new()
            }
        };
        tracing::debug!(lines = self.lines.len(), "Cart hydrated");
        self.hydrated = true;
    }

    /// Whether [`hydrate`](Self::hydrate) has run.
    #[must_use]
    pub const fn has_hydrated(&self) -> bool {
        self.hydrated
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a product variant.
    ///
    /// Unauthenticated callers get `false` back, the cart is left untouched,
    /// and the current location is recorded as the post-login redirect
    /// target. Adding an already-carted variant merges into the existing
    /// line.
    pub fn add(
        &mut self,
        product: &ProductRecord,
        variant: VariantKey,
        quantity: NonZeroU32,
    ) -> bool {
        if !self.auth.is_authenticated() {
            tracing::debug!(product = %product.id, "Cart add refused: not authenticated");
            auth::record_login_redirect(self.backend.as_ref(), self.location.as_ref());
            return false;
        }

        let key = LineKey::new(product.id, variant);
        if let Some(line) = self.find_line_mut(&key) {
            line.quantity = line.quantity.saturating_add(quantity.get());
        } else {
            self.lines.push(CartLineItem {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                image: product.image.clone(),
                variant: key.variant,
                quantity: quantity.get(),
            });
        }

        self.persist();
        true
    }

    /// Remove a line entirely.
    ///
    /// Not auth-gated, and a no-op when no line matches.
    pub fn remove(&mut self, key: &LineKey) {
        let before = self.lines.len();
        self.lines
            .retain(|line| !(line.product_id == key.product && line.variant == key.variant));

        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Set the quantity on an existing line.
    ///
    /// A quantity of zero removes the line. Returns `false`, touching
    /// nothing, when the caller is unauthenticated or no line matches; an
    /// unauthenticated call records no redirect target.
    pub fn update_quantity(&mut self, key: &LineKey, new_quantity: u32) -> bool {
        if !self.auth.is_authenticated() {
            tracing::debug!(product = %key.product, "Cart update refused: not authenticated");
            return false;
        }

        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.product_id == key.product && line.variant == key.variant)
        else {
            return false;
        };

        if new_quantity == 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = new_quantity;
        }

        self.persist();
        true
    }

    /// Empty the cart unconditionally, e.g. after checkout hand-off.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Whether gated cart mutations would currently succeed.
    #[must_use]
    pub fn can_modify(&self) -> bool {
        self.auth.is_authenticated()
    }

    // =========================================================================
    // Derived Reads
    // =========================================================================

    /// All lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of all line totals.
    ///
    /// A cart is single-currency in practice; the first line's currency is
    /// used for the sum, and an empty cart reports zero in the default
    /// currency.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .lines
            .first()
            .map_or_else(CurrencyCode::default, |line| {
                line.unit_price.currency_code()
            });

        self.lines
            .iter()
            .fold(Price::zero(currency), |sum, line| sum.plus(line.line_total()))
    }

    /// Checkout estimate under `policy`.
    ///
    /// Shipping applies only to a non-empty cart; tax applies to the
    /// subtotal.
    #[must_use]
    pub fn totals(&self, policy: &TotalsPolicy) -> CartTotals {
        let subtotal = self.subtotal();
        let shipping = if self.is_empty() {
            Price::zero(subtotal.currency_code())
        } else {
            policy.flat_shipping
        };
        let tax = subtotal.scaled(policy.tax_rate);
        let total = subtotal.plus(shipping).plus(tax);

        CartTotals {
            subtotal,
            shipping,
            tax,
            total,
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the current cart through to storage.
    ///
    /// The persisted collection is partitioned by the auth flag at write
    /// time: a guest persists an empty cart no matter what is in memory. A
    /// failed write is logged and swallowed; the in-memory cart stands.
    pub(crate) fn persist(&self) {
        let snapshot = if self.auth.is_authenticated() {
            CartSnapshot {
                cart: self.lines.clone(),
            }
        } else {
            CartSnapshot::default()
        };

        if let Err(e) =
            storage::store_envelope(self.backend.as_ref(), keys::CART_STORAGE, &snapshot)
        {
            tracing::error!("Failed to persist cart: {e}");
        }
    }

    fn find_line_mut(&mut self, key: &LineKey) -> Option<&mut CartLineItem> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == key.product && line.variant == key.variant)
    }
}
