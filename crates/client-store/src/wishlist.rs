//! The wishlist store.
//!
//! A wishlist holds at most one entry per product, in insertion order.
//! Adding is auth-gated the same way cart adds are; removal is not. Adds are
//! idempotent: saving an already-saved product changes nothing and still
//! reports success. Write-through persistence follows the cart's rules,
//! including the guest partition.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stylesphere_core::{Price, ProductId, ProductRecord};

use crate::auth::{self, AuthFlag, LocationProvider};
use crate::storage::{self, StorageBackend, keys};

/// A saved product.
///
/// Carries the display-metadata subset of the catalog record so the wishlist
/// can render without refetching the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// The saved product.
    pub product_id: ProductId,
    /// Display name at save time.
    pub name: String,
    /// Price at save time.
    pub price: Price,
    /// Primary image, if the catalog had one.
    pub image: Option<String>,
    /// Top-level department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Category within the department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Subcategory within the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl From<&ProductRecord> for WishlistEntry {
    fn from(product: &ProductRecord) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            department: product.department.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
        }
    }
}

/// Persisted snapshot of the wishlist store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WishlistSnapshot {
    wishlist_items: Vec<WishlistEntry>,
}

/// The wishlist.
pub struct WishlistStore {
    backend: Arc<dyn StorageBackend>,
    auth: Arc<dyn AuthFlag>,
    location: Arc<dyn LocationProvider>,
    entries: Vec<WishlistEntry>,
    hydrated: bool,
}

impl WishlistStore {
    /// Create an empty wishlist wired to its collaborators.
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
            entries: Vec::new(),
            hydrated: false,
        }
    }

    /// Load the persisted wishlist.
    ///
    /// Tolerant of anything: a missing, corrupt, or incompatible snapshot
    /// yields an empty wishlist. The hydrated flag is set either way.
    pub fn hydrate(&mut self) {
        self.entries = match storage::load_envelope::<WishlistSnapshot>(
            self.backend.as_ref(),
            keys::WISHLIST_STORAGE,
        ) {
            Ok(Some(snapshot)) => snapshot.wishlist_items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Discarding persisted wishlist: {e}");
                Vec::new()
            }
        };
        tracing::debug!(entries = self.entries.len(), "Wishlist hydrated");
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

    /// Save a product.
    ///
    /// Unauthenticated callers get `false` back, the wishlist is left
    /// untouched, and the current location is recorded as the post-login
    /// redirect target. Saving an already-saved product is a successful
    /// no-op.
    pub fn add(&mut self, product: &ProductRecord) -> bool {
        if !self.auth.is_authenticated() {
            tracing::debug!(product = %product.id, "Wishlist add refused: not authenticated");
            auth::record_login_redirect(self.backend.as_ref(), self.location.as_ref());
            return false;
        }

        if !self.contains(product.id) {
            self.entries.push(WishlistEntry::from(product));
            self.persist();
        }
        true
    }

    /// Drop a product from the wishlist.
    ///
    /// Not auth-gated, and a no-op when the product is not saved.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product_id != product_id);

        if self.entries.len() != before {
            self.persist();
        }
    }

    /// Flip a product in or out of the wishlist.
    ///
    /// Returns whether the product is saved after the call. Removal is
    /// always allowed; saving goes through the auth gate like
    /// [`add`](Self::add).
    pub fn toggle(&mut self, product: &ProductRecord) -> bool {
        if self.contains(product.id) {
            self.remove(product.id);
            false
        } else {
            self.add(product)
        }
    }

    /// Empty the wishlist unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    // =========================================================================
    // Derived Reads
    // =========================================================================

    /// Whether a product is saved. Pure read, safe during render.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product_id == product_id)
    }

    /// All entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Number of saved products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the current wishlist through to storage.
    ///
    /// Partitioned by the auth flag at write time, exactly like the cart. A
    /// failed write is logged and swallowed.
    pub(crate) fn persist(&self) {
        let snapshot = if self.auth.is_authenticated() {
            WishlistSnapshot {
                wishlist_items: self.entries.clone(),
            }
        } else {
            WishlistSnapshot::default()
        };

        if let Err(e) =
            storage::store_envelope(self.backend.as_ref(), keys::WISHLIST_STORAGE, &snapshot)
        {
            tracing::error!("Failed to persist wishlist: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::auth::{AuthStore, CurrentUser, StaticLocation};
    use crate::storage::MemoryStorage;
    use stylesphere_core::{CurrencyCode, Email, UserId};

    struct Fixture {
        backend: Arc<MemoryStorage>,
        auth: Arc<AuthStore>,
        wishlist: WishlistStore,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(MemoryStorage::new());
        let auth = Arc::new(AuthStore::new(backend.clone()));
        let location = Arc::new(StaticLocation::new("/wishlist"));
        let wishlist = WishlistStore::new(backend.clone(), auth.clone(), location);
        Fixture {
            backend,
            auth,
            wishlist,
        }
    }

    fn logged_in_fixture() -> Fixture {
        let f = fixture();
        f.auth.set_auth(CurrentUser {
            id: UserId::new(1),
            username: "ava".to_owned(),
            email: Email::parse("ava@example.com").unwrap(),
        });
        f
    }

    fn headphones() -> ProductRecord {
        let mut product = ProductRecord::new(
            ProductId::new(1),
            "Aura-X Pro Headphones",
            Price::from_cents(29999, CurrencyCode::USD),
        );
        product.department = Some("Electronics".to_owned());
        product
    }

    fn shirt() -> ProductRecord {
        ProductRecord::new(
            ProductId::new(2),
            "Classic Linen Shirt",
            Price::from_cents(5900, CurrencyCode::USD),
        )
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut f = logged_in_fixture();

        assert!(f.wishlist.add(&headphones()));
        assert!(f.wishlist.add(&headphones()));

        assert_eq!(f.wishlist.count(), 1);
        assert!(f.wishlist.contains(ProductId::new(1)));
    }

    #[test]
    fn test_add_copies_display_metadata() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());

        let entry = f.wishlist.entries().first().unwrap();
        assert_eq!(entry.name, "Aura-X Pro Headphones");
        assert_eq!(entry.department.as_deref(), Some("Electronics"));
        assert_eq!(entry.price, Price::from_cents(29999, CurrencyCode::USD));
    }

    #[test]
    fn test_add_refused_when_logged_out() {
        let mut f = fixture();

        assert!(!f.wishlist.add(&headphones()));
        assert!(f.wishlist.is_empty());
        assert_eq!(
            f.backend.get(keys::REDIRECT_AFTER_LOGIN).unwrap().as_deref(),
            Some("/wishlist")
        );
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());
        f.wishlist.add(&shirt());

        let ids: Vec<ProductId> = f.wishlist.entries().iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2)]);
    }

    #[test]
    fn test_remove_is_not_auth_gated() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());
        f.auth.clear_auth();

        f.wishlist.remove(ProductId::new(1));
        assert!(f.wishlist.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());

        f.wishlist.remove(ProductId::new(9));
        assert_eq!(f.wishlist.count(), 1);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut f = logged_in_fixture();

        assert!(f.wishlist.toggle(&headphones()));
        assert!(f.wishlist.contains(ProductId::new(1)));

        assert!(!f.wishlist.toggle(&headphones()));
        assert!(!f.wishlist.contains(ProductId::new(1)));
    }

    #[test]
    fn test_toggle_logged_out_cannot_add() {
        let mut f = fixture();
        assert!(!f.wishlist.toggle(&headphones()));
        assert!(f.wishlist.is_empty());
    }

    #[test]
    fn test_toggle_logged_out_can_remove() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());
        f.auth.clear_auth();

        assert!(!f.wishlist.toggle(&headphones()));
        assert!(f.wishlist.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());
        f.wishlist.add(&shirt());

        f.wishlist.clear();
        assert!(f.wishlist.is_empty());
        assert_eq!(f.wishlist.count(), 0);
    }

    #[test]
    fn test_write_through_persists_entries_when_authenticated() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());

        let raw = f.backend.get(keys::WISHLIST_STORAGE).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value.pointer("/version"), Some(&json!(0)));
        assert_eq!(
            value.pointer("/state/wishlistItems/0/productId"),
            Some(&json!(1))
        );
        assert_eq!(
            value.pointer("/state/wishlistItems/0/name"),
            Some(&json!("Aura-X Pro Headphones"))
        );
    }

    #[test]
    fn test_write_through_persists_empty_wishlist_for_guests() {
        let mut f = logged_in_fixture();
        f.wishlist.add(&headphones());
        f.auth.clear_auth();

        f.wishlist.remove(ProductId::new(1));

        let raw = f.backend.get(keys::WISHLIST_STORAGE).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value.pointer("/state/wishlistItems"), Some(&json!([])));
    }

    #[test]
    fn test_hydrate_restores_persisted_entries() {
        let f = {
            let mut f = logged_in_fixture();
            f.wishlist.add(&headphones());
            f.wishlist.add(&shirt());
            f
        };

        let location = Arc::new(StaticLocation::new("/"));
        let mut restored = WishlistStore::new(f.backend.clone(), f.auth.clone(), location);
        restored.hydrate();

        assert!(restored.has_hydrated());
        assert_eq!(restored.count(), 2);
        assert!(restored.contains(ProductId::new(2)));
    }

    #[test]
    fn test_hydrate_tolerates_corrupt_snapshot() {
        let f = fixture();
        f.backend.set(keys::WISHLIST_STORAGE, "][").unwrap();

        let location = Arc::new(StaticLocation::new("/"));
        let mut wishlist = WishlistStore::new(f.backend, f.auth, location);
        wishlist.hydrate();

        assert!(wishlist.has_hydrated());
        assert!(wishlist.is_empty());
    }
}
