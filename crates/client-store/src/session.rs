//! App-level session facade.
//!
//! [`StorefrontSession`] wires one auth store, one cart, and one wishlist
//! over a shared storage backend and location source, and owns the flows
//! that cut across them: startup hydration, login, logout, and the login
//! redirect hand-off.

use std::sync::Arc;

use crate::auth::{self, AuthFlag, AuthStore, CurrentUser, LocationProvider};
use crate::cart::CartStore;
use crate::storage::{StorageBackend, keys};
use crate::wishlist::WishlistStore;

/// One user session over the storefront stores.
pub struct StorefrontSession {
    backend: Arc<dyn StorageBackend>,
    location: Arc<dyn LocationProvider>,
    auth: Arc<AuthStore>,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl StorefrontSession {
    /// Wire up a session over one storage backend and location source.
    ///
    /// The auth store doubles as the auth flag for both collection stores,
    /// so a login is visible to them on their very next call.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>, location: Arc<dyn LocationProvider>) -> Self {
        let auth = Arc::new(AuthStore::new(backend.clone()));
        let flag: Arc<dyn AuthFlag> = auth.clone();
        let cart = CartStore::new(backend.clone(), flag.clone(), location.clone());
        let wishlist = WishlistStore::new(backend.clone(), flag, location.clone());

        Self {
            backend,
            location,
            auth,
            cart,
            wishlist,
        }
    }

    /// Restore persisted state.
    ///
    /// Auth hydrates first so the collection stores see the restored flag in
    /// any write-through they perform afterwards.
    pub fn hydrate(&mut self) {
        self.auth.hydrate();
        self.cart.hydrate();
        self.wishlist.hydrate();
    }

    // =========================================================================
    // Login & Logout
    // =========================================================================

    /// Record a successful login.
    ///
    /// Both collections are re-persisted immediately so snapshots written
    /// under the guest partition catch up with the in-memory state.
    pub fn login(&mut self, user: CurrentUser) {
        self.auth.set_auth(user);
        self.cart.persist();
        self.wishlist.persist();
    }

    /// End the session.
    ///
    /// Clears auth and empties both collections, in memory and in storage,
    /// and drops any pending login redirect target.
    pub fn logout(&mut self) {
        self.auth.clear_auth();
        self.cart.clear();
        self.wishlist.clear();

        if let Err(e) = self.backend.remove(keys::REDIRECT_AFTER_LOGIN) {
            tracing::error!("Failed to drop login redirect target: {e}");
        }
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    // =========================================================================
    // Login Redirect Hand-off
    // =========================================================================

    /// Send the user to the login screen.
    ///
    /// Records the current location as the post-login redirect target, plus
    /// an optional one-shot message for the login screen to display.
    pub fn request_login(&self, message: Option<&str>) {
        auth::record_login_redirect(self.backend.as_ref(), self.location.as_ref());

        if let Some(message) = message {
            if let Err(e) = self.backend.set(keys::LOGIN_MESSAGE, message) {
                tracing::error!("Failed to record login message: {e}");
            }
        }
    }

    /// Read and clear the post-login redirect target.
    ///
    /// The login flow calls this once after a successful sign-in; when no
    /// target was recorded the caller lands on the home screen.
    #[must_use]
    pub fn take_login_redirect(&self) -> Option<String> {
        self.take_stored(keys::REDIRECT_AFTER_LOGIN)
    }

    /// Read and clear the one-shot login screen message.
    #[must_use]
    pub fn take_login_message(&self) -> Option<String> {
        self.take_stored(keys::LOGIN_MESSAGE)
    }

    fn take_stored(&self, key: &str) -> Option<String> {
        let value = match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {key}: {e}");
                None
            }
        };

        if value.is_some() {
            if let Err(e) = self.backend.remove(key) {
                tracing::error!("Failed to clear {key}: {e}");
            }
        }

        value
    }

    // =========================================================================
    // Store Access
    // =========================================================================

    /// The shared auth store.
    #[must_use]
    pub const fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// The cart, for mutations.
    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// The wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// The wishlist, for mutations.
    pub fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }
}
