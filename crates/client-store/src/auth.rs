//! Authentication state and the gate the other stores consult.
//!
//! [`AuthStore`] holds the logged-in user and implements [`AuthFlag`], the
//! boolean signal every gated cart and wishlist mutation reads at call time.
//! The flag is never cached by its consumers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use stylesphere_core::{Email, UserId};

use crate::storage::{self, StorageBackend, keys};

/// The authentication signal gating cart and wishlist mutations.
///
/// Implementations must answer from live state on every call.
pub trait AuthFlag: Send + Sync {
    /// Whether a user is currently authenticated.
    fn is_authenticated(&self) -> bool;
}

/// Source of the current navigable location (path and query).
///
/// When an unauthenticated user attempts a gated mutation, the location
/// reported here is recorded verbatim as the post-login redirect target.
pub trait LocationProvider: Send + Sync {
    /// The location the user is on right now, e.g. `/products/42?color=black`.
    fn current_location(&self) -> String;
}

/// A fixed location, for tests and hosts with a single entry point.
#[derive(Debug, Clone)]
pub struct StaticLocation(String);

impl StaticLocation {
    /// Create a provider that always reports `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}

impl LocationProvider for StaticLocation {
    fn current_location(&self) -> String {
        self.0.clone()
    }
}

/// Identity of the logged-in user.
///
/// Minimal data kept client-side to identify the account; everything else
/// stays on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display handle.
    pub username: String,
    /// User's email address.
    pub email: Email,
}

/// Persisted snapshot of the auth store.
///
/// The boolean rides along for snapshot-shape stability; presence of `user`
/// is authoritative on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSnapshot {
    is_authenticated: bool,
    user: Option<CurrentUser>,
}

/// Client-side authentication state.
///
/// One instance is shared behind an [`Arc`] so the cart and wishlist can hold
/// it as their [`AuthFlag`] while the login flow mutates it; interior
/// mutability keeps that sharing ergonomic for a single-threaded UI host.
///
/// Unlike the collection stores, auth state is persisted unconditionally: it
/// is itself the signal the others partition on.
pub struct AuthStore {
    backend: Arc<dyn StorageBackend>,
    state: RwLock<AuthState>,
}

#[derive(Debug, Default)]
struct AuthState {
    user: Option<CurrentUser>,
    hydrated: bool,
}

impl AuthStore {
    /// Create a store over `backend`, starting logged out.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(AuthState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        // A poisoned lock still holds the last written state
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load persisted auth state.
    ///
    /// Tolerant of anything: a missing, corrupt, or incompatible snapshot
    /// leaves the store logged out. The hydrated flag is set either way.
    pub fn hydrate(&self) {
        let user = match storage::load_envelope::<AuthSnapshot>(
            self.backend.as_ref(),
            keys::AUTH_STORAGE,
        ) {
            Ok(Some(snapshot)) => snapshot.user,
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Discarding persisted auth state: {e}");
                None
            }
        };

        tracing::debug!(logged_in = user.is_some(), "Auth state hydrated");

        let mut state = self.write();
        state.user = user;
        state.hydrated = true;
    }

    /// Whether [`hydrate`](Self::hydrate) has run.
    #[must_use]
    pub fn has_hydrated(&self) -> bool {
        self.read().hydrated
    }

    /// Record a successful login and persist it.
    pub fn set_auth(&self, user: CurrentUser) {
        self.write().user = Some(user);
        self.persist();
    }

    /// Log out and persist the cleared state.
    pub fn clear_auth(&self) {
        self.write().user = None;
        self.persist();
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.read().user.clone()
    }

    /// Write the current state through to storage.
    ///
    /// A failed write is logged and swallowed; the in-memory login state
    /// stands.
    fn persist(&self) {
        let snapshot = {
            let state = self.read();
            AuthSnapshot {
                is_authenticated: state.user.is_some(),
                user: state.user.clone(),
            }
        };

        if let Err(e) =
            storage::store_envelope(self.backend.as_ref(), keys::AUTH_STORAGE, &snapshot)
        {
            tracing::error!("Failed to persist auth state: {e}");
        }
    }
}

impl AuthFlag for AuthStore {
    fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }
}

/// Record where the user was when a gated action bounced off the auth gate.
///
/// Stored under [`keys::REDIRECT_AFTER_LOGIN`]; the login flow reads and
/// clears it after a successful sign-in.
pub(crate) fn record_login_redirect(
    backend: &dyn StorageBackend,
    location: &dyn LocationProvider,
) {
    let target = location.current_location();
    if let Err(e) = backend.set(keys::REDIRECT_AFTER_LOGIN, &target) {
        tracing::error!("Failed to record login redirect target: {e}");
    }
}
