//! Integration tests for StyleSphere client state.
//!
//! Everything runs in-process over an in-memory storage backend; no server,
//! database, or browser is involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stylesphere-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_lifecycle` - Login, logout, and redirect flows across stores
//! - `persistence_format` - Stored snapshot layout and cross-session hydration

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroU32;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stylesphere_client_store::{CurrentUser, MemoryStorage, StaticLocation, StorefrontSession};
use stylesphere_core::{CurrencyCode, Email, Price, ProductId, ProductRecord, UserId};

/// One simulated browsing session: a storage backend plus the stores over it.
///
/// The backend is exposed so tests can assert on raw persisted payloads and
/// carry state across "reloads".
pub struct TestContext {
    /// The storage shared by every store in the session.
    pub backend: Arc<MemoryStorage>,
    /// The session under test.
    pub session: StorefrontSession,
}

impl TestContext {
    /// Fresh guest session parked on a product page.
    #[must_use]
    pub fn new() -> Self {
        Self::at("/products/123?color=black")
    }

    /// Fresh guest session at a given location.
    #[must_use]
    pub fn at(location: &str) -> Self {
        init_tracing();
        let backend = Arc::new(MemoryStorage::new());
        let session =
            StorefrontSession::new(backend.clone(), Arc::new(StaticLocation::new(location)));
        Self { backend, session }
    }

    /// Fresh session with [`sample_user`] already logged in.
    #[must_use]
    pub fn logged_in() -> Self {
        let mut ctx = Self::new();
        ctx.session.login(sample_user());
        ctx
    }

    /// A new session over the same backend, hydrated, as after a page reload.
    #[must_use]
    pub fn reload(&self) -> Self {
        let backend = self.backend.clone();
        let mut session =
            StorefrontSession::new(backend.clone(), Arc::new(StaticLocation::new("/")));
        session.hydrate();
        Self { backend, session }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a fmt subscriber for test diagnostics.
///
/// Defaults to warnings only; raise with `RUST_LOG` when debugging a test.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

// =============================================================================
// Fixtures
// =============================================================================

/// The account every test logs in with.
///
/// # Panics
///
/// Panics when the fixture email is rejected by validation.
#[must_use]
pub fn sample_user() -> CurrentUser {
    CurrentUser {
        id: UserId::new(101),
        username: "ava".to_owned(),
        email: Email::parse("ava@stylesphere.shop").expect("fixture email is valid"),
    }
}

/// Catalog fixture: headphones with an image and a department.
#[must_use]
pub fn headphones() -> ProductRecord {
    let mut product = ProductRecord::new(
        ProductId::new(123),
        "Aura-X Pro Headphones",
        Price::from_cents(29999, CurrencyCode::USD),
    );
    product.image = Some("https://images.stylesphere.shop/aura-x-pro.jpg".to_owned());
    product.department = Some("Electronics".to_owned());
    product
}

/// Catalog fixture: a fitness tracker with no variant options.
#[must_use]
pub fn fitness_tracker() -> ProductRecord {
    ProductRecord::new(
        ProductId::new(456),
        "Smart Fitness Tracker",
        Price::from_cents(8999, CurrencyCode::USD),
    )
}

/// Catalog fixture: a wallet, bare required fields only.
#[must_use]
pub fn wallet() -> ProductRecord {
    ProductRecord::new(
        ProductId::new(789),
        "Minimalist Leather Wallet",
        Price::from_cents(4500, CurrencyCode::USD),
    )
}

/// Shorthand for a non-zero quantity.
///
/// # Panics
///
/// Panics when `n` is zero.
#[must_use]
pub fn qty(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("test quantity must be non-zero")
}
