//! Cross-store session lifecycle tests.
//!
//! These walk the full client journey: browse as a guest, bounce off the
//! auth gate, log in, land back where the bounce happened, shop, and log
//! out.

use stylesphere_client_store::TotalsPolicy;
use stylesphere_core::{LineKey, ProductId, VariantKey};
use stylesphere_integration_tests::{
    TestContext, fitness_tracker, headphones, qty, sample_user, wallet,
};

// ============================================================================
// Auth Gate & Redirect Flow
// ============================================================================

#[test]
fn test_guest_add_bounces_then_login_lands_back() {
    let mut ctx = TestContext::new();

    // Guest taps "add to cart" on the product page
    let added = ctx
        .session
        .cart_mut()
        .add(&headphones(), VariantKey::new("M", "Black"), qty(1));
    assert!(!added);
    assert!(ctx.session.cart().is_empty());

    // Login screen picks up where the bounce happened
    ctx.session.login(sample_user());
    assert_eq!(
        ctx.session.take_login_redirect().as_deref(),
        Some("/products/123?color=black")
    );
    // One-shot: a second read is empty
    assert_eq!(ctx.session.take_login_redirect(), None);

    // The retry goes through
    assert!(
        ctx.session
            .cart_mut()
            .add(&headphones(), VariantKey::new("M", "Black"), qty(1))
    );
    assert_eq!(ctx.session.cart().item_count(), 1);
}

#[test]
fn test_guest_wishlist_save_bounces_the_same_way() {
    let mut ctx = TestContext::at("/products/456");

    assert!(!ctx.session.wishlist_mut().add(&fitness_tracker()));
    assert!(ctx.session.wishlist().is_empty());

    ctx.session.login(sample_user());
    assert_eq!(
        ctx.session.take_login_redirect().as_deref(),
        Some("/products/456")
    );

    assert!(ctx.session.wishlist_mut().add(&fitness_tracker()));
    assert!(ctx.session.wishlist().contains(ProductId::new(456)));
}

#[test]
fn test_request_login_carries_a_message() {
    let ctx = TestContext::new();

    ctx.session
        .request_login(Some("You need to log in to add items to cart"));

    assert_eq!(
        ctx.session.take_login_message().as_deref(),
        Some("You need to log in to add items to cart")
    );
    assert_eq!(ctx.session.take_login_message(), None);
    assert_eq!(
        ctx.session.take_login_redirect().as_deref(),
        Some("/products/123?color=black")
    );
}

// ============================================================================
// Shopping Flow
// ============================================================================

#[test]
fn test_merge_update_and_remove_flow() {
    let mut ctx = TestContext::logged_in();
    let black_m = VariantKey::new("M", "Black");
    let black_l = VariantKey::new("L", "Black");

    // Same variant twice merges; a different size is its own line
    ctx.session.cart_mut().add(&headphones(), black_m.clone(), qty(1));
    ctx.session.cart_mut().add(&headphones(), black_m.clone(), qty(2));
    ctx.session.cart_mut().add(&headphones(), black_l.clone(), qty(1));
    assert_eq!(ctx.session.cart().lines().len(), 2);
    assert_eq!(ctx.session.cart().item_count(), 4);

    // Cart page quantity stepper
    let key_m = LineKey::new(ProductId::new(123), black_m);
    assert!(ctx.session.cart_mut().update_quantity(&key_m, 1));
    assert_eq!(ctx.session.cart().item_count(), 2);

    // Stepping down to zero removes the line
    assert!(ctx.session.cart_mut().update_quantity(&key_m, 0));
    assert_eq!(ctx.session.cart().lines().len(), 1);

    // Trash-can button on the remaining line
    ctx.session
        .cart_mut()
        .remove(&LineKey::new(ProductId::new(123), black_l));
    assert!(ctx.session.cart().is_empty());
}

#[test]
fn test_wishlist_toggle_roundtrip() {
    let mut ctx = TestContext::logged_in();

    assert!(ctx.session.wishlist_mut().toggle(&wallet()));
    assert!(ctx.session.wishlist().contains(ProductId::new(789)));
    assert_eq!(ctx.session.wishlist().count(), 1);

    assert!(!ctx.session.wishlist_mut().toggle(&wallet()));
    assert!(!ctx.session.wishlist().contains(ProductId::new(789)));
    assert!(ctx.session.wishlist().is_empty());
}

#[test]
fn test_checkout_estimate() {
    let mut ctx = TestContext::logged_in();
    ctx.session
        .cart_mut()
        .add(&headphones(), VariantKey::new("M", "Black"), qty(2));
    ctx.session.cart_mut().add(&wallet(), VariantKey::none(), qty(1));

    let totals = ctx.session.cart().totals(&TotalsPolicy::default());
    assert_eq!(totals.subtotal.display(), "$644.98");
    assert_eq!(totals.shipping.display(), "$5.99");
    assert_eq!(totals.tax.display(), "$51.60");
    assert_eq!(totals.total.display(), "$702.57");
}

#[test]
fn test_empty_cart_estimate_skips_shipping() {
    let ctx = TestContext::logged_in();

    let totals = ctx.session.cart().totals(&TotalsPolicy::default());
    assert_eq!(totals.shipping.display(), "$0.00");
    assert_eq!(totals.total.display(), "$0.00");
}

// ============================================================================
// Logout
// ============================================================================

#[test]
fn test_logout_wipes_memory_and_storage() {
    let mut ctx = TestContext::logged_in();
    ctx.session
        .cart_mut()
        .add(&headphones(), VariantKey::new("M", "Black"), qty(2));
    ctx.session.wishlist_mut().add(&wallet());

    ctx.session.logout();
    assert!(!ctx.session.is_authenticated());
    assert!(ctx.session.cart().is_empty());
    assert!(ctx.session.wishlist().is_empty());

    // A reload finds nothing to restore
    let reloaded = ctx.reload();
    assert!(!reloaded.session.is_authenticated());
    assert!(reloaded.session.cart().is_empty());
    assert!(reloaded.session.wishlist().is_empty());
}

#[test]
fn test_logout_drops_pending_redirect() {
    let mut ctx = TestContext::new();

    // Guest bounce records a target, then the user logs in and straight
    // out again without consuming it
    ctx.session
        .cart_mut()
        .add(&headphones(), VariantKey::none(), qty(1));
    ctx.session.login(sample_user());
    ctx.session.logout();

    assert_eq!(ctx.session.take_login_redirect(), None);
}

#[test]
fn test_guest_mutations_after_logout_stay_gated() {
    let mut ctx = TestContext::logged_in();
    ctx.session
        .cart_mut()
        .add(&headphones(), VariantKey::new("M", "Black"), qty(1));

    ctx.session.logout();

    assert!(
        !ctx.session
            .cart_mut()
            .add(&headphones(), VariantKey::new("M", "Black"), qty(1))
    );
    assert!(!ctx.session.wishlist_mut().add(&wallet()));
    assert!(!ctx.session.cart().can_modify());
}
