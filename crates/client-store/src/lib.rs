//! StyleSphere client session state.
//!
//! This crate is the state engine behind the StyleSphere storefront UI: a
//! shopping cart, a wishlist, and the authentication flag that gates them,
//! with write-through persistence to a host-provided storage backend.
//!
//! The modelled host is a single-threaded, event-driven UI shell. Stores are
//! synchronous and mutate through `&mut self`; the collaborators they share
//! (auth flag, storage, location source) ride behind [`Arc`](std::sync::Arc).
//!
//! # Modules
//!
//! - [`auth`] - Auth flag, auth store, and login redirect capture
//! - [`cart`] - The shopping cart store
//! - [`session`] - App-level facade wiring the stores together
//! - [`storage`] - Persistence boundary and snapshot envelope
//! - [`wishlist`] - The wishlist store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use auth::{AuthFlag, AuthStore, CurrentUser, LocationProvider, StaticLocation};
pub use cart::{CartLineItem, CartStore, CartTotals, TotalsPolicy};
pub use session::StorefrontSession;
pub use storage::{Envelope, MemoryStorage, PersistError, StorageBackend, StorageError};
pub use wishlist::{WishlistEntry, WishlistStore};
