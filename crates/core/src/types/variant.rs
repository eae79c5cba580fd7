//! Variant selections and cart line identity.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// A concrete variant selection for a product: size and color.
///
/// Products without a size or color option use the empty string for the
/// missing dimension, so [`VariantKey::none`] identifies the base product.
/// Two selections are the same variant only when both dimensions match
/// exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    /// Selected size (e.g., "M"). Empty when the product has no sizes.
    pub size: String,
    /// Selected color (e.g., "Black"). Empty when the product has no colors.
    pub color: String,
}

impl VariantKey {
    /// Create a variant selection from a size and a color.
    #[must_use]
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
        }
    }

    /// The empty selection, for products without variant options.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            size: String::new(),
            color: String::new(),
        }
    }

    /// Whether no size or color was selected.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.size.is_empty() && self.color.is_empty()
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.size.is_empty(), self.color.is_empty()) {
            (false, false) => write!(f, "{} / {}", self.size, self.color),
            (false, true) => f.write_str(&self.size),
            (true, false) => f.write_str(&self.color),
            (true, true) => Ok(()),
        }
    }
}

/// The full identity of a cart line: a product plus its variant selection.
///
/// Lines in a cart are keyed by this triple; the same product added with a
/// different size or color forms a separate line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// The product being purchased.
    pub product: ProductId,
    /// The selected variant of that product.
    pub variant: VariantKey,
}

impl LineKey {
    /// Create a line key from a product and a variant selection.
    #[must_use]
    pub const fn new(product: ProductId, variant: VariantKey) -> Self {
        Self { product, variant }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variant.is_none() {
            write!(f, "{}", self.product)
        } else {
            write!(f, "{} ({})", self.product, self.variant)
        }
    }
}
