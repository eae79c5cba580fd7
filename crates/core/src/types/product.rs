//! Catalog product records as consumed by the client stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// A product as delivered by the catalog.
///
/// Only `id`, `name`, and `price` are required; deserialization fails fast on
/// a record missing any of them. Imagery and taxonomy are optional display
/// metadata, and any other catalog fields ride along untouched in
/// [`extra`](Self::extra).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price.
    pub price: Price,
    /// Primary image URL, if the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Top-level department (e.g., "Electronics").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Category within the department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Subcategory within the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Catalog fields this library does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductRecord {
    /// Create a record from the required fields, with no optional metadata.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            department: None,
            category: None,
            subcategory: None,
            extra: Map::new(),
        }
    }
}
