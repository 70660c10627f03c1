//! Products
//!
//! Catalog-facing types. The catalog itself is an external collaborator;
//! these are the snapshots of it the cart works with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::MinorUnits;

/// Opaque identifier for a product in the external catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from the external catalog's identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw catalog identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the storefront knows about a product at the moment it is added to a
/// cart: identity, display fields, price and the stock ceiling.
///
/// The unit price is a snapshot; it is not live-repriced once the product is
/// in a cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price in minor units, snapshotted at add-time.
    pub unit_price: MinorUnits,

    /// Optional image reference.
    pub image: Option<String>,

    /// Name of the shop that owns this product.
    pub shop: String,

    /// Available stock ceiling.
    pub stock: u32,
}
