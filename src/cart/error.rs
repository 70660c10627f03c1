//! Cart errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::ProductId;

/// Stock-bound validation failures raised by cart mutations.
///
/// These are local, non-fatal conditions: a rejected mutation leaves the
/// cart unchanged, the error is mirrored into the cart's error slot, and the
/// UI renders it inline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CartError {
    /// An add or increment would push the quantity past the stock ceiling,
    /// or the product has no stock at all.
    #[error("stock limit reached for product {product}: {stock} available")]
    StockLimitReached {
        /// The product whose stock ceiling was hit.
        product: ProductId,

        /// The stock ceiling recorded for the line.
        stock: u32,
    },

    /// An explicit quantity was requested above the stock ceiling.
    #[error("requested quantity {requested} exceeds stock {stock} for product {product}")]
    QuantityExceedsStock {
        /// The product whose stock ceiling was exceeded.
        product: ProductId,

        /// The quantity the caller asked for.
        requested: u32,

        /// The stock ceiling recorded for the line.
        stock: u32,
    },
}
