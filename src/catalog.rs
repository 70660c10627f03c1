//! Catalog
//!
//! The stock-truth collaborator. Cart stock ceilings are add-time snapshots,
//! so before checkout the cart is revalidated against a fresh stock map
//! fetched from the catalog. A failed fetch is retryable; partial results
//! are never applied.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{cart::Cart, products::ProductId};

/// Errors raised by a stock lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or did not answer for every
    /// requested id.
    #[error("stock lookup failed: {reason}")]
    Lookup {
        /// Description of the underlying failure.
        reason: String,
    },
}

/// Fetches current stock for a set of products.
#[automock]
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// Returns the current stock for each requested product id.
    ///
    /// Implementations must answer for all requested ids or fail wholesale;
    /// callers never apply partial results to a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the lookup fails.
    async fn current_stock(
        &self,
        products: &[ProductId],
    ) -> Result<FxHashMap<ProductId, u32>, CatalogError>;
}

/// Revalidates a cart against fresh stock truth.
///
/// Returns the ids whose cart quantity now exceeds the live stock; an empty
/// list means the cart is sellable as-is. The cart itself is not modified.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the stock lookup fails; the caller may
/// retry.
pub async fn revalidate<C>(cart: &Cart, catalog: &C) -> Result<Vec<ProductId>, CatalogError>
where
    C: StockLookup + ?Sized,
{
    if cart.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<ProductId> = cart
        .lines()
        .iter()
        .map(|line| line.product_id.clone())
        .collect();

    let stock = catalog.current_stock(&ids).await?;

    Ok(cart.validate_against_stock(&stock))
}
