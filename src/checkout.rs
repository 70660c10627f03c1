//! Checkout
//!
//! Turns a cart into an order draft and hands it to the external
//! order-creation collaborator. Checkout revalidates stock first and never
//! submits a cart whose quantities exceed the live catalog; the cart is
//! cleared only after the order is accepted.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartLine, CartSummary, PricingPolicy},
    catalog::{CatalogError, StockLookup, revalidate},
    products::ProductId,
};

/// Identifier of a created order, as minted by the order collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wraps the collaborator's order identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the customer pays for the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    /// Pay the rider on delivery.
    CashOnDelivery,

    /// Paid online through the payment collaborator.
    Online,
}

/// Where the order is delivered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Recipient name.
    pub recipient: String,

    /// Contact phone number.
    pub phone: String,

    /// Street address.
    pub street: String,

    /// City or locality.
    pub city: String,

    /// Postal code.
    pub postal_code: String,
}

/// Everything the order collaborator needs to create an order: the cart
/// lines, the derived summary, and the delivery/payment details.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Cart lines in insertion order.
    pub lines: Vec<CartLine>,

    /// Pricing totals derived from the lines.
    pub summary: CartSummary,

    /// Delivery address.
    pub address: DeliveryAddress,

    /// Payment method.
    pub payment: PaymentMethod,
}

impl OrderDraft {
    /// Builds a draft from the current cart state.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn from_cart(
        cart: &Cart,
        policy: &PricingPolicy,
        address: DeliveryAddress,
        payment: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            lines: cart.lines().to_vec(),
            summary: cart.summary_with(policy),
            address,
            payment,
        })
    }
}

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines to order.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Stock changed since items were added; the listed products exceed the
    /// live stock and the caller must clamp or prompt before retrying.
    #[error("stock changed for {} product(s) since they were added", .0.len())]
    StaleStock(Vec<ProductId>),

    /// The stock revalidation fetch failed. Retryable.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The order collaborator rejected or failed the order.
    #[error("order placement failed: {reason}")]
    Gateway {
        /// Description of the collaborator failure.
        reason: String,
    },
}

/// Creates orders from drafts.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits a draft and returns the created order's identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the order cannot be created.
    async fn place_order(&self, draft: &OrderDraft) -> Result<OrderId, CheckoutError>;
}

/// Runs the full checkout: revalidate stock, build the draft, place the
/// order, and clear the cart on success.
///
/// On any failure the cart is left exactly as it was, so the caller can fix
/// it up (or retry) and check out again.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] if there is nothing to order.
/// - [`CheckoutError::StaleStock`] listing the products whose quantities
///   exceed live stock.
/// - [`CheckoutError::Catalog`] if the revalidation fetch fails.
/// - Whatever the gateway returns if order creation fails.
pub async fn checkout<C, G>(
    cart: &mut Cart,
    catalog: &C,
    gateway: &G,
    policy: &PricingPolicy,
    address: DeliveryAddress,
    payment: PaymentMethod,
) -> Result<OrderId, CheckoutError>
where
    C: StockLookup + ?Sized,
    G: OrderGateway + ?Sized,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let stale = revalidate(cart, catalog).await?;
    if !stale.is_empty() {
        return Err(CheckoutError::StaleStock(stale));
    }

    let draft = OrderDraft::from_cart(cart, policy, address, payment)?;
    let order = gateway.place_order(&draft).await?;

    info!(order = %order, items = draft.summary.item_count, "order placed");
    cart.clear();

    Ok(order)
}
