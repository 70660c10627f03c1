//! Cart
//!
//! The cart engine: an insertion-ordered list of lines with stock-bound
//! quantity invariants. Every mutation is a total function over
//! (state, input); a rejected mutation leaves the state untouched, records
//! the failure in the error slot and returns it, so no retained line ever
//! violates `1 ≤ quantity ≤ stock`.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    money::MinorUnits,
    products::{ProductId, ProductSnapshot},
};

pub mod error;
pub mod groups;
pub mod summary;

pub use error::CartError;
pub use groups::{ShopGroup, grouped_by_shop};
pub use summary::{CartSummary, FormattedSummary, PricingPolicy, summarize};

/// One product's presence in a cart.
///
/// The unit price is the add-time snapshot, and `stock` is the ceiling
/// recorded when the product was last seen in the catalog; both may be stale
/// relative to the live catalog, which is why checkout revalidates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog identifier; unique within a cart.
    pub product_id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price in minor units, snapshotted at add-time.
    pub unit_price: MinorUnits,

    /// Optional image reference.
    pub image: Option<String>,

    /// Name of the owning shop.
    pub shop: String,

    /// Quantity in the cart. Always at least 1 and at most `stock`.
    pub quantity: u32,

    /// Stock ceiling recorded for this product.
    pub stock: u32,
}

impl CartLine {
    fn from_product(product: &ProductSnapshot) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image: product.image.clone(),
            shop: product.shop.clone(),
            quantity: 1,
            stock: product.stock,
        }
    }

    /// Unit price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> MinorUnits {
        self.unit_price * MinorUnits::from(self.quantity)
    }
}

/// The cart engine and its state: ordered lines, a monotonic last-modified
/// stamp and a transient error slot holding the last rejected mutation.
#[derive(Clone, Debug)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
    updated_at: Timestamp,
    last_error: Option<CartError>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: SmallVec::new(),
            updated_at: Timestamp::now(),
            last_error: None,
        }
    }

    /// Rebuilds a cart from previously persisted lines.
    ///
    /// Snapshots are external input: lines that violate the quantity floor
    /// are dropped rather than restored. Stale stock ceilings are kept as-is;
    /// [`Cart::validate_against_stock`] reconciles them against live data.
    #[must_use]
    pub fn restore(lines: Vec<CartLine>, updated_at: Timestamp) -> Self {
        Self {
            lines: lines.into_iter().filter(|line| line.quantity >= 1).collect(),
            updated_at,
            last_error: None,
        }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines (not total quantity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// When the cart was last successfully mutated. Never moves backwards.
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// The last rejected mutation, if no successful mutation has happened
    /// since.
    #[must_use]
    pub fn last_error(&self) -> Option<&CartError> {
        self.last_error.as_ref()
    }

    /// Adds one unit of a product.
    ///
    /// If the product is already in the cart this is an increment; otherwise
    /// a new line with quantity 1 is inserted, provided the product has
    /// stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockLimitReached`] if the quantity already
    /// equals the stock ceiling, or the product has no stock at all.
    pub fn add_item(&mut self, product: &ProductSnapshot) -> Result<(), CartError> {
        if self.find(&product.id).is_some() {
            return self.increment(&product.id);
        }

        if product.stock == 0 {
            return self.reject(CartError::StockLimitReached {
                product: product.id.clone(),
                stock: 0,
            });
        }

        self.lines.push(CartLine::from_product(product));
        self.committed();

        Ok(())
    }

    /// Removes a line unconditionally. A no-op if the product is absent.
    pub fn remove_item(&mut self, product: &ProductId) {
        let Some(position) = self
            .lines
            .iter()
            .position(|line| &line.product_id == product)
        else {
            return;
        };

        self.lines.remove(position);
        self.committed();
    }

    /// Sets a line's quantity exactly.
    ///
    /// A quantity of 0 removes the line. A no-op if the product is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityExceedsStock`] if the requested quantity
    /// is above the stock ceiling; the line is left unchanged.
    pub fn set_quantity(&mut self, product: &ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_item(product);
            return Ok(());
        }

        let Some(stock) = self.find(product).map(|line| line.stock) else {
            return Ok(());
        };

        if quantity > stock {
            return self.reject(CartError::QuantityExceedsStock {
                product: product.clone(),
                requested: quantity,
                stock,
            });
        }

        if let Some(line) = self.find_mut(product) {
            line.quantity = quantity;
        }
        self.committed();

        Ok(())
    }

    /// Increments a line's quantity by 1. A no-op if the product is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockLimitReached`] if the quantity already
    /// equals the stock ceiling.
    pub fn increment(&mut self, product: &ProductId) -> Result<(), CartError> {
        let Some((quantity, stock)) = self.find(product).map(|line| (line.quantity, line.stock))
        else {
            return Ok(());
        };

        if quantity >= stock {
            return self.reject(CartError::StockLimitReached {
                product: product.clone(),
                stock,
            });
        }

        if let Some(line) = self.find_mut(product) {
            line.quantity = quantity + 1;
        }
        self.committed();

        Ok(())
    }

    /// Decrements a line's quantity by 1, removing the line when it would
    /// drop below 1. A no-op if the product is absent.
    pub fn decrement(&mut self, product: &ProductId) {
        let Some(quantity) = self.find(product).map(|line| line.quantity) else {
            return;
        };

        if quantity <= 1 {
            self.remove_item(product);
            return;
        }

        if let Some(line) = self.find_mut(product) {
            line.quantity = quantity - 1;
        }
        self.committed();
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.committed();
    }

    /// Derives the order-ready summary under the default pricing policy.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.summary_with(&PricingPolicy::default())
    }

    /// Derives the order-ready summary under the given pricing policy.
    #[must_use]
    pub fn summary_with(&self, policy: &PricingPolicy) -> CartSummary {
        summarize(&self.lines, policy)
    }

    /// Groups the lines by owning shop, preserving insertion order.
    #[must_use]
    pub fn grouped_by_shop(&self) -> Vec<ShopGroup<'_>> {
        grouped_by_shop(&self.lines)
    }

    /// Number of distinct shops represented in the cart.
    #[must_use]
    pub fn distinct_shop_count(&self) -> usize {
        self.grouped_by_shop().len()
    }

    /// Whether the cart spans more than one shop. Informational; the
    /// checkout policy for mixed-shop carts belongs to the caller.
    #[must_use]
    pub fn is_mixed_shop(&self) -> bool {
        self.distinct_shop_count() > 1
    }

    /// Returns the ids whose cart quantity exceeds the fresh stock truth.
    ///
    /// Ids absent from the map are treated as stock 0 (delisted products are
    /// not sellable). The cart is never auto-corrected; the caller decides
    /// whether to clamp or prompt.
    #[must_use]
    pub fn validate_against_stock(&self, stock: &FxHashMap<ProductId, u32>) -> Vec<ProductId> {
        self.lines
            .iter()
            .filter(|line| line.quantity > stock.get(&line.product_id).copied().unwrap_or(0))
            .map(|line| line.product_id.clone())
            .collect()
    }

    fn find(&self, product: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product)
    }

    fn find_mut(&mut self, product: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product)
    }

    /// Records a successful mutation: clears the error slot and advances the
    /// last-modified stamp monotonically.
    fn committed(&mut self) {
        self.last_error = None;

        let now = Timestamp::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    fn reject(&mut self, error: CartError) -> Result<(), CartError> {
        self.last_error = Some(error.clone());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, unit_price: MinorUnits, stock: u32) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::from(id),
            name: id.to_string(),
            unit_price,
            image: None,
            shop: "Corner Shop".to_string(),
            stock,
        }
    }

    fn assert_invariant(cart: &Cart) {
        for line in cart.lines() {
            assert!(line.quantity >= 1, "quantity floor violated: {line:?}");
            assert!(
                line.quantity <= line.stock,
                "stock ceiling violated: {line:?}"
            );
        }
    }

    #[test]
    fn add_inserts_then_increments() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 3);

        cart.add_item(&p1)?;
        cart.add_item(&p1)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(2));

        Ok(())
    }

    #[test]
    fn add_rejects_zero_stock_product() {
        let mut cart = Cart::new();
        let sold_out = product("p1", 10_000, 0);

        let result = cart.add_item(&sold_out);

        assert!(matches!(
            result,
            Err(CartError::StockLimitReached { stock: 0, .. })
        ));
        assert!(cart.is_empty());
        assert!(cart.last_error().is_some());
    }

    #[test]
    fn third_add_at_stock_two_is_rejected() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 2);

        cart.add_item(&p1)?;
        cart.add_item(&p1)?;
        let result = cart.add_item(&p1);

        assert!(matches!(
            result,
            Err(CartError::StockLimitReached { stock: 2, .. })
        ));
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(2));

        let summary = cart.summary();
        assert_eq!(summary.subtotal, 20_000);
        assert_eq!(summary.delivery_fee, 4_000);
        assert_eq!(summary.tax, 1_000);
        assert_eq!(summary.total, 25_000);

        Ok(())
    }

    #[test]
    fn error_slot_clears_on_next_successful_mutation() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 1);
        let p2 = product("p2", 5_000, 5);

        cart.add_item(&p1)?;
        assert!(cart.add_item(&p1).is_err());
        assert!(cart.last_error().is_some());

        cart.add_item(&p2)?;
        assert!(cart.last_error().is_none());

        Ok(())
    }

    #[test]
    fn remove_absent_product_is_a_noop() {
        let mut cart = Cart::new();

        cart.remove_item(&ProductId::from("ghost"));

        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_zero_removes_the_line() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 3);

        cart.add_item(&p1)?;
        cart.set_quantity(&p1.id, 0)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_above_stock_leaves_state_unchanged() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 3);

        cart.add_item(&p1)?;
        let result = cart.set_quantity(&p1.id, 4);

        assert!(matches!(
            result,
            Err(CartError::QuantityExceedsStock {
                requested: 4,
                stock: 3,
                ..
            })
        ));
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(1));
        assert_invariant(&cart);

        Ok(())
    }

    #[test]
    fn set_quantity_exact_within_stock() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 3);

        cart.add_item(&p1)?;
        cart.set_quantity(&p1.id, 3)?;

        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(3));

        Ok(())
    }

    #[test]
    fn decrement_quantity_one_removes_the_line() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 3);

        cart.add_item(&p1)?;
        cart.decrement(&p1.id);

        assert!(cart.is_empty());
        assert_eq!(cart.summary().item_count, 0);

        Ok(())
    }

    #[test]
    fn insertion_order_is_stable_across_updates() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 5);
        let p2 = product("p2", 2_000, 5);
        let p3 = product("p3", 3_000, 5);

        cart.add_item(&p1)?;
        cart.add_item(&p2)?;
        cart.add_item(&p3)?;
        cart.set_quantity(&p2.id, 4)?;
        cart.increment(&p1.id)?;

        let order: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product_id.as_str())
            .collect();
        assert_eq!(order, ["p1", "p2", "p3"]);

        Ok(())
    }

    #[test]
    fn clear_empties_everything() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&product("p1", 10_000, 5))?;
        cart.add_item(&product("p2", 2_000, 5))?;
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.summary().total, 0);

        Ok(())
    }

    #[test]
    fn updated_at_never_moves_backwards() -> TestResult {
        let mut cart = Cart::new();
        let before = cart.updated_at();

        cart.add_item(&product("p1", 10_000, 5))?;

        assert!(cart.updated_at() >= before, "timestamp moved backwards");

        Ok(())
    }

    #[test]
    fn validate_against_stock_reports_offenders_only() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 5);
        let p2 = product("p2", 2_000, 5);

        cart.add_item(&p1)?;
        cart.set_quantity(&p1.id, 3)?;
        cart.add_item(&p2)?;

        let mut fresh = FxHashMap::default();
        fresh.insert(p1.id.clone(), 2u32);
        fresh.insert(p2.id.clone(), 5u32);

        assert_eq!(cart.validate_against_stock(&fresh), [p1.id.clone()]);

        Ok(())
    }

    #[test]
    fn validate_treats_missing_ids_as_delisted() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 5);

        cart.add_item(&p1)?;

        let offenders = cart.validate_against_stock(&FxHashMap::default());

        assert_eq!(offenders, [p1.id.clone()]);

        Ok(())
    }

    #[test]
    fn mixed_shop_detection() -> TestResult {
        let mut cart = Cart::new();
        let mut from_dairy = product("milk", 2_000, 5);
        from_dairy.shop = "Dairy".to_string();

        cart.add_item(&product("bread", 1_000, 5))?;
        assert!(!cart.is_mixed_shop());

        cart.add_item(&from_dairy)?;
        assert!(cart.is_mixed_shop());
        assert_eq!(cart.distinct_shop_count(), 2);

        Ok(())
    }

    #[test]
    fn restore_drops_zero_quantity_lines() {
        let lines = vec![
            CartLine {
                product_id: ProductId::from("p1"),
                name: "p1".to_string(),
                unit_price: 1_000,
                image: None,
                shop: "Corner Shop".to_string(),
                quantity: 0,
                stock: 5,
            },
            CartLine {
                product_id: ProductId::from("p2"),
                name: "p2".to_string(),
                unit_price: 2_000,
                image: None,
                shop: "Corner Shop".to_string(),
                quantity: 2,
                stock: 5,
            },
        ];

        let cart = Cart::restore(lines, Timestamp::now());

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.lines().first().map(|l| l.product_id.as_str()),
            Some("p2")
        );
    }

    #[test]
    fn invariant_holds_under_mixed_mutation_sequence() -> TestResult {
        let mut cart = Cart::new();
        let p1 = product("p1", 10_000, 2);
        let p2 = product("p2", 500, 4);

        cart.add_item(&p1)?;
        assert_invariant(&cart);

        cart.add_item(&p1)?;
        assert!(cart.add_item(&p1).is_err(), "stock 2 caps the third add");
        assert_invariant(&cart);

        cart.add_item(&p2)?;
        assert!(cart.set_quantity(&p2.id, 9).is_err(), "9 exceeds stock 4");
        assert_invariant(&cart);

        cart.set_quantity(&p2.id, 4)?;
        cart.decrement(&p2.id);
        cart.decrement(&p1.id);
        cart.decrement(&p1.id);
        assert_invariant(&cart);

        cart.increment(&p2.id)?;
        assert_invariant(&cart);

        Ok(())
    }
}
