//! Cart summary
//!
//! The order-ready projection of a cart: subtotal, delivery fee, tax and
//! total. A summary is a pure function of the line list and a pricing
//! policy; it is recomputed on every read and never stored.

use decimal_percentage::Percentage;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    cart::CartLine,
    money::{MinorUnits, format_minor, percent_of_minor},
};

/// Pricing knobs applied when deriving a [`CartSummary`].
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    /// Subtotal at or above which delivery is free (inclusive).
    pub free_delivery_threshold: MinorUnits,

    /// Flat delivery fee charged below the threshold.
    pub delivery_fee: MinorUnits,

    /// Tax rate applied to the subtotal.
    pub tax_rate: Percentage,
}

impl Default for PricingPolicy {
    /// Free delivery from 500.00 (inclusive), a flat 40.00 fee below it,
    /// and 5% tax.
    fn default() -> Self {
        Self {
            free_delivery_threshold: 50_000,
            delivery_fee: 4_000,
            tax_rate: Percentage::from(0.05),
        }
    }
}

/// Derived pricing totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of line quantities.
    pub item_count: u32,

    /// Sum of unit price × quantity across all lines.
    pub subtotal: MinorUnits,

    /// Delivery fee after applying the free-delivery threshold.
    pub delivery_fee: MinorUnits,

    /// Tax on the subtotal.
    pub tax: MinorUnits,

    /// Coupon discount. Always zero for now; reserved for coupon logic.
    pub discount: MinorUnits,

    /// `subtotal + delivery_fee + tax - discount`.
    pub total: MinorUnits,
}

impl CartSummary {
    /// Renders every amount as a display string in the given currency.
    #[must_use]
    pub fn formatted(&self, currency: &'static Currency) -> FormattedSummary {
        FormattedSummary {
            subtotal: format_minor(self.subtotal, currency),
            delivery_fee: format_minor(self.delivery_fee, currency),
            tax: format_minor(self.tax, currency),
            total: format_minor(self.total, currency),
        }
    }
}

/// A [`CartSummary`] formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSummary {
    /// Formatted subtotal.
    pub subtotal: String,

    /// Formatted delivery fee.
    pub delivery_fee: String,

    /// Formatted tax.
    pub tax: String,

    /// Formatted total.
    pub total: String,
}

/// Derives the summary for a list of cart lines under the given policy.
///
/// An empty cart summarizes to all zeroes: there is nothing to deliver, so
/// the flat fee is not charged.
#[must_use]
pub fn summarize(lines: &[CartLine], policy: &PricingPolicy) -> CartSummary {
    if lines.is_empty() {
        return CartSummary {
            item_count: 0,
            subtotal: 0,
            delivery_fee: 0,
            tax: 0,
            discount: 0,
            total: 0,
        };
    }

    let item_count = lines.iter().map(|line| line.quantity).sum();
    let subtotal: MinorUnits = lines.iter().map(CartLine::line_total).sum();

    let delivery_fee = if subtotal >= policy.free_delivery_threshold {
        0
    } else {
        policy.delivery_fee
    };

    let tax = percent_of_minor(policy.tax_rate, subtotal);
    let discount = 0;

    CartSummary {
        item_count,
        subtotal,
        delivery_fee,
        tax,
        discount,
        total: subtotal + delivery_fee + tax - discount,
    }
}
