//! Money conventions
//!
//! All amounts in this crate are whole minor units (paise, pence, cents).
//! Fractional arithmetic such as tax goes through [`Decimal`] and is rounded
//! back to minor units before it re-enters any total.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};

/// A monetary amount in minor units of the display currency.
pub type MinorUnits = i64;

/// Formats a minor-unit amount as a display string in the given currency.
#[must_use]
pub fn format_minor(amount: MinorUnits, currency: &'static Currency) -> String {
    Money::from_minor(amount, currency).to_string()
}

/// Calculates a percentage of a minor-unit amount, rounded half-away-from-zero
/// to whole minor units.
#[must_use]
pub fn percent_of_minor(percent: Percentage, minor: MinorUnits) -> MinorUnits {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let applied = percent * minor;
    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().unwrap_or(0)
}
