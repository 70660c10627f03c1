//! Haat
//!
//! Haat is the pricing, stock-consistency and geo-proximity core for a
//! multi-vendor local-commerce storefront. It owns the shopping cart state
//! and its derived order summary, ranks geo-tagged shops and delivery
//! candidates by great-circle distance, and bridges cart state to a durable
//! per-client snapshot store. Page rendering, auth, payments and catalog
//! storage are external collaborators reached through trait seams.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod geo;
pub mod money;
pub mod persist;
pub mod prelude;
pub mod products;
