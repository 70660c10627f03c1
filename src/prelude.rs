//! Haat prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartError, CartLine, CartSummary, FormattedSummary, PricingPolicy, ShopGroup,
        grouped_by_shop, summarize,
    },
    catalog::{CatalogError, StockLookup, revalidate},
    checkout::{
        CheckoutError, DeliveryAddress, OrderDraft, OrderGateway, OrderId, PaymentMethod, checkout,
    },
    geo::{EARTH_RADIUS_KM, GeoPoint, Located, Ranked, Ranking, rank},
    money::{MinorUnits, format_minor, percent_of_minor},
    persist::{
        CartBridge, CartSnapshot, JsonFileStore, MemoryStore, PersistError, SnapshotStore,
        StoreError,
    },
    products::{ProductId, ProductSnapshot},
};
