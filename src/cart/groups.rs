//! Shop groups
//!
//! Groups cart lines by their owning shop, preserving insertion order both
//! across and within groups. Whether a mixed-shop cart is split, blocked or
//! allowed at checkout is the integrating application's policy; this module
//! only reports the grouping.

use crate::cart::CartLine;

/// The lines belonging to a single shop, in cart insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopGroup<'a> {
    /// Shop name.
    pub shop: &'a str,

    /// Lines owned by this shop.
    pub lines: Vec<&'a CartLine>,
}

/// Groups lines by owning shop. Shops appear in the order of their first
/// line; lines keep their relative order within each group.
#[must_use]
pub fn grouped_by_shop(lines: &[CartLine]) -> Vec<ShopGroup<'_>> {
    let mut groups: Vec<ShopGroup<'_>> = Vec::new();

    for line in lines {
        if let Some(group) = groups.iter_mut().find(|group| group.shop == line.shop) {
            group.lines.push(line);
        } else {
            groups.push(ShopGroup {
                shop: &line.shop,
                lines: vec![line],
            });
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use crate::products::ProductId;

    use super::*;

    fn line(id: &str, shop: &str) -> CartLine {
        CartLine {
            product_id: ProductId::from(id),
            name: id.to_string(),
            unit_price: 1_000,
            image: None,
            shop: shop.to_string(),
            quantity: 1,
            stock: 5,
        }
    }

    #[test]
    fn groups_preserve_first_appearance_order() {
        let lines = [
            line("bread", "Bakery"),
            line("milk", "Dairy"),
            line("croissant", "Bakery"),
        ];

        let groups = grouped_by_shop(&lines);

        assert_eq!(groups.len(), 2);

        let shops: Vec<&str> = groups.iter().map(|group| group.shop).collect();
        assert_eq!(shops, ["Bakery", "Dairy"]);

        let bakery: Vec<&str> = groups
            .iter()
            .find(|group| group.shop == "Bakery")
            .map(|group| {
                group
                    .lines
                    .iter()
                    .map(|line| line.product_id.as_str())
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(bakery, ["bread", "croissant"]);
    }

    #[test]
    fn empty_lines_yield_no_groups() {
        assert!(grouped_by_shop(&[]).is_empty());
    }
}
