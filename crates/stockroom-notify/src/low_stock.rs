// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-stock detection.
//!
//! A product is low on stock when its quantity is strictly below its minimum
//! threshold. Products without a threshold are never flagged, and products
//! with a missing or negative quantity are left out rather than reported as
//! errors.

use stockroom_core::Product;

/// Whether `product` is below its minimum stock threshold.
pub fn is_low_stock(product: &Product) -> bool {
    match (product.quantity, product.min_stock_level) {
        (Some(quantity), Some(threshold)) if quantity >= 0 && threshold >= 0 => {
            quantity < threshold
        }
        _ => false,
    }
}

/// The low-stock subset of `products`, in input order.
pub fn detect_low_stock<'a, I>(products: I) -> Vec<Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .filter(|p| is_low_stock(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: i64, quantity: Option<i64>, threshold: Option<i64>) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            sku: format!("SKU-{id}"),
            quantity,
            min_stock_level: threshold,
            ..Default::default()
        }
    }

    #[test]
    fn strictly_below_threshold_is_low() {
        assert!(is_low_stock(&product(1, Some(2), Some(5))));
        assert!(!is_low_stock(&product(2, Some(5), Some(5))));
        assert!(!is_low_stock(&product(3, Some(9), Some(5))));
    }

    #[test]
    fn missing_threshold_is_never_low() {
        assert!(!is_low_stock(&product(1, Some(0), None)));
    }

    #[test]
    fn malformed_quantity_is_excluded() {
        assert!(!is_low_stock(&product(1, None, Some(5))));
        assert!(!is_low_stock(&product(2, Some(-1), Some(5))));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(detect_low_stock(&[]).is_empty());
    }

    #[test]
    fn keeps_input_order() {
        let products = vec![
            product(3, Some(0), Some(1)),
            product(1, Some(10), Some(1)),
            product(2, Some(0), Some(4)),
        ];
        let ids: Vec<i64> = detect_low_stock(&products).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    fn arb_product() -> impl Strategy<Value = Product> {
        (
            0i64..1000,
            proptest::option::of(-2i64..50),
            proptest::option::of(0i64..50),
        )
            .prop_map(|(id, quantity, threshold)| product(id, quantity, threshold))
    }

    proptest! {
        #[test]
        fn result_is_exactly_the_strictly_below_subset(products in proptest::collection::vec(arb_product(), 0..40)) {
            let expected: Vec<Product> = products
                .iter()
                .filter(|p| matches!((p.quantity, p.min_stock_level), (Some(q), Some(t)) if q >= 0 && q < t))
                .cloned()
                .collect();
            prop_assert_eq!(detect_low_stock(&products), expected);
        }

        #[test]
        fn detection_is_idempotent(products in proptest::collection::vec(arb_product(), 0..40)) {
            let once = detect_low_stock(&products);
            let twice = detect_low_stock(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once, detect_low_stock(&products));
        }
    }
}
