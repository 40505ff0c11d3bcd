use tracing::warn;

use crate::domain::{Product, UpdateEvent, MAX_PRICE, MAX_STOCK};
use crate::store_framework::Entity;

impl Entity for Product {
    type Id = String;
    type Patch = UpdateEvent;

    fn patch_target(event: &UpdateEvent) -> &String {
        &event.product_id
    }

    /// A product nobody has priced or stocked yet.
    fn from_id(id: String) -> Self {
        Self {
            product_id: id,
            ..Self::default()
        }
    }

    /// Merges the price and/or stock carried by the event.
    ///
    /// # Fields Updated
    /// - `price`: only when the event carries one
    /// - `stock`: only when the event carries one
    ///
    /// Values outside the ingress bounds are still applied; they are only logged.
    fn on_update(&mut self, event: &UpdateEvent) {
        if let Some(price) = event.price {
            if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
                warn!(product_id = %self.product_id, price, "Applying out-of-range price");
            }
            self.price = price;
        }
        if let Some(stock) = event.stock {
            if i64::from(stock) > MAX_STOCK {
                warn!(product_id = %self.product_id, stock, "Applying out-of-range stock");
            }
            self.stock = stock;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{Product, UpdateEvent};
    use crate::product_store::ProductStore;

    #[test]
    fn test_partial_update() {
        let store = ProductStore::new();

        store.apply(&UpdateEvent::price("abc", 10.0));
        store.apply(&UpdateEvent::stock("abc", 5));
        assert_eq!(store.get("abc"), Some(Product::new("abc", 10.0, 5)));

        store.apply(&UpdateEvent::price("abc", 20.0));
        assert_eq!(store.get("abc"), Some(Product::new("abc", 20.0, 5)));
    }

    #[test]
    fn test_creation_on_first_write() {
        let store = ProductStore::new();
        assert_eq!(store.get("fresh"), None);

        store.apply(&UpdateEvent::stock("fresh", 7));
        let product = store.get("fresh").expect("product should exist after first apply");
        assert_eq!(product.product_id, "fresh");
        assert_eq!(product.stock, 7);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let store = ProductStore::new();
        store.apply(&UpdateEvent::new("abc", Some(3.5), Some(2)));

        let first = store.get("abc");
        let second = store.get("abc");
        assert_eq!(first, second);
    }

    #[test]
    fn test_event_with_both_fields_applies_together() {
        let store = ProductStore::new();
        store.apply(&UpdateEvent::new("abc", Some(1.0), Some(1)));
        store.apply(&UpdateEvent::new("abc", Some(2.0), Some(2)));
        assert_eq!(store.get("abc"), Some(Product::new("abc", 2.0, 2)));
    }

    #[test]
    fn test_out_of_range_values_do_not_panic() {
        let store = ProductStore::new();
        store.apply(&UpdateEvent::price("weird", -1.0));
        store.apply(&UpdateEvent::price("weird", f64::NAN));
        store.apply(&UpdateEvent::stock("weird", u32::MAX));

        let product = store.get("weird").unwrap();
        assert!(product.price.is_nan());
        assert_eq!(product.stock, u32::MAX);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_keep_their_last_write() {
        use std::sync::Arc;

        let store = Arc::new(ProductStore::new());
        let mut handles = Vec::new();
        for writer in 0..8u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let id = format!("p{writer}");
                for v in 1..=100u32 {
                    store.apply(&UpdateEvent::new(id.clone(), Some(f64::from(v)), Some(v)));
                    // Reads of other writers' keys interleave with the writes.
                    let _ = store.get(format!("p{}", (writer + 1) % 8).as_str());
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 8);
        for writer in 0..8u32 {
            let product = store.get(format!("p{writer}").as_str()).unwrap();
            assert_eq!(product, Product::new(format!("p{writer}"), 100.0, 100));
        }
    }
}
