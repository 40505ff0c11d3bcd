/// Upper bound accepted for a price at ingress.
pub const MAX_PRICE: f64 = 1e9;
/// Upper bound accepted for a stock level at ingress.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// One requested change to a product.
///
/// At least one of `price` / `stock` is expected to be present; that is checked
/// by the ingress layer before the event reaches the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEvent {
    pub product_id: String,
    pub price: Option<f64>,
    pub stock: Option<u32>,
}

impl UpdateEvent {
    pub fn new(product_id: impl Into<String>, price: Option<f64>, stock: Option<u32>) -> Self {
        Self {
            product_id: product_id.into(),
            price,
            stock,
        }
    }

    #[cfg(test)]
    pub fn price(product_id: impl Into<String>, price: f64) -> Self {
        Self::new(product_id, Some(price), None)
    }

    #[cfg(test)]
    pub fn stock(product_id: impl Into<String>, stock: u32) -> Self {
        Self::new(product_id, None, Some(stock))
    }
}
