use serde::Serialize;

/// Current known state of a product.
///
/// Fields that no event has set yet keep their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    pub product_id: String,
    pub price: f64,
    pub stock: u32,
}

impl Product {
    #[cfg(test)]
    pub fn new(product_id: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            product_id: product_id.into(),
            price,
            stock,
        }
    }
}
