use serde::Deserialize;

use super::error::IngressError;
use crate::domain::{UpdateEvent, MAX_PRICE, MAX_STOCK};

/// Body of `POST /events`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostEventDto {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl PostEventDto {
    /// Checks the body and turns it into an event for the queue.
    ///
    /// # Errors
    /// Reports the first failed rule: identifier, field presence, price range, stock range.
    pub fn into_event(self) -> Result<UpdateEvent, IngressError> {
        let product_id = match self.product_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(IngressError::MissingProductId),
        };
        if self.price.is_none() && self.stock.is_none() {
            return Err(IngressError::NoFields);
        }
        if let Some(price) = self.price {
            if !(0.0..=MAX_PRICE).contains(&price) {
                return Err(IngressError::PriceOutOfRange(price));
            }
        }
        let stock = match self.stock {
            Some(stock) if !(0..=MAX_STOCK).contains(&stock) => {
                return Err(IngressError::StockOutOfRange(stock));
            }
            Some(stock) => Some(
                u32::try_from(stock).map_err(|_| IngressError::StockOutOfRange(stock))?,
            ),
            None => None,
        };

        Ok(UpdateEvent::new(product_id, self.price, stock))
    }
}
