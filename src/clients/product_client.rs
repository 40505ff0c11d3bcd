use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::{Product, UpdateEvent};
use crate::error::QueueError;
use crate::event_queue::EventQueue;
use crate::product_store::ProductStore;

/// Client handed to the ingress layer: submits events to the queue and reads the store.
#[derive(Clone)]
pub struct ProductClient {
    queue: Arc<EventQueue<UpdateEvent>>,
    store: Arc<ProductStore>,
}

impl ProductClient {
    pub fn new(queue: Arc<EventQueue<UpdateEvent>>, store: Arc<ProductStore>) -> Self {
        Self { queue, store }
    }

    /// Queues an already validated event, waiting while the queue is full.
    #[instrument(skip(self, event), fields(product_id = %event.product_id))]
    pub async fn submit_update(&self, event: UpdateEvent) -> Result<(), QueueError> {
        debug!("Submitting update");
        self.queue.enqueue(event).await
    }

    #[instrument(skip(self))]
    pub fn get_product(&self, id: &str) -> Option<Product> {
        let product = self.store.get(id);
        debug!(found = product.is_some(), "Looked up product");
        product
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}
