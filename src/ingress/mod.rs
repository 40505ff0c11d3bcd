//! Thin HTTP layer: decodes and validates update events, renders lookups.

pub mod dtos;
pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::watch;

use crate::app_system::ShutdownPhase;
use crate::clients::ProductClient;

/// Shared state of every handler.
#[derive(Clone)]
pub struct IngressState {
    pub client: ProductClient,
    pub phase: watch::Receiver<ShutdownPhase>,
}

pub fn router(state: IngressState) -> Router {
    Router::new()
        .route("/events", post(handlers::post_event))
        .route("/products/", get(handlers::missing_product_id))
        .route("/products/{*id}", get(handlers::get_product))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
