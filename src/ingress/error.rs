use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::QueueError;

/// Errors the HTTP layer reports to clients as plain text.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IngressError {
    #[error("invalid json")]
    InvalidJson,
    #[error("product_id is required")]
    MissingProductId,
    #[error("at least one of price or stock is required")]
    NoFields,
    #[error("price out of range: {0:.6}")]
    PriceOutOfRange(f64),
    #[error("stock out of range: {0}")]
    StockOutOfRange(i64),
    #[error("missing product id")]
    MissingPathId,
    #[error("not found")]
    NotFound,
    #[error("shutting down")]
    ShuttingDown,
    #[error("queue closed")]
    QueueClosed,
}

impl From<QueueError> for IngressError {
    fn from(_: QueueError) -> Self {
        IngressError::QueueClosed
    }
}

impl IngressError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngressError::InvalidJson
            | IngressError::MissingProductId
            | IngressError::NoFields
            | IngressError::PriceOutOfRange(_)
            | IngressError::StockOutOfRange(_)
            | IngressError::MissingPathId => StatusCode::BAD_REQUEST,
            IngressError::NotFound => StatusCode::NOT_FOUND,
            IngressError::ShuttingDown | IngressError::QueueClosed => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Rejecting request");
        } else {
            debug!(error = %self, "Rejecting request");
        }
        (status, self.to_string()).into_response()
    }
}
