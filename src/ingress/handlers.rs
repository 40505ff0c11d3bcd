use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::{debug, instrument};

use super::dtos::PostEventDto;
use super::error::IngressError;
use super::IngressState;

/// `POST /events`: validate, then queue. Waits while the queue is full.
#[instrument(skip(state, body))]
pub async fn post_event(
    State(state): State<IngressState>,
    body: Bytes,
) -> Result<impl IntoResponse, IngressError> {
    if !state.phase.borrow().accepts_events() {
        return Err(IngressError::ShuttingDown);
    }

    let dto: PostEventDto = serde_json::from_slice(&body).map_err(|_| IngressError::InvalidJson)?;
    let event = dto.into_event()?;

    state.client.submit_update(event).await?;
    debug!(queued = state.client.queue_len(), "Accepted update");
    Ok((StatusCode::ACCEPTED, "queued"))
}

/// `GET /products/{id}`. The id is the rest of the path, slashes included.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<IngressState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, IngressError> {
    state
        .client
        .get_product(&id)
        .map(Json)
        .ok_or(IngressError::NotFound)
}

/// `GET /products/` with no identifier.
pub async fn missing_product_id() -> IngressError {
    IngressError::MissingPathId
}

/// `GET /healthz`
pub async fn healthz() -> &'static str {
    "ok"
}
