//! HTTP route handlers for the log server.
//!
//! Bodies are read as raw bytes and decoded as JSON regardless of the
//! `Content-Type` header, so clients that send a JSON body on `GET` without
//! declaring it are still served. Only the first JSON value in a body is
//! decoded; anything after it is ignored.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use proglog_log::RecordLog;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ConsumeRequest, ConsumeResponse, ProduceRequest, ProduceResponse};
use crate::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<dyn RecordLog>,
}

impl AppState {
    pub fn new(log: Arc<dyn RecordLog>) -> Self {
        Self { log }
    }
}

/// Decode the first JSON value in `body`
fn decode_first<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    match serde_json::Deserializer::from_slice(body).into_iter::<T>().next() {
        Some(value) => Ok(value?),
        None => Err(ApiError::BadRequest("EOF".to_string())),
    }
}

/// Handle POST /
///
/// Decodes `{"record": ...}`, appends the record and returns
/// `{"offset": n}`.
pub async fn handle_produce(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProduceResponse>, ApiError> {
    let request: ProduceRequest = decode_first(&body)?;

    let offset = state.log.append(request.record)?;
    debug!(offset, "Produced record");

    Ok(Json(ProduceResponse { offset }))
}

/// Handle GET /
///
/// Decodes `{"offset": n}` and returns `{"record": ...}`, or 404 when the
/// offset has not been written.
pub async fn handle_consume(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ConsumeResponse>, ApiError> {
    let request: ConsumeRequest = decode_first(&body)?;

    let record = state.log.read(request.offset)?;
    debug!(offset = request.offset, "Consumed record");

    Ok(Json(ConsumeResponse { record }))
}
