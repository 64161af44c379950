//! Request logging middleware

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::context::{RequestId, REQUEST_ID_HEADER};
use crate::state::AppState;

const SLOW_REQUEST: Duration = Duration::from_millis(100);

/// Tag the request with an id, then log it with its status and latency
pub async fn logging_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    tracing::info!(%method, %uri, request_id = %request_id, "Request");

    let start = Instant::now();
    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if duration > SLOW_REQUEST {
        tracing::warn!(%method, %uri, ?duration, "Slow request");
    }

    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        duration_ms = duration.as_millis() as u64,
        uptime_seconds = state.uptime_seconds(),
        "Response"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    Ok(response)
}
