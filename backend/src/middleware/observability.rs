use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request, Response, StatusCode},
    middleware::Next,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags every request with an id and logs method, route, status and latency
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());
    let started = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%request_id, %method, %path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%request_id, %method, %path, status = status.as_u16(), elapsed_ms, "Request rejected");
    } else {
        tracing::info!(%request_id, %method, %path, status = status.as_u16(), elapsed_ms, "Request completed");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Group similar endpoints: `/api/invoices/12/status` -> `/api/invoices/:id/status`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.parse::<i64>().is_ok() {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<Utc>,
    pub version: &'static str,
    pub services: HashMap<&'static str, ServiceStatus>,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub backend: &'static str,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Storage ping with timing; 503 when the store is unreachable
pub async fn detailed_health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthCheckResponse>) {
    let started = Instant::now();
    let ping = state.store.ping().await;

    let storage = ServiceStatus {
        status: if ping.is_ok() { "healthy" } else { "unhealthy" },
        backend: state.store.backend_name(),
        response_time_ms: started.elapsed().as_millis() as u64,
        error: ping.as_ref().err().map(|e| e.to_string()),
    };
    if let Err(e) = &ping {
        tracing::error!(error = %e, "Storage health check failed");
    }

    let (code, status) = match ping {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (
        code,
        Json(HealthCheckResponse {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            services: HashMap::from([("storage", storage)]),
        }),
    )
}
