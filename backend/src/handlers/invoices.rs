use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use billable_shared::{GenerateInvoiceRequest, Invoice, InvoiceStatusUpdate, InvoiceWithDetails};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::invoicing::InvoiceGenerator;
use crate::AppState;

pub fn invoice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/generate", post(generate_invoice))
        .route("/:id", get(get_invoice).delete(delete_invoice))
        .route("/:id/status", put(update_invoice_status))
}

async fn list_invoices(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InvoiceWithDetails>>> {
    Ok(Json(state.store.list_invoices().await?))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<InvoiceWithDetails>> {
    state
        .store
        .get_invoice(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Invoice"))
}

/// Build and persist an invoice from the client's logged time
async fn generate_invoice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<InvoiceWithDetails>)> {
    let invoice = InvoiceGenerator::new(&*state.store)
        .generate(&request)
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn update_invoice_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<InvoiceStatusUpdate>,
) -> ApiResult<Json<Invoice>> {
    let invoice = state
        .store
        .update_invoice_status(id, payload.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice"))?;

    tracing::info!(
        invoice_id = id,
        invoice_number = %invoice.invoice_number,
        status = invoice.status.as_str(),
        "Invoice status updated"
    );
    Ok(Json(invoice))
}

async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_invoice(id).await? {
        return Err(ApiError::not_found("Invoice"));
    }
    tracing::info!(invoice_id = id, "Invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}
