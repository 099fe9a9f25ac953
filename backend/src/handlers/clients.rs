use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use billable_shared::{Client, ClientCreate, ClientUpdate};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::validation::{Validator, MAX_NAME_LENGTH};
use crate::AppState;

pub fn client_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
}

async fn list_clients(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.store.list_clients().await?))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Client>> {
    state
        .store
        .get_client(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client"))
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClientCreate>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    Validator::new()
        .required(&payload.client_name, "clientName")
        .max_length(Some(&payload.client_name), "clientName", MAX_NAME_LENGTH)
        .required(&payload.email, "email")
        .email(Some(&payload.email), "email")
        .finish()?;

    let client = state.store.create_client(payload).await?;
    tracing::info!(client_id = client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ClientUpdate>,
) -> ApiResult<Json<Client>> {
    Validator::new()
        .not_blank(payload.client_name.as_deref(), "clientName")
        .max_length(payload.client_name.as_deref(), "clientName", MAX_NAME_LENGTH)
        .email(payload.email.as_deref(), "email")
        .finish()?;

    state
        .store
        .update_client(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client"))
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_client(id).await? {
        return Err(ApiError::not_found("Client"));
    }
    tracing::info!(client_id = id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
