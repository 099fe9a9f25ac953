use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use billable_shared::{TimeEntryCreate, TimeEntryUpdate, TimeEntryWithDetails};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::invoicing::EntryFilter;
use crate::validation::Validator;
use crate::AppState;

pub fn time_entry_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_time_entries).post(create_time_entry))
        .route(
            "/:id",
            get(get_time_entry)
                .put(update_time_entry)
                .delete(delete_time_entry),
        )
}

/// `?projectId=&teamMemberId=&dateFrom=&dateTo=`, newest date first
async fn list_time_entries(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<EntryFilter>,
) -> ApiResult<Json<Vec<TimeEntryWithDetails>>> {
    Validator::new()
        .date_range(filter.date_from, filter.date_to, "dateFrom", "dateTo")
        .finish()?;

    Ok(Json(state.store.find_time_entries(&filter).await?))
}

async fn get_time_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<TimeEntryWithDetails>> {
    state
        .store
        .get_time_entry(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Time entry"))
}

async fn create_time_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TimeEntryCreate>,
) -> ApiResult<(StatusCode, Json<TimeEntryWithDetails>)> {
    Validator::new()
        .hours(Some(&payload.hours), "hours")
        .finish()?;

    let entry = state.store.create_time_entry(payload).await?;
    tracing::debug!(
        time_entry_id = entry.entry.id,
        team_member_id = entry.entry.team_member_id,
        hours = %entry.entry.hours,
        "Time entry logged"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_time_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TimeEntryUpdate>,
) -> ApiResult<Json<TimeEntryWithDetails>> {
    Validator::new()
        .hours(payload.hours.as_ref(), "hours")
        .finish()?;

    state
        .store
        .update_time_entry(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Time entry"))
}

async fn delete_time_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_time_entry(id).await? {
        return Err(ApiError::not_found("Time entry"));
    }
    Ok(StatusCode::NO_CONTENT)
}
