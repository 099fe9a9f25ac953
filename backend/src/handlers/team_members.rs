use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use billable_shared::{TeamMember, TeamMemberCreate, TeamMemberUpdate};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::validation::{Validator, MAX_NAME_LENGTH};
use crate::AppState;

pub fn team_member_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_team_members).post(create_team_member))
        .route(
            "/:id",
            get(get_team_member)
                .put(update_team_member)
                .delete(delete_team_member),
        )
}

async fn list_team_members(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    Ok(Json(state.store.list_team_members().await?))
}

async fn get_team_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<TeamMember>> {
    state
        .store
        .get_team_member(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Team member"))
}

async fn create_team_member(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TeamMemberCreate>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    Validator::new()
        .required(&payload.name, "name")
        .max_length(Some(&payload.name), "name", MAX_NAME_LENGTH)
        .required(&payload.email, "email")
        .email(Some(&payload.email), "email")
        .required(&payload.role, "role")
        .amount(Some(&payload.rate), "rate")
        .finish()?;

    let member = state.store.create_team_member(payload).await?;
    tracing::info!(
        team_member_id = member.id,
        billing_type = %member.billing_type,
        "Team member created"
    );
    Ok((StatusCode::CREATED, Json(member)))
}

async fn update_team_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TeamMemberUpdate>,
) -> ApiResult<Json<TeamMember>> {
    Validator::new()
        .not_blank(payload.name.as_deref(), "name")
        .max_length(payload.name.as_deref(), "name", MAX_NAME_LENGTH)
        .email(payload.email.as_deref(), "email")
        .not_blank(payload.role.as_deref(), "role")
        .amount(payload.rate.as_ref(), "rate")
        .finish()?;

    state
        .store
        .update_team_member(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Team member"))
}

async fn delete_team_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_team_member(id).await? {
        return Err(ApiError::not_found("Team member"));
    }
    Ok(StatusCode::NO_CONTENT)
}
