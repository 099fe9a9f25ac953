use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use billable_shared::{
    AssignmentWithMember, ProjectCreate, ProjectUpdate, ProjectWithClient, ProjectWithDetails,
};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::validation::{Validator, MAX_NAME_LENGTH};
use crate::AppState;

pub fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/by-client/:client_id", get(projects_by_client))
        .route("/:id", get(get_project).put(update_project).delete(delete_project))
}

/// Mounted at `/api/project-assignments`
pub fn project_assignment_routes() -> Router<Arc<AppState>> {
    Router::new().route("/:project_id", get(project_assignments))
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProjectWithDetails>>> {
    Ok(Json(state.store.list_projects().await?))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ProjectWithDetails>> {
    state
        .store
        .get_project(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project"))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProjectCreate>,
) -> ApiResult<(StatusCode, Json<ProjectWithDetails>)> {
    Validator::new()
        .required(&payload.project_name, "projectName")
        .max_length(Some(&payload.project_name), "projectName", MAX_NAME_LENGTH)
        .date_range(Some(payload.start_date), payload.end_date, "startDate", "endDate")
        .finish()?;

    let project = state.store.create_project(payload).await?;
    tracing::info!(
        project_id = project.project.id,
        client_id = project.project.client_id,
        assignments = project.project_assignments.len(),
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ProjectUpdate>,
) -> ApiResult<Json<ProjectWithDetails>> {
    let current = state
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;

    // Check the dates the row will hold after the partial update
    let start_date = payload.start_date.unwrap_or(current.project.start_date);
    let end_date = payload.end_date.or(current.project.end_date);
    Validator::new()
        .not_blank(payload.project_name.as_deref(), "projectName")
        .max_length(payload.project_name.as_deref(), "projectName", MAX_NAME_LENGTH)
        .date_range(Some(start_date), end_date, "startDate", "endDate")
        .finish()?;

    state
        .store
        .update_project(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project"))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_project(id).await? {
        return Err(ApiError::not_found("Project"));
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn projects_by_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i32>,
) -> ApiResult<Json<Vec<ProjectWithClient>>> {
    Ok(Json(state.store.projects_by_client(client_id).await?))
}

async fn project_assignments(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i32>,
) -> ApiResult<Json<Vec<AssignmentWithMember>>> {
    Ok(Json(state.store.project_assignments(project_id).await?))
}
