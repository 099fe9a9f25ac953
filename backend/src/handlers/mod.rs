use axum::{http::StatusCode, response::Json};
use serde_json::json;

pub mod clients;
pub mod invoices;
pub mod projects;
pub mod team_members;
pub mod time_entries;

pub use clients::client_routes;
pub use invoices::invoice_routes;
pub use projects::{project_assignment_routes, project_routes};
pub use team_members::team_member_routes;
pub use time_entries::time_entry_routes;

pub async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({"status": "healthy", "service": env!("CARGO_PKG_NAME")})),
    )
}
