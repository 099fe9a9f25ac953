use axum::http::StatusCode;
use serde_json::{json, Value};

use super::fixtures::{project_json, time_entry_json, ClientFixture, TeamMemberFixture};
use super::{TestContext, TestResponse};

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("response has an integer id")
}

pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "unexpected status, body: {}",
        response.body
    );
}

pub async fn create_client(ctx: &TestContext) -> i64 {
    let response = ctx.post("/api/clients", ClientFixture::default().to_json()).await;
    assert_status(&response, StatusCode::CREATED);
    id_of(&response.body)
}

pub async fn create_member(ctx: &TestContext, member: TeamMemberFixture) -> i64 {
    let response = ctx.post("/api/team-members", member.to_json()).await;
    assert_status(&response, StatusCode::CREATED);
    id_of(&response.body)
}

pub async fn create_project(ctx: &TestContext, client_id: i64, team_member_ids: &[i64]) -> i64 {
    let response = ctx
        .post("/api/projects", project_json(client_id, team_member_ids))
        .await;
    assert_status(&response, StatusCode::CREATED);
    id_of(&response.body)
}

pub async fn log_time(
    ctx: &TestContext,
    project_id: i64,
    team_member_id: i64,
    date: &str,
    hours: &str,
) -> i64 {
    let response = ctx
        .post(
            "/api/time-entries",
            time_entry_json(project_id, team_member_id, date, hours),
        )
        .await;
    assert_status(&response, StatusCode::CREATED);
    id_of(&response.body)
}

pub async fn generate(
    ctx: &TestContext,
    client_id: i64,
    project_id: Option<i64>,
    date_from: &str,
    date_to: &str,
) -> TestResponse {
    ctx.post(
        "/api/invoices/generate",
        json!({
            "clientId": client_id,
            "projectId": project_id,
            "dateFrom": date_from,
            "dateTo": date_to,
        }),
    )
    .await
}

/// Line items keyed by the member name at the start of their description
pub fn line_for<'a>(invoice: &'a Value, member_name: &str) -> &'a Value {
    invoice["lineItems"]
        .as_array()
        .expect("lineItems array")
        .iter()
        .find(|item| {
            item["description"]
                .as_str()
                .is_some_and(|d| d.starts_with(&format!("{} - ", member_name)))
        })
        .unwrap_or_else(|| panic!("no line item for {}", member_name))
}
