use axum::http::StatusCode;
use serde_json::json;

use crate::tests::fixtures::{project_json, TeamMemberFixture};
use crate::tests::helpers::*;
use crate::tests::TestContext;

#[tokio::test]
async fn test_create_project_with_assignments() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("50")).await;
    let bob = create_member(&ctx, TeamMemberFixture::monthly("4400")).await;

    let response = ctx.post("/api/projects", project_json(client, &[alice, bob])).await;
    assert_status(&response, StatusCode::CREATED);
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["client"]["id"], client);

    let assigned: Vec<i64> = response.body["projectAssignments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["teamMember"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(assigned, vec![alice, bob]);

    let project = id_of(&response.body);
    let assignments = ctx.get(&format!("/api/project-assignments/{}", project)).await;
    assert_status(&assignments, StatusCode::OK);
    assert_eq!(assignments.body.as_array().unwrap().len(), 2);
    assert_eq!(assignments.body[0]["projectId"], project);
}

#[tokio::test]
async fn test_update_replaces_assignments_only_when_given() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("50")).await;
    let bob = create_member(&ctx, TeamMemberFixture::hourly("60")).await;
    let project = create_project(&ctx, client, &[alice]).await;
    let uri = format!("/api/projects/{}", project);

    let renamed = ctx.put(&uri, json!({"projectName": "Renamed", "status": "in_progress"})).await;
    assert_status(&renamed, StatusCode::OK);
    assert_eq!(renamed.body["projectName"], "Renamed");
    assert_eq!(renamed.body["status"], "in_progress");
    assert_eq!(renamed.body["projectAssignments"].as_array().unwrap().len(), 1);

    let reassigned = ctx.put(&uri, json!({"teamMemberIds": [bob]})).await;
    assert_status(&reassigned, StatusCode::OK);
    let members = reassigned.body["projectAssignments"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["teamMember"]["id"], bob);

    let cleared = ctx.put(&uri, json!({"teamMemberIds": []})).await;
    assert!(cleared.body["projectAssignments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_projects_by_client() {
    let ctx = TestContext::new();
    let acme = create_client(&ctx).await;
    let globex = create_client(&ctx).await;
    let web = create_project(&ctx, acme, &[]).await;
    let app = create_project(&ctx, acme, &[]).await;
    create_project(&ctx, globex, &[]).await;

    let response = ctx.get(&format!("/api/projects/by-client/{}", acme)).await;
    assert_status(&response, StatusCode::OK);
    let ids: Vec<i64> = response.body.as_array().unwrap().iter().map(id_of).collect();
    assert_eq!(ids, vec![web, app]);
    assert_eq!(response.body[0]["client"]["id"], acme);
}

#[tokio::test]
async fn test_project_validation_and_references() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;

    let mut payload = project_json(client, &[]);
    payload["endDate"] = json!("2023-12-31");
    let response = ctx.post("/api/projects", payload).await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["details"]["startDate"].is_array());

    let response = ctx.post("/api/projects", project_json(999, &[])).await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Client not found");

    let response = ctx.post("/api/projects", project_json(client, &[77])).await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Team member not found");
    assert!(ctx.get("/api/projects").await.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_checks_dates_against_stored_row() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let project = create_project(&ctx, client, &[]).await;

    // Stored start date is 2024-01-01
    let response = ctx
        .put(&format!("/api/projects/{}", project), json!({"endDate": "2023-06-30"}))
        .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let response = ctx.put("/api/projects/999", json!({"projectName": "Ghost"})).await;
    assert_status(&response, StatusCode::NOT_FOUND);
}
