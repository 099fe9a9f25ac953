use axum::http::StatusCode;
use serde_json::json;

use crate::tests::fixtures::{time_entry_json, TeamMemberFixture};
use crate::tests::helpers::*;
use crate::tests::TestContext;

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array().unwrap().iter().map(id_of).collect()
}

#[tokio::test]
async fn test_list_filters_and_orders_by_date_desc() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("50")).await;
    let bob = create_member(&ctx, TeamMemberFixture::hourly("60")).await;
    let web = create_project(&ctx, client, &[alice, bob]).await;
    let app = create_project(&ctx, client, &[alice]).await;

    let jan05 = log_time(&ctx, web, alice, "2024-01-05", "4").await;
    let jan20 = log_time(&ctx, web, bob, "2024-01-20", "2").await;
    let feb02 = log_time(&ctx, app, alice, "2024-02-02", "1.5").await;

    let all = ctx.get("/api/time-entries").await;
    assert_status(&all, StatusCode::OK);
    assert_eq!(ids(&all.body), vec![feb02, jan20, jan05]);

    let by_project = ctx.get(&format!("/api/time-entries?projectId={}", web)).await;
    assert_eq!(ids(&by_project.body), vec![jan20, jan05]);

    let by_member = ctx.get(&format!("/api/time-entries?teamMemberId={}", alice)).await;
    assert_eq!(ids(&by_member.body), vec![feb02, jan05]);

    let january = ctx
        .get("/api/time-entries?dateFrom=2024-01-05&dateTo=2024-01-31")
        .await;
    assert_eq!(ids(&january.body), vec![jan20, jan05]);

    let entry = &all.body[0];
    assert_eq!(entry["project"]["id"], app);
    assert_eq!(entry["project"]["client"]["id"], client);
    assert_eq!(entry["teamMember"]["id"], alice);
}

#[tokio::test]
async fn test_inverted_filter_range_is_rejected() {
    let ctx = TestContext::new();
    let response = ctx
        .get("/api/time-entries?dateFrom=2024-02-01&dateTo=2024-01-01")
        .await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["details"]["dateFrom"].is_array());
}

#[tokio::test]
async fn test_hours_bounds() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("50")).await;
    let project = create_project(&ctx, client, &[member]).await;

    for hours in ["0", "-2", "24.25"] {
        let response = ctx
            .post("/api/time-entries", time_entry_json(project, member, "2024-01-02", hours))
            .await;
        assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body["details"]["hours"].is_array());
    }

    let response = ctx
        .post("/api/time-entries", time_entry_json(project, member, "2024-01-02", "24"))
        .await;
    assert_status(&response, StatusCode::CREATED);
    assert_eq!(response.body["hours"], "24.00");
}

#[tokio::test]
async fn test_hours_must_fit_two_decimal_places() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("30")).await;
    let project = create_project(&ctx, client, &[member]).await;

    for hours in ["1.335", "0.001"] {
        let response = ctx
            .post("/api/time-entries", time_entry_json(project, member, "2024-01-02", hours))
            .await;
        assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body["details"]["hours"].is_array());
    }
    assert_eq!(ctx.get("/api/time-entries").await.body, json!([]));

    let response = ctx
        .post("/api/time-entries", time_entry_json(project, member, "2024-01-02", "1.50"))
        .await;
    assert_status(&response, StatusCode::CREATED);
    assert_eq!(response.body["hours"], "1.50");

    let uri = format!("/api/time-entries/{}", id_of(&response.body));
    assert_status(&ctx.put(&uri, json!({"hours": "2.125"})).await, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_time_entry_references_must_exist() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("50")).await;

    let response = ctx
        .post("/api/time-entries", time_entry_json(321, member, "2024-01-02", "1"))
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Project not found");

    let project = create_project(&ctx, client, &[member]).await;
    let response = ctx
        .post("/api/time-entries", time_entry_json(project, 654, "2024-01-02", "1"))
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Team member not found");
}

#[tokio::test]
async fn test_update_and_delete_time_entry() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("50")).await;
    let project = create_project(&ctx, client, &[member]).await;
    let entry = log_time(&ctx, project, member, "2024-01-02", "1").await;
    let uri = format!("/api/time-entries/{}", entry);

    let updated = ctx
        .put(&uri, json!({"hours": "7.75", "description": "Release prep"}))
        .await;
    assert_status(&updated, StatusCode::OK);
    assert_eq!(updated.body["hours"], "7.75");
    assert_eq!(updated.body["description"], "Release prep");
    assert_eq!(updated.body["date"], "2024-01-02");

    assert_status(&ctx.put(&uri, json!({"hours": "30"})).await, StatusCode::UNPROCESSABLE_ENTITY);

    assert_status(&ctx.delete(&uri).await, StatusCode::NO_CONTENT);
    assert_status(&ctx.delete(&uri).await, StatusCode::NOT_FOUND);
}
