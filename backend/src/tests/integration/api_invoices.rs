use axum::http::StatusCode;
use billable_shared::TimeEntryCreate;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use crate::repository::TimeEntryRepository;

use crate::tests::fixtures::TeamMemberFixture;
use crate::tests::helpers::*;
use crate::tests::TestContext;

#[tokio::test]
async fn test_hourly_line_item() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(
        &ctx,
        TeamMemberFixture::hourly("50.00").named("Alice Smith", "Developer"),
    )
    .await;
    let project = create_project(&ctx, client, &[alice]).await;
    log_time(&ctx, project, alice, "2024-01-03", "4").await;
    log_time(&ctx, project, alice, "2024-01-04", "6.25").await;

    let response = generate(&ctx, client, Some(project), "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::CREATED);

    let line = line_for(&response.body, "Alice Smith");
    assert_eq!(line["quantity"], "10.25");
    assert_eq!(line["rate"], "50.00");
    assert_eq!(line["amount"], "512.50");
    assert_eq!(line["description"], "Alice Smith - Developer (Hourly @ $50/hr)");
    assert_eq!(response.body["subtotal"], "512.50");
}

#[tokio::test]
async fn test_monthly_line_item() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let bob = create_member(
        &ctx,
        TeamMemberFixture::monthly("4400.00").named("Bob Jones", "Designer"),
    )
    .await;
    let project = create_project(&ctx, client, &[bob]).await;
    for day in 1..=11 {
        log_time(&ctx, project, bob, &format!("2024-01-{:02}", day), "8").await;
    }

    let response = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::CREATED);

    let line = line_for(&response.body, "Bob Jones");
    assert_eq!(line["quantity"], "11.00");
    assert_eq!(line["rate"], "200.00");
    assert_eq!(line["amount"], "2200.00");
    assert_eq!(line["description"], "Bob Jones - Designer (Daily @ $200.00/day)");
}

#[tokio::test]
async fn test_line_is_priced_on_stored_hours() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("30.00").named("Alice", "Dev")).await;
    let project = create_project(&ctx, client, &[alice]).await;

    // Written below the HTTP layer; the hours column keeps cents only
    let entry = ctx
        .store
        .create_time_entry(TimeEntryCreate {
            project_id: project as i32,
            team_member_id: alice as i32,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            hours: Decimal::new(1335, 3),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(entry.entry.hours, Decimal::new(134, 2));

    let response = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::CREATED);
    let line = line_for(&response.body, "Alice");
    assert_eq!(line["quantity"], "1.34");
    assert_eq!(line["rate"], "30.00");
    assert_eq!(line["amount"], "40.20");
    assert_eq!(response.body["subtotal"], "40.20");
}

#[tokio::test]
async fn test_selection_respects_client_project_and_period() {
    let ctx = TestContext::new();
    let acme = create_client(&ctx).await;
    let globex = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("100").named("Alice", "Dev")).await;
    let web = create_project(&ctx, acme, &[alice]).await;
    let mobile = create_project(&ctx, acme, &[alice]).await;
    let other = create_project(&ctx, globex, &[alice]).await;

    log_time(&ctx, web, alice, "2024-01-01", "1").await; // first day, inclusive
    log_time(&ctx, web, alice, "2024-01-31", "2").await; // last day, inclusive
    log_time(&ctx, web, alice, "2023-12-31", "4").await; // before the period
    log_time(&ctx, web, alice, "2024-02-01", "8").await; // after the period
    log_time(&ctx, mobile, alice, "2024-01-15", "16").await; // other project
    log_time(&ctx, other, alice, "2024-01-15", "20").await; // other client

    let scoped = generate(&ctx, acme, Some(web), "2024-01-01", "2024-01-31").await;
    assert_status(&scoped, StatusCode::CREATED);
    assert_eq!(line_for(&scoped.body, "Alice")["quantity"], "3.00");
    assert_eq!(scoped.body["project"]["id"], web);

    let whole_client = generate(&ctx, acme, None, "2024-01-01", "2024-01-31").await;
    assert_status(&whole_client, StatusCode::CREATED);
    assert_eq!(line_for(&whole_client.body, "Alice")["quantity"], "19.00");
    assert!(whole_client.body["project"].is_null());
}

#[tokio::test]
async fn test_one_line_per_member_and_totals() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("50").named("Alice", "Dev")).await;
    let bob = create_member(&ctx, TeamMemberFixture::hourly("80").named("Bob", "Lead")).await;
    let carol = create_member(&ctx, TeamMemberFixture::monthly("4400").named("Carol", "PM")).await;
    let idle = create_member(&ctx, TeamMemberFixture::hourly("70").named("Idle", "QA")).await;
    let project = create_project(&ctx, client, &[alice, bob, carol, idle]).await;

    log_time(&ctx, project, alice, "2024-01-02", "2").await;
    log_time(&ctx, project, bob, "2024-01-02", "1").await;
    log_time(&ctx, project, alice, "2024-01-03", "3").await;
    log_time(&ctx, project, carol, "2024-01-03", "8").await;

    let response = generate(&ctx, client, Some(project), "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::CREATED);
    let invoice = &response.body;

    assert_eq!(invoice["lineItems"].as_array().unwrap().len(), 3);
    assert_eq!(line_for(invoice, "Alice")["amount"], "250.00");
    assert_eq!(line_for(invoice, "Bob")["amount"], "80.00");
    assert_eq!(line_for(invoice, "Carol")["amount"], "200.00");

    assert_eq!(invoice["subtotal"], "530.00");
    assert_eq!(invoice["tax"], "0.00");
    assert_eq!(invoice["total"], invoice["subtotal"]);
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["dateFrom"], "2024-01-01");
    assert_eq!(invoice["dateTo"], "2024-01-31");
    assert_eq!(invoice["client"]["id"], client);
}

#[tokio::test]
async fn test_subtotal_sums_unrounded_amounts() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let mut members = Vec::new();
    for name in ["Ann", "Ben", "Cat"] {
        members.push(create_member(&ctx, TeamMemberFixture::hourly("0.05").named(name, "Intern")).await);
    }
    let project = create_project(&ctx, client, &members).await;
    for member in &members {
        log_time(&ctx, project, *member, "2024-01-02", "0.1").await;
    }

    let response = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::CREATED);

    // Each line is 0.005 -> 0.01, but the subtotal is round(0.015) = 0.02
    for name in ["Ann", "Ben", "Cat"] {
        assert_eq!(line_for(&response.body, name)["amount"], "0.01");
    }
    assert_eq!(response.body["subtotal"], "0.02");
    assert_eq!(response.body["total"], "0.02");
}

#[tokio::test]
async fn test_invoice_numbers_are_sequential() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("10")).await;
    let project = create_project(&ctx, client, &[member]).await;
    log_time(&ctx, project, member, "2024-01-02", "1").await;

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let response = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
        assert_status(&response, StatusCode::CREATED);
        numbers.push(response.body["invoiceNumber"].as_str().unwrap().to_string());
    }
    assert_eq!(numbers, vec!["INV-00001", "INV-00002", "INV-00003"]);

    // Deleting an invoice does not free its number
    let first = ctx.get("/api/invoices").await.body[2]["id"].as_i64().unwrap();
    assert_status(&ctx.delete(&format!("/api/invoices/{}", first)).await, StatusCode::NO_CONTENT);
    let next = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
    assert_eq!(next.body["invoiceNumber"], "INV-00004");
}

#[tokio::test]
async fn test_no_entries_is_rejected_without_side_effects() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("10")).await;
    let project = create_project(&ctx, client, &[member]).await;
    log_time(&ctx, project, member, "2024-03-02", "1").await;

    let response = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No time entries found for the specified criteria");
    assert_eq!(response.body["code"], "NO_BILLABLE_ENTRIES");

    assert!(ctx.get("/api/invoices").await.body.as_array().unwrap().is_empty());

    // Nothing was consumed by the rejected attempt
    let response = generate(&ctx, client, None, "2024-03-01", "2024-03-31").await;
    assert_eq!(response.body["invoiceNumber"], "INV-00001");
}

#[tokio::test]
async fn test_project_of_another_client_selects_nothing() {
    let ctx = TestContext::new();
    let acme = create_client(&ctx).await;
    let globex = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("10")).await;
    let globex_project = create_project(&ctx, globex, &[member]).await;
    log_time(&ctx, globex_project, member, "2024-01-02", "1").await;

    let response = generate(&ctx, acme, Some(globex_project), "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generation_guards() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;

    let response = generate(&ctx, client, None, "2024-02-01", "2024-01-01").await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["details"]["dateFrom"].is_array());

    let response = generate(&ctx, 999, None, "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Client not found");

    let response = generate(&ctx, client, Some(999), "2024-01-01", "2024-01-31").await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Project not found");
}

#[tokio::test]
async fn test_open_period_falls_back_to_entry_dates() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("10")).await;
    let project = create_project(&ctx, client, &[member]).await;
    log_time(&ctx, project, member, "2024-01-09", "1").await;
    log_time(&ctx, project, member, "2024-01-23", "1").await;

    let response = ctx
        .post("/api/invoices/generate", json!({"clientId": client}))
        .await;
    assert_status(&response, StatusCode::CREATED);
    assert_eq!(response.body["dateFrom"], "2024-01-09");
    assert_eq!(response.body["dateTo"], "2024-01-23");
}

#[tokio::test]
async fn test_read_back_matches_generated_invoice() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let alice = create_member(&ctx, TeamMemberFixture::hourly("45.50")).await;
    let bob = create_member(&ctx, TeamMemberFixture::monthly("3000")).await;
    let project = create_project(&ctx, client, &[alice, bob]).await;
    log_time(&ctx, project, alice, "2024-01-02", "7.5").await;
    log_time(&ctx, project, bob, "2024-01-02", "20").await;

    let generated = generate(&ctx, client, Some(project), "2024-01-01", "2024-01-31").await;
    assert_status(&generated, StatusCode::CREATED);

    let fetched = ctx.get(&format!("/api/invoices/{}", id_of(&generated.body))).await;
    assert_status(&fetched, StatusCode::OK);
    assert_eq!(fetched.body, generated.body);

    let listed = ctx.get("/api/invoices").await;
    assert_eq!(listed.body[0], generated.body);
}

#[tokio::test]
async fn test_status_update_and_delete() {
    let ctx = TestContext::new();
    let client = create_client(&ctx).await;
    let member = create_member(&ctx, TeamMemberFixture::hourly("10")).await;
    let project = create_project(&ctx, client, &[member]).await;
    log_time(&ctx, project, member, "2024-01-02", "1").await;
    let invoice = generate(&ctx, client, None, "2024-01-01", "2024-01-31").await;
    let id = id_of(&invoice.body);

    let sent = ctx
        .put(&format!("/api/invoices/{}/status", id), json!({"status": "sent"}))
        .await;
    assert_status(&sent, StatusCode::OK);
    assert_eq!(sent.body["status"], "sent");
    assert!(sent.body.get("lineItems").is_none());

    let invalid = ctx
        .put(&format!("/api/invoices/{}/status", id), json!({"status": "void"}))
        .await;
    assert!(invalid.status.is_client_error());

    let missing = ctx
        .put("/api/invoices/999/status", json!({"status": "paid"}))
        .await;
    assert_status(&missing, StatusCode::NOT_FOUND);

    assert_status(&ctx.delete(&format!("/api/invoices/{}", id)).await, StatusCode::NO_CONTENT);
    assert_status(&ctx.get(&format!("/api/invoices/{}", id)).await, StatusCode::NOT_FOUND);
}
