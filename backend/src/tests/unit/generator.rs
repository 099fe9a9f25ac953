use billable_shared::{
    BillingType, ClientCreate, GenerateInvoiceRequest, ProjectCreate, TeamMemberCreate,
    TimeEntryCreate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::invoicing::{GenerationError, InvoiceGenerator};
use crate::repository::{
    ClientRepository, InvoiceRepository, MemoryStore, ProjectRepository, TeamMemberRepository,
    TimeEntryRepository,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

async fn member(store: &MemoryStore, name: &str, rate: i64) -> i32 {
    store
        .create_team_member(TeamMemberCreate {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: "Engineer".to_string(),
            billing_type: BillingType::Hourly,
            rate: Decimal::from(rate),
        })
        .await
        .unwrap()
        .id
}

async fn log(store: &MemoryStore, project_id: i32, team_member_id: i32, day: u32, hours: i64) {
    store
        .create_time_entry(TimeEntryCreate {
            project_id,
            team_member_id,
            date: date(day),
            hours: Decimal::from(hours),
            description: None,
        })
        .await
        .unwrap();
}

async fn seeded() -> (MemoryStore, i32, i32) {
    let store = MemoryStore::new();
    let client = store
        .create_client(ClientCreate {
            client_name: "Initech".to_string(),
            email: "ap@initech.test".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let project = store
        .create_project(ProjectCreate {
            project_name: "TPS".to_string(),
            client_id: client.id,
            description: None,
            start_date: date(1),
            end_date: None,
            status: Default::default(),
            team_member_ids: vec![],
        })
        .await
        .unwrap();
    (store, client.id, project.project.id)
}

fn january(client_id: i32) -> GenerateInvoiceRequest {
    GenerateInvoiceRequest {
        client_id,
        project_id: None,
        date_from: Some(date(1)),
        date_to: Some(date(31)),
    }
}

#[tokio::test]
async fn test_lines_follow_chronological_first_appearance() {
    let (store, client, project) = seeded().await;
    let peter = member(&store, "Peter", 40).await;
    let milton = member(&store, "Milton", 20).await;

    // Logged out of order; Milton worked first
    log(&store, project, peter, 10, 2).await;
    log(&store, project, milton, 3, 1).await;
    log(&store, project, peter, 4, 1).await;

    let invoice = InvoiceGenerator::new(&store).generate(&january(client)).await.unwrap();

    let names: Vec<&str> = invoice
        .line_items
        .iter()
        .map(|item| item.description.split(" - ").next().unwrap())
        .collect();
    assert_eq!(names, vec!["Milton", "Peter"]);
    assert_eq!(invoice.line_items[1].quantity, Decimal::new(300, 2));
    assert_eq!(invoice.invoice.subtotal, Decimal::new(14000, 2));
}

#[tokio::test]
async fn test_empty_selection_writes_nothing() {
    let (store, client, _) = seeded().await;

    let err = InvoiceGenerator::new(&store)
        .generate(&january(client))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::NoBillableEntries { client_id } if client_id == client));
    assert!(store.list_invoices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inverted_period_is_checked_before_lookup() {
    let store = MemoryStore::new();
    let request = GenerateInvoiceRequest {
        client_id: 1,
        project_id: None,
        date_from: Some(date(31)),
        date_to: Some(date(1)),
    };

    let err = InvoiceGenerator::new(&store).generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidPeriod { .. }));
}
