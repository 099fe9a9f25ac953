//! Persistence seam for the billing backend
//!
//! Handlers and the invoice engine only see the [`Store`] trait. Two backends
//! implement it: [`PgStore`] (PostgreSQL through sqlx) and [`MemoryStore`]
//! (process-local, used for development and by the test-suite).

use async_trait::async_trait;
use billable_shared::{
    AssignmentWithMember, Client, ClientCreate, ClientUpdate, Invoice, InvoiceStatus,
    InvoiceWithDetails, ProjectCreate, ProjectUpdate, ProjectWithClient, ProjectWithDetails,
    TeamMember, TeamMemberCreate, TeamMemberUpdate, TimeEntryCreate, TimeEntryUpdate,
    TimeEntryWithDetails,
};

use crate::invoicing::{EntryFilter, InvoiceDraft};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Repository error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced row does not exist ("Client", "Project", ...)
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    /// A column check rejected the value
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// All clients, newest first
    async fn list_clients(&self) -> StoreResult<Vec<Client>>;
    async fn get_client(&self, id: i32) -> StoreResult<Option<Client>>;
    async fn create_client(&self, input: ClientCreate) -> StoreResult<Client>;
    async fn update_client(&self, id: i32, input: ClientUpdate) -> StoreResult<Option<Client>>;
    /// Removes the client with its projects, time entries and invoices
    async fn delete_client(&self, id: i32) -> StoreResult<bool>;
}

#[async_trait]
pub trait TeamMemberRepository: Send + Sync {
    /// All team members, newest first
    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>>;
    async fn get_team_member(&self, id: i32) -> StoreResult<Option<TeamMember>>;
    async fn create_team_member(&self, input: TeamMemberCreate) -> StoreResult<TeamMember>;
    async fn update_team_member(
        &self,
        id: i32,
        input: TeamMemberUpdate,
    ) -> StoreResult<Option<TeamMember>>;
    /// Removes the member with its assignments and time entries
    async fn delete_team_member(&self, id: i32) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects with client and assignments, newest first
    async fn list_projects(&self) -> StoreResult<Vec<ProjectWithDetails>>;
    async fn get_project(&self, id: i32) -> StoreResult<Option<ProjectWithDetails>>;
    /// Creates the project and its `team_member_ids` assignments
    async fn create_project(&self, input: ProjectCreate) -> StoreResult<ProjectWithDetails>;
    /// A present `team_member_ids` replaces the project's assignments
    async fn update_project(
        &self,
        id: i32,
        input: ProjectUpdate,
    ) -> StoreResult<Option<ProjectWithDetails>>;
    async fn delete_project(&self, id: i32) -> StoreResult<bool>;
    async fn projects_by_client(&self, client_id: i32) -> StoreResult<Vec<ProjectWithClient>>;
    async fn project_assignments(&self, project_id: i32) -> StoreResult<Vec<AssignmentWithMember>>;
}

#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// Entries matching `filter`, joined with project, client and team member,
    /// ordered by date descending
    async fn find_time_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<TimeEntryWithDetails>>;
    async fn get_time_entry(&self, id: i32) -> StoreResult<Option<TimeEntryWithDetails>>;
    async fn create_time_entry(&self, input: TimeEntryCreate) -> StoreResult<TimeEntryWithDetails>;
    async fn update_time_entry(
        &self,
        id: i32,
        input: TimeEntryUpdate,
    ) -> StoreResult<Option<TimeEntryWithDetails>>;
    async fn delete_time_entry(&self, id: i32) -> StoreResult<bool>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// All invoices with client, project and line items, newest first
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceWithDetails>>;
    async fn get_invoice(&self, id: i32) -> StoreResult<Option<InvoiceWithDetails>>;
    /// Allocates the next invoice number and persists header and line items
    /// as one unit: either every row is written or none is.
    async fn commit_invoice(&self, draft: InvoiceDraft) -> StoreResult<InvoiceWithDetails>;
    async fn update_invoice_status(
        &self,
        id: i32,
        status: InvoiceStatus,
    ) -> StoreResult<Option<Invoice>>;
    async fn delete_invoice(&self, id: i32) -> StoreResult<bool>;
}

/// Everything the HTTP layer needs from persistence
#[async_trait]
pub trait Store:
    ClientRepository + TeamMemberRepository + ProjectRepository + TimeEntryRepository + InvoiceRepository
{
    /// Short backend name for health output
    fn backend_name(&self) -> &'static str;

    /// Cheap liveness check
    async fn ping(&self) -> StoreResult<()>;
}
