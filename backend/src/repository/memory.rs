//! In-memory store for development and tests
//!
//! Mirrors the relational schema: serial ids per table, the same cascades on
//! delete, and a monotonically increasing invoice number sequence.

use async_trait::async_trait;
use billable_shared::{
    AssignmentWithMember, Client, ClientCreate, ClientUpdate, Invoice, InvoiceLineItem,
    InvoiceStatus, InvoiceWithDetails, Project, ProjectAssignment, ProjectCreate, ProjectUpdate,
    ProjectWithClient, ProjectWithDetails, TeamMember, TeamMemberCreate, TeamMemberUpdate,
    TimeEntry, TimeEntryCreate, TimeEntryUpdate, TimeEntryWithDetails,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    ClientRepository, InvoiceRepository, ProjectRepository, Store, StoreError, StoreResult,
    TeamMemberRepository, TimeEntryRepository,
};
use crate::invoicing::{format_invoice_number, round2, EntryFilter, InvoiceDraft, LineItemDraft};
use crate::validation::MAX_HOURS_PER_ENTRY;

#[derive(Debug, Default)]
struct Sequences {
    client: i32,
    team_member: i32,
    project: i32,
    assignment: i32,
    time_entry: i32,
    invoice: i32,
    line_item: i32,
    invoice_number: i64,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// Store `value` in a `NUMERIC(precision, 2)` column: rounded to cents, range-checked
fn numeric_column(value: Decimal, precision: u32, column: &'static str) -> StoreResult<Decimal> {
    let rounded = round2(value);
    if rounded.abs() >= Decimal::from(10i64.pow(precision - 2)) {
        return Err(StoreError::Invalid {
            field: column,
            message: format!("{} is out of range for NUMERIC({}, 2)", column, precision),
        });
    }
    Ok(rounded)
}

/// `team_members.rate`
fn rate_column(rate: Decimal) -> StoreResult<Decimal> {
    let rate = numeric_column(rate, 10, "rate")?;
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(StoreError::Invalid {
            field: "rate",
            message: "team_members_rate_check violated".to_string(),
        });
    }
    Ok(rate)
}

/// `time_entries.hours`
fn hours_column(hours: Decimal) -> StoreResult<Decimal> {
    let hours = numeric_column(hours, 5, "hours")?;
    if hours <= Decimal::ZERO || hours > Decimal::from(MAX_HOURS_PER_ENTRY) {
        return Err(StoreError::Invalid {
            field: "hours",
            message: "time_entries_hours_check violated".to_string(),
        });
    }
    Ok(hours)
}

#[derive(Debug, Default)]
struct Tables {
    clients: BTreeMap<i32, Client>,
    team_members: BTreeMap<i32, TeamMember>,
    projects: BTreeMap<i32, Project>,
    assignments: BTreeMap<i32, ProjectAssignment>,
    time_entries: BTreeMap<i32, TimeEntry>,
    invoices: BTreeMap<i32, Invoice>,
    line_items: BTreeMap<i32, InvoiceLineItem>,
    seq: Sequences,
}

impl Tables {
    fn client(&self, id: i32) -> StoreResult<&Client> {
        self.clients.get(&id).ok_or(StoreError::NotFound("Client"))
    }

    fn team_member(&self, id: i32) -> StoreResult<&TeamMember> {
        self.team_members.get(&id).ok_or(StoreError::NotFound("Team member"))
    }

    fn project(&self, id: i32) -> StoreResult<&Project> {
        self.projects.get(&id).ok_or(StoreError::NotFound("Project"))
    }

    fn project_with_client(&self, project: &Project) -> StoreResult<ProjectWithClient> {
        Ok(ProjectWithClient {
            project: project.clone(),
            client: self.client(project.client_id)?.clone(),
        })
    }

    fn assignments_of(&self, project_id: i32) -> StoreResult<Vec<AssignmentWithMember>> {
        self.assignments
            .values()
            .filter(|a| a.project_id == project_id)
            .map(|a| {
                Ok(AssignmentWithMember {
                    assignment: a.clone(),
                    team_member: self.team_member(a.team_member_id)?.clone(),
                })
            })
            .collect()
    }

    fn project_details(&self, project: &Project) -> StoreResult<ProjectWithDetails> {
        Ok(ProjectWithDetails {
            project: project.clone(),
            client: self.client(project.client_id)?.clone(),
            project_assignments: self.assignments_of(project.id)?,
        })
    }

    fn entry_details(&self, entry: &TimeEntry) -> StoreResult<TimeEntryWithDetails> {
        Ok(TimeEntryWithDetails {
            entry: entry.clone(),
            project: self.project_with_client(self.project(entry.project_id)?)?,
            team_member: self.team_member(entry.team_member_id)?.clone(),
        })
    }

    fn invoice_details(&self, invoice: &Invoice) -> StoreResult<InvoiceWithDetails> {
        let project = match invoice.project_id {
            Some(id) => Some(self.project(id)?.clone()),
            None => None,
        };
        Ok(InvoiceWithDetails {
            invoice: invoice.clone(),
            client: self.client(invoice.client_id)?.clone(),
            project,
            line_items: self
                .line_items
                .values()
                .filter(|item| item.invoice_id == invoice.id)
                .cloned()
                .collect(),
        })
    }

    fn assign(&mut self, project_id: i32, team_member_ids: &[i32]) -> StoreResult<()> {
        for member_id in team_member_ids {
            self.team_member(*member_id)?;
        }
        self.assignments.retain(|_, a| a.project_id != project_id);
        for member_id in team_member_ids {
            let id = next_id(&mut self.seq.assignment);
            self.assignments.insert(
                id,
                ProjectAssignment {
                    id,
                    project_id,
                    team_member_id: *member_id,
                    assigned_at: Utc::now(),
                },
            );
        }
        Ok(())
    }

    /// Same column checks as the `invoice_line_items` table
    fn insert_line_item(&mut self, invoice_id: i32, item: LineItemDraft) -> StoreResult<()> {
        if item.description.is_empty() {
            return Err(StoreError::Invalid {
                field: "description",
                message: "invoice_line_items_description_check violated".to_string(),
            });
        }
        if [item.quantity, item.rate, item.amount]
            .iter()
            .any(|v| v.is_sign_negative() && !v.is_zero())
        {
            return Err(StoreError::Invalid {
                field: "amount",
                message: "invoice_line_items_amounts_check violated".to_string(),
            });
        }

        let id = next_id(&mut self.seq.line_item);
        self.line_items.insert(
            id,
            InvoiceLineItem {
                id,
                invoice_id,
                description: item.description,
                quantity: item.quantity,
                rate: item.rate,
                amount: item.amount,
            },
        );
        Ok(())
    }

    fn remove_invoices_where(&mut self, predicate: impl Fn(&Invoice) -> bool) {
        let doomed: Vec<i32> = self
            .invoices
            .values()
            .filter(|invoice| predicate(invoice))
            .map(|invoice| invoice.id)
            .collect();
        for id in &doomed {
            self.invoices.remove(id);
        }
        self.line_items.retain(|_, item| !doomed.contains(&item.invoice_id));
    }

    fn remove_project(&mut self, project_id: i32) {
        self.projects.remove(&project_id);
        self.assignments.retain(|_, a| a.project_id != project_id);
        self.time_entries.retain(|_, e| e.project_id != project_id);
        self.remove_invoices_where(|invoice| invoice.project_id == Some(project_id));
    }
}

/// Process-local [`Store`] backed by ordered maps behind one `RwLock`
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))
    }
}

/// Newest first: ids grow with insertion time
fn newest_first<T: Clone>(rows: &BTreeMap<i32, T>) -> Vec<T> {
    rows.values().rev().cloned().collect()
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(newest_first(&self.read()?.clients))
    }

    async fn get_client(&self, id: i32) -> StoreResult<Option<Client>> {
        Ok(self.read()?.clients.get(&id).cloned())
    }

    async fn create_client(&self, input: ClientCreate) -> StoreResult<Client> {
        let mut tables = self.write()?;
        let id = next_id(&mut tables.seq.client);
        let now = Utc::now();
        let client = Client {
            id,
            client_name: input.client_name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            created_at: now,
            updated_at: now,
        };
        tables.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn update_client(&self, id: i32, input: ClientUpdate) -> StoreResult<Option<Client>> {
        let mut tables = self.write()?;
        let Some(client) = tables.clients.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = input.client_name {
            client.client_name = name;
        }
        if let Some(email) = input.email {
            client.email = email;
        }
        if input.phone.is_some() {
            client.phone = input.phone;
        }
        if input.address.is_some() {
            client.address = input.address;
        }
        client.updated_at = Utc::now();
        Ok(Some(client.clone()))
    }

    async fn delete_client(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if tables.clients.remove(&id).is_none() {
            return Ok(false);
        }
        let projects: Vec<i32> = tables
            .projects
            .values()
            .filter(|p| p.client_id == id)
            .map(|p| p.id)
            .collect();
        for project_id in projects {
            tables.remove_project(project_id);
        }
        tables.remove_invoices_where(|invoice| invoice.client_id == id);
        Ok(true)
    }
}

#[async_trait]
impl TeamMemberRepository for MemoryStore {
    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        Ok(newest_first(&self.read()?.team_members))
    }

    async fn get_team_member(&self, id: i32) -> StoreResult<Option<TeamMember>> {
        Ok(self.read()?.team_members.get(&id).cloned())
    }

    async fn create_team_member(&self, input: TeamMemberCreate) -> StoreResult<TeamMember> {
        let rate = rate_column(input.rate)?;
        let mut tables = self.write()?;
        let id = next_id(&mut tables.seq.team_member);
        let now = Utc::now();
        let member = TeamMember {
            id,
            name: input.name,
            email: input.email,
            role: input.role,
            billing_type: input.billing_type,
            rate,
            created_at: now,
            updated_at: now,
        };
        tables.team_members.insert(id, member.clone());
        Ok(member)
    }

    async fn update_team_member(
        &self,
        id: i32,
        input: TeamMemberUpdate,
    ) -> StoreResult<Option<TeamMember>> {
        let rate = input.rate.map(rate_column).transpose()?;
        let mut tables = self.write()?;
        let Some(member) = tables.team_members.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            member.name = name;
        }
        if let Some(email) = input.email {
            member.email = email;
        }
        if let Some(role) = input.role {
            member.role = role;
        }
        if let Some(billing_type) = input.billing_type {
            member.billing_type = billing_type;
        }
        if let Some(rate) = rate {
            member.rate = rate;
        }
        member.updated_at = Utc::now();
        Ok(Some(member.clone()))
    }

    async fn delete_team_member(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if tables.team_members.remove(&id).is_none() {
            return Ok(false);
        }
        tables.assignments.retain(|_, a| a.team_member_id != id);
        tables.time_entries.retain(|_, e| e.team_member_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn list_projects(&self) -> StoreResult<Vec<ProjectWithDetails>> {
        let tables = self.read()?;
        tables
            .projects
            .values()
            .rev()
            .map(|p| tables.project_details(p))
            .collect()
    }

    async fn get_project(&self, id: i32) -> StoreResult<Option<ProjectWithDetails>> {
        let tables = self.read()?;
        tables
            .projects
            .get(&id)
            .map(|p| tables.project_details(p))
            .transpose()
    }

    async fn create_project(&self, input: ProjectCreate) -> StoreResult<ProjectWithDetails> {
        let mut tables = self.write()?;
        tables.client(input.client_id)?;
        for member_id in &input.team_member_ids {
            tables.team_member(*member_id)?;
        }

        let id = next_id(&mut tables.seq.project);
        let now = Utc::now();
        let project = Project {
            id,
            project_name: input.project_name,
            client_id: input.client_id,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(id, project.clone());
        tables.assign(id, &input.team_member_ids)?;
        tables.project_details(&project)
    }

    async fn update_project(
        &self,
        id: i32,
        input: ProjectUpdate,
    ) -> StoreResult<Option<ProjectWithDetails>> {
        let mut tables = self.write()?;
        if !tables.projects.contains_key(&id) {
            return Ok(None);
        }
        if let Some(client_id) = input.client_id {
            tables.client(client_id)?;
        }
        if let Some(member_ids) = &input.team_member_ids {
            for member_id in member_ids {
                tables.team_member(*member_id)?;
            }
        }

        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = input.project_name {
            project.project_name = name;
        }
        if let Some(client_id) = input.client_id {
            project.client_id = client_id;
        }
        if input.description.is_some() {
            project.description = input.description;
        }
        if let Some(start_date) = input.start_date {
            project.start_date = start_date;
        }
        if input.end_date.is_some() {
            project.end_date = input.end_date;
        }
        if let Some(status) = input.status {
            project.status = status;
        }
        project.updated_at = Utc::now();
        let project = project.clone();

        if let Some(member_ids) = &input.team_member_ids {
            tables.assign(id, member_ids)?;
        }
        tables.project_details(&project).map(Some)
    }

    async fn delete_project(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if !tables.projects.contains_key(&id) {
            return Ok(false);
        }
        tables.remove_project(id);
        Ok(true)
    }

    async fn projects_by_client(&self, client_id: i32) -> StoreResult<Vec<ProjectWithClient>> {
        let tables = self.read()?;
        tables
            .projects
            .values()
            .filter(|p| p.client_id == client_id)
            .map(|p| tables.project_with_client(p))
            .collect()
    }

    async fn project_assignments(&self, project_id: i32) -> StoreResult<Vec<AssignmentWithMember>> {
        self.read()?.assignments_of(project_id)
    }
}

#[async_trait]
impl TimeEntryRepository for MemoryStore {
    async fn find_time_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<TimeEntryWithDetails>> {
        let tables = self.read()?;
        let joined = tables
            .time_entries
            .values()
            .map(|e| tables.entry_details(e))
            .collect::<StoreResult<Vec<_>>>()?;

        let mut entries = filter.select(&joined);
        entries.sort_by(|a, b| {
            b.entry
                .date
                .cmp(&a.entry.date)
                .then(b.entry.id.cmp(&a.entry.id))
        });
        Ok(entries)
    }

    async fn get_time_entry(&self, id: i32) -> StoreResult<Option<TimeEntryWithDetails>> {
        let tables = self.read()?;
        tables
            .time_entries
            .get(&id)
            .map(|e| tables.entry_details(e))
            .transpose()
    }

    async fn create_time_entry(&self, input: TimeEntryCreate) -> StoreResult<TimeEntryWithDetails> {
        let hours = hours_column(input.hours)?;
        let mut tables = self.write()?;
        tables.project(input.project_id)?;
        tables.team_member(input.team_member_id)?;

        let id = next_id(&mut tables.seq.time_entry);
        let entry = TimeEntry {
            id,
            project_id: input.project_id,
            team_member_id: input.team_member_id,
            date: input.date,
            hours,
            description: input.description,
            created_at: Utc::now(),
        };
        tables.time_entries.insert(id, entry.clone());
        tables.entry_details(&entry)
    }

    async fn update_time_entry(
        &self,
        id: i32,
        input: TimeEntryUpdate,
    ) -> StoreResult<Option<TimeEntryWithDetails>> {
        let hours = input.hours.map(hours_column).transpose()?;
        let mut tables = self.write()?;
        if !tables.time_entries.contains_key(&id) {
            return Ok(None);
        }
        if let Some(project_id) = input.project_id {
            tables.project(project_id)?;
        }
        if let Some(member_id) = input.team_member_id {
            tables.team_member(member_id)?;
        }

        let Some(entry) = tables.time_entries.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(project_id) = input.project_id {
            entry.project_id = project_id;
        }
        if let Some(member_id) = input.team_member_id {
            entry.team_member_id = member_id;
        }
        if let Some(date) = input.date {
            entry.date = date;
        }
        if let Some(hours) = hours {
            entry.hours = hours;
        }
        if input.description.is_some() {
            entry.description = input.description;
        }
        let entry = entry.clone();
        tables.entry_details(&entry).map(Some)
    }

    async fn delete_time_entry(&self, id: i32) -> StoreResult<bool> {
        Ok(self.write()?.time_entries.remove(&id).is_some())
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceWithDetails>> {
        let tables = self.read()?;
        tables
            .invoices
            .values()
            .rev()
            .map(|i| tables.invoice_details(i))
            .collect()
    }

    async fn get_invoice(&self, id: i32) -> StoreResult<Option<InvoiceWithDetails>> {
        let tables = self.read()?;
        tables
            .invoices
            .get(&id)
            .map(|i| tables.invoice_details(i))
            .transpose()
    }

    async fn commit_invoice(&self, draft: InvoiceDraft) -> StoreResult<InvoiceWithDetails> {
        let mut tables = self.write()?;

        // Check every reference before the first write so a rejected draft leaves no trace
        tables.client(draft.client_id)?;
        if let Some(project_id) = draft.project_id {
            tables.project(project_id)?;
        }
        let sequence = tables.seq.invoice_number + 1;
        let invoice_number = format_invoice_number(sequence);
        if tables
            .invoices
            .values()
            .any(|i| i.invoice_number == invoice_number)
        {
            return Err(StoreError::Conflict(format!(
                "invoice number {} already exists",
                invoice_number
            )));
        }

        let saved = (tables.seq.invoice_number, tables.seq.invoice, tables.seq.line_item);
        tables.seq.invoice_number = sequence;
        let invoice_id = next_id(&mut tables.seq.invoice);
        let invoice = Invoice {
            id: invoice_id,
            invoice_number,
            client_id: draft.client_id,
            project_id: draft.project_id,
            date_from: draft.period.date_from,
            date_to: draft.period.date_to,
            subtotal: draft.subtotal,
            tax: draft.tax,
            total: draft.total,
            status: draft.status,
            created_at: Utc::now(),
        };
        tables.invoices.insert(invoice_id, invoice.clone());

        for item in draft.line_items {
            if let Err(e) = tables.insert_line_item(invoice_id, item) {
                // Roll back the header, the lines written so far and the counters
                tables.remove_invoices_where(|i| i.id == invoice_id);
                tables.seq.invoice_number = saved.0;
                tables.seq.invoice = saved.1;
                tables.seq.line_item = saved.2;
                tracing::warn!(invoice_id, error = %e, "Rolled back invoice commit");
                return Err(e);
            }
        }

        tables.invoice_details(&invoice)
    }

    async fn update_invoice_status(
        &self,
        id: i32,
        status: InvoiceStatus,
    ) -> StoreResult<Option<Invoice>> {
        let mut tables = self.write()?;
        Ok(tables.invoices.get_mut(&id).map(|invoice| {
            invoice.status = status;
            invoice.clone()
        }))
    }

    async fn delete_invoice(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let existed = tables.invoices.contains_key(&id);
        tables.remove_invoices_where(|invoice| invoice.id == id);
        Ok(existed)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
