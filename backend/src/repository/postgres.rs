//! PostgreSQL store
//!
//! Runtime-checked queries so the crate builds without a live database.
//! Joined views are assembled from a handful of `= ANY($1)` lookups instead
//! of wide aliased joins.

use async_trait::async_trait;
use billable_shared::{
    AssignmentWithMember, Client, ClientCreate, ClientUpdate, Invoice, InvoiceLineItem,
    InvoiceStatus, InvoiceWithDetails, Project, ProjectAssignment, ProjectCreate, ProjectUpdate,
    ProjectWithClient, ProjectWithDetails, TeamMember, TeamMemberCreate, TeamMemberUpdate,
    TimeEntry, TimeEntryCreate, TimeEntryUpdate, TimeEntryWithDetails,
};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

use super::{
    ClientRepository, InvoiceRepository, ProjectRepository, Store, StoreError, StoreResult,
    TeamMemberRepository, TimeEntryRepository,
};
use crate::invoicing::{format_invoice_number, EntryFilter, InvoiceDraft};

const CLIENT_COLUMNS: &str = "id, client_name, email, phone, address, created_at, updated_at";
const TEAM_MEMBER_COLUMNS: &str =
    "id, name, email, role, billing_type, rate, created_at, updated_at";
const PROJECT_COLUMNS: &str =
    "id, project_name, client_id, description, start_date, end_date, status, created_at, updated_at";
const ASSIGNMENT_COLUMNS: &str = "id, project_id, team_member_id, assigned_at";
const TIME_ENTRY_COLUMNS: &str =
    "id, project_id, team_member_id, date, hours, description, created_at";
const INVOICE_COLUMNS: &str = "id, invoice_number, client_id, project_id, date_from, date_to, \
     subtotal, tax, total, status, created_at";
const LINE_ITEM_COLUMNS: &str = "id, invoice_id, description, quantity, rate, amount";

/// Translate constraint violations into store errors the HTTP layer understands
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            // foreign_key_violation
            Some("23503") => {
                let constraint = db.constraint().unwrap_or_default();
                return StoreError::NotFound(referenced_resource(constraint));
            }
            // unique_violation
            Some("23505") => return StoreError::Conflict(db.message().to_string()),
            // check_violation
            Some("23514") => {
                let constraint = db.constraint().unwrap_or_default();
                return StoreError::Invalid {
                    field: checked_field(constraint),
                    message: db.message().to_string(),
                };
            }
            // numeric_value_out_of_range
            Some("22003") => {
                return StoreError::Invalid {
                    field: "value",
                    message: db.message().to_string(),
                }
            }
            _ => {}
        }
    }
    StoreError::Database(err)
}

fn referenced_resource(constraint: &str) -> &'static str {
    if constraint.contains("team_member_id") {
        "Team member"
    } else if constraint.contains("project_id") {
        "Project"
    } else if constraint.contains("client_id") {
        "Client"
    } else {
        "Resource"
    }
}

/// Request field guarded by a CHECK constraint of the initial schema
fn checked_field(constraint: &str) -> &'static str {
    match constraint {
        "time_entries_hours_check" => "hours",
        "team_members_rate_check" => "rate",
        "invoices_period_check" => "dateFrom",
        "invoice_line_items_description_check" => "description",
        "invoice_line_items_amounts_check" => "amount",
        _ => "value",
    }
}

fn index_by_id<T>(rows: Vec<T>, id: impl Fn(&T) -> i32) -> HashMap<i32, T> {
    rows.into_iter().map(|row| (id(&row), row)).collect()
}

fn lookup<T: Clone>(map: &HashMap<i32, T>, id: i32, resource: &'static str) -> StoreResult<T> {
    map.get(&id).cloned().ok_or(StoreError::NotFound(resource))
}

/// [`Store`] over a sqlx PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn clients_by_ids(&self, ids: Vec<i32>) -> StoreResult<HashMap<i32, Client>> {
        let rows = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients WHERE id = ANY($1)",
            CLIENT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(index_by_id(rows, |c| c.id))
    }

    async fn team_members_by_ids(&self, ids: Vec<i32>) -> StoreResult<HashMap<i32, TeamMember>> {
        let rows = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {} FROM team_members WHERE id = ANY($1)",
            TEAM_MEMBER_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(index_by_id(rows, |m| m.id))
    }

    async fn projects_by_ids(&self, ids: Vec<i32>) -> StoreResult<HashMap<i32, Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = ANY($1)",
            PROJECT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(index_by_id(rows, |p| p.id))
    }

    async fn with_clients(&self, projects: Vec<Project>) -> StoreResult<Vec<ProjectWithClient>> {
        let clients = self
            .clients_by_ids(projects.iter().map(|p| p.client_id).collect())
            .await?;
        projects
            .into_iter()
            .map(|project| {
                Ok(ProjectWithClient {
                    client: lookup(&clients, project.client_id, "Client")?,
                    project,
                })
            })
            .collect()
    }

    async fn assignments_for(
        &self,
        project_ids: Vec<i32>,
    ) -> StoreResult<HashMap<i32, Vec<AssignmentWithMember>>> {
        let assignments = sqlx::query_as::<_, ProjectAssignment>(&format!(
            "SELECT {} FROM project_assignments WHERE project_id = ANY($1) ORDER BY id",
            ASSIGNMENT_COLUMNS
        ))
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await?;
        let members = self
            .team_members_by_ids(assignments.iter().map(|a| a.team_member_id).collect())
            .await?;

        let mut grouped: HashMap<i32, Vec<AssignmentWithMember>> = HashMap::new();
        for assignment in assignments {
            let team_member = lookup(&members, assignment.team_member_id, "Team member")?;
            grouped
                .entry(assignment.project_id)
                .or_default()
                .push(AssignmentWithMember {
                    assignment,
                    team_member,
                });
        }
        Ok(grouped)
    }

    async fn with_details(&self, projects: Vec<Project>) -> StoreResult<Vec<ProjectWithDetails>> {
        let mut assignments = self
            .assignments_for(projects.iter().map(|p| p.id).collect())
            .await?;
        self.with_clients(projects)
            .await?
            .into_iter()
            .map(|ProjectWithClient { project, client }| {
                Ok(ProjectWithDetails {
                    project_assignments: assignments.remove(&project.id).unwrap_or_default(),
                    project,
                    client,
                })
            })
            .collect()
    }

    async fn entry_details(&self, entries: Vec<TimeEntry>) -> StoreResult<Vec<TimeEntryWithDetails>> {
        let projects = self
            .projects_by_ids(entries.iter().map(|e| e.project_id).collect())
            .await?;
        let projects = index_by_id(
            self.with_clients(projects.into_values().collect()).await?,
            |p| p.project.id,
        );
        let members = self
            .team_members_by_ids(entries.iter().map(|e| e.team_member_id).collect())
            .await?;

        entries
            .into_iter()
            .map(|entry| {
                Ok(TimeEntryWithDetails {
                    project: lookup(&projects, entry.project_id, "Project")?,
                    team_member: lookup(&members, entry.team_member_id, "Team member")?,
                    entry,
                })
            })
            .collect()
    }

    async fn invoice_details(&self, invoices: Vec<Invoice>) -> StoreResult<Vec<InvoiceWithDetails>> {
        let clients = self
            .clients_by_ids(invoices.iter().map(|i| i.client_id).collect())
            .await?;
        let projects = self
            .projects_by_ids(invoices.iter().filter_map(|i| i.project_id).collect())
            .await?;

        let items = sqlx::query_as::<_, InvoiceLineItem>(&format!(
            "SELECT {} FROM invoice_line_items WHERE invoice_id = ANY($1) ORDER BY id",
            LINE_ITEM_COLUMNS
        ))
        .bind(invoices.iter().map(|i| i.id).collect::<Vec<_>>())
        .fetch_all(&self.pool)
        .await?;
        let mut line_items: HashMap<i32, Vec<InvoiceLineItem>> = HashMap::new();
        for item in items {
            line_items.entry(item.invoice_id).or_default().push(item);
        }

        invoices
            .into_iter()
            .map(|invoice| {
                let project = match invoice.project_id {
                    Some(id) => Some(lookup(&projects, id, "Project")?),
                    None => None,
                };
                Ok(InvoiceWithDetails {
                    client: lookup(&clients, invoice.client_id, "Client")?,
                    project,
                    line_items: line_items.remove(&invoice.id).unwrap_or_default(),
                    invoice,
                })
            })
            .collect()
    }

    async fn replace_assignments(
        conn: &mut PgConnection,
        project_id: i32,
        team_member_ids: &[i32],
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM project_assignments WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;
        for member_id in team_member_ids {
            sqlx::query(
                "INSERT INTO project_assignments (project_id, team_member_id) VALUES ($1, $2)",
            )
            .bind(project_id)
            .bind(*member_id)
            .execute(&mut *conn)
            .await
            .map_err(map_write_error)?;
        }
        Ok(())
    }

    async fn single_project(&self, id: i32) -> StoreResult<Option<ProjectWithDetails>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match project {
            Some(project) => Ok(self.with_details(vec![project]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn single_entry(&self, id: i32) -> StoreResult<Option<TimeEntryWithDetails>> {
        let entry = sqlx::query_as::<_, TimeEntry>(&format!(
            "SELECT {} FROM time_entries WHERE id = $1",
            TIME_ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match entry {
            Some(entry) => Ok(self.entry_details(vec![entry]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, table: &str, id: i32) -> StoreResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ClientRepository for PgStore {
    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients ORDER BY created_at DESC, id DESC",
            CLIENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_client(&self, id: i32) -> StoreResult<Option<Client>> {
        Ok(sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients WHERE id = $1",
            CLIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_client(&self, input: ClientCreate) -> StoreResult<Client> {
        sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients (client_name, email, phone, address)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            CLIENT_COLUMNS
        ))
        .bind(input.client_name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_client(&self, id: i32, input: ClientUpdate) -> StoreResult<Option<Client>> {
        sqlx::query_as::<_, Client>(&format!(
            "UPDATE clients SET
                client_name = COALESCE($2, client_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            CLIENT_COLUMNS
        ))
        .bind(id)
        .bind(input.client_name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_client(&self, id: i32) -> StoreResult<bool> {
        self.delete_by_id("clients", id).await
    }
}

#[async_trait]
impl TeamMemberRepository for PgStore {
    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        Ok(sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {} FROM team_members ORDER BY created_at DESC, id DESC",
            TEAM_MEMBER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_team_member(&self, id: i32) -> StoreResult<Option<TeamMember>> {
        Ok(sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {} FROM team_members WHERE id = $1",
            TEAM_MEMBER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_team_member(&self, input: TeamMemberCreate) -> StoreResult<TeamMember> {
        sqlx::query_as::<_, TeamMember>(&format!(
            "INSERT INTO team_members (name, email, role, billing_type, rate)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TEAM_MEMBER_COLUMNS
        ))
        .bind(input.name)
        .bind(input.email)
        .bind(input.role)
        .bind(input.billing_type)
        .bind(input.rate)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_team_member(
        &self,
        id: i32,
        input: TeamMemberUpdate,
    ) -> StoreResult<Option<TeamMember>> {
        sqlx::query_as::<_, TeamMember>(&format!(
            "UPDATE team_members SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                billing_type = COALESCE($5, billing_type),
                rate = COALESCE($6, rate),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            TEAM_MEMBER_COLUMNS
        ))
        .bind(id)
        .bind(input.name)
        .bind(input.email)
        .bind(input.role)
        .bind(input.billing_type)
        .bind(input.rate)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_team_member(&self, id: i32) -> StoreResult<bool> {
        self.delete_by_id("team_members", id).await
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn list_projects(&self) -> StoreResult<Vec<ProjectWithDetails>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC, id DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        self.with_details(projects).await
    }

    async fn get_project(&self, id: i32) -> StoreResult<Option<ProjectWithDetails>> {
        self.single_project(id).await
    }

    async fn create_project(&self, input: ProjectCreate) -> StoreResult<ProjectWithDetails> {
        let mut tx = self.pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (project_name, client_id, description, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(&input.project_name)
        .bind(input.client_id)
        .bind(&input.description)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        Self::replace_assignments(&mut *tx, project.id, &input.team_member_ids).await?;
        tx.commit().await?;

        self.single_project(project.id)
            .await?
            .ok_or(StoreError::NotFound("Project"))
    }

    async fn update_project(
        &self,
        id: i32,
        input: ProjectUpdate,
    ) -> StoreResult<Option<ProjectWithDetails>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i32>(
            "UPDATE projects SET
                project_name = COALESCE($2, project_name),
                client_id = COALESCE($3, client_id),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                status = COALESCE($7, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.project_name)
        .bind(input.client_id)
        .bind(&input.description)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if updated.is_none() {
            return Ok(None);
        }
        if let Some(member_ids) = &input.team_member_ids {
            Self::replace_assignments(&mut *tx, id, member_ids).await?;
        }
        tx.commit().await?;

        self.single_project(id).await
    }

    async fn delete_project(&self, id: i32) -> StoreResult<bool> {
        self.delete_by_id("projects", id).await
    }

    async fn projects_by_client(&self, client_id: i32) -> StoreResult<Vec<ProjectWithClient>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE client_id = $1 ORDER BY id",
            PROJECT_COLUMNS
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        self.with_clients(projects).await
    }

    async fn project_assignments(&self, project_id: i32) -> StoreResult<Vec<AssignmentWithMember>> {
        Ok(self
            .assignments_for(vec![project_id])
            .await?
            .remove(&project_id)
            .unwrap_or_default())
    }
}

#[async_trait]
impl TimeEntryRepository for PgStore {
    async fn find_time_entries(&self, filter: &EntryFilter) -> StoreResult<Vec<TimeEntryWithDetails>> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            "SELECT te.id, te.project_id, te.team_member_id, te.date, te.hours,
                    te.description, te.created_at
             FROM time_entries te
             JOIN projects p ON p.id = te.project_id
             WHERE ($1::int IS NULL OR p.client_id = $1)
               AND ($2::int IS NULL OR te.project_id = $2)
               AND ($3::int IS NULL OR te.team_member_id = $3)
               AND ($4::date IS NULL OR te.date >= $4)
               AND ($5::date IS NULL OR te.date <= $5)
             ORDER BY te.date DESC, te.id DESC",
        )
        .bind(filter.client_id)
        .bind(filter.project_id)
        .bind(filter.team_member_id)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_all(&self.pool)
        .await?;

        self.entry_details(entries).await
    }

    async fn get_time_entry(&self, id: i32) -> StoreResult<Option<TimeEntryWithDetails>> {
        self.single_entry(id).await
    }

    async fn create_time_entry(&self, input: TimeEntryCreate) -> StoreResult<TimeEntryWithDetails> {
        let entry = sqlx::query_as::<_, TimeEntry>(&format!(
            "INSERT INTO time_entries (project_id, team_member_id, date, hours, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TIME_ENTRY_COLUMNS
        ))
        .bind(input.project_id)
        .bind(input.team_member_id)
        .bind(input.date)
        .bind(input.hours)
        .bind(input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.entry_details(vec![entry])
            .await?
            .pop()
            .ok_or(StoreError::NotFound("Time entry"))
    }

    async fn update_time_entry(
        &self,
        id: i32,
        input: TimeEntryUpdate,
    ) -> StoreResult<Option<TimeEntryWithDetails>> {
        let entry = sqlx::query_as::<_, TimeEntry>(&format!(
            "UPDATE time_entries SET
                project_id = COALESCE($2, project_id),
                team_member_id = COALESCE($3, team_member_id),
                date = COALESCE($4, date),
                hours = COALESCE($5, hours),
                description = COALESCE($6, description)
             WHERE id = $1
             RETURNING {}",
            TIME_ENTRY_COLUMNS
        ))
        .bind(id)
        .bind(input.project_id)
        .bind(input.team_member_id)
        .bind(input.date)
        .bind(input.hours)
        .bind(input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        match entry {
            Some(entry) => Ok(self.entry_details(vec![entry]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete_time_entry(&self, id: i32) -> StoreResult<bool> {
        self.delete_by_id("time_entries", id).await
    }
}

#[async_trait]
impl InvoiceRepository for PgStore {
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceWithDetails>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {} FROM invoices ORDER BY created_at DESC, id DESC",
            INVOICE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        self.invoice_details(invoices).await
    }

    async fn get_invoice(&self, id: i32) -> StoreResult<Option<InvoiceWithDetails>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {} FROM invoices WHERE id = $1",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match invoice {
            Some(invoice) => Ok(self.invoice_details(vec![invoice]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn commit_invoice(&self, draft: InvoiceDraft) -> StoreResult<InvoiceWithDetails> {
        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar("SELECT nextval('invoice_number_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let invoice_number = format_invoice_number(sequence);

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "INSERT INTO invoices
                (invoice_number, client_id, project_id, date_from, date_to, subtotal, tax, total, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            INVOICE_COLUMNS
        ))
        .bind(&invoice_number)
        .bind(draft.client_id)
        .bind(draft.project_id)
        .bind(draft.period.date_from)
        .bind(draft.period.date_to)
        .bind(draft.subtotal)
        .bind(draft.tax)
        .bind(draft.total)
        .bind(draft.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        for item in &draft.line_items {
            sqlx::query(
                "INSERT INTO invoice_line_items (invoice_id, description, quantity, rate, amount)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(invoice.id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.rate)
            .bind(item.amount)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
        }

        // Dropping `tx` on any error above rolls the whole invoice back
        tx.commit().await?;

        self.invoice_details(vec![invoice])
            .await?
            .pop()
            .ok_or(StoreError::NotFound("Invoice"))
    }

    async fn update_invoice_status(
        &self,
        id: i32,
        status: InvoiceStatus,
    ) -> StoreResult<Option<Invoice>> {
        Ok(sqlx::query_as::<_, Invoice>(&format!(
            "UPDATE invoices SET status = $2 WHERE id = $1 RETURNING {}",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_invoice(&self, id: i32) -> StoreResult<bool> {
        self.delete_by_id("invoices", id).await
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
