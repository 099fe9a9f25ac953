//! Invoice generation engine
//!
//! Pipeline for `POST /api/invoices/generate`:
//!
//! 1. [`selector`] picks the client's time entries in the billing period,
//! 2. [`aggregator`] folds them into one record per team member,
//! 3. [`calculator`] prices each record (hourly or prorated monthly),
//! 4. [`committer`] totals the lines and the store persists header + lines atomically.

pub mod aggregator;
pub mod calculator;
pub mod committer;
pub mod selector;

pub use aggregator::aggregate_by_member;
pub use calculator::{calculate_line, round2, CalculatedLine};
pub use committer::{format_invoice_number, BillingPeriod, InvoiceDraft, LineItemDraft};
pub use selector::EntryFilter;

use billable_shared::{GenerateInvoiceRequest, InvoiceWithDetails};

use crate::repository::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Business rejection: nothing to bill for the requested scope
    #[error("no billable time entries for client {client_id}")]
    NoBillableEntries { client_id: i32 },
    #[error("dateFrom {from} is after dateTo {to}")]
    InvalidPeriod {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runs the generation pipeline against a store
pub struct InvoiceGenerator<'a> {
    store: &'a dyn Store,
}

impl<'a> InvoiceGenerator<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn generate(
        &self,
        request: &GenerateInvoiceRequest,
    ) -> Result<InvoiceWithDetails, GenerationError> {
        if let (Some(from), Some(to)) = (request.date_from, request.date_to) {
            if from > to {
                return Err(GenerationError::InvalidPeriod { from, to });
            }
        }

        if self.store.get_client(request.client_id).await?.is_none() {
            return Err(GenerationError::NotFound("Client"));
        }
        if let Some(project_id) = request.project_id {
            if self.store.get_project(project_id).await?.is_none() {
                return Err(GenerationError::NotFound("Project"));
            }
        }

        let filter = EntryFilter::for_invoice(request);
        let mut entries = self.store.find_time_entries(&filter).await?;

        // Chronological processing: "last seen" project name is the latest entry's
        entries.sort_by_key(|e| (e.entry.date, e.entry.id));

        let no_entries = || GenerationError::NoBillableEntries {
            client_id: request.client_id,
        };
        if entries.is_empty() {
            return Err(no_entries());
        }
        let period = BillingPeriod::resolve(request.date_from, request.date_to, &entries)
            .ok_or_else(no_entries)?;

        let aggregates = aggregate_by_member(&entries);
        tracing::debug!(
            client_id = request.client_id,
            project_id = ?request.project_id,
            entries = entries.len(),
            members = aggregates.len(),
            "Aggregated time entries for invoice"
        );

        let lines: Vec<CalculatedLine> = aggregates.iter().map(calculate_line).collect();
        let draft = InvoiceDraft::new(request.client_id, request.project_id, period, lines);

        let invoice = self.store.commit_invoice(draft).await?;
        tracing::info!(
            invoice_id = invoice.invoice.id,
            invoice_number = %invoice.invoice.invoice_number,
            subtotal = %invoice.invoice.subtotal,
            line_items = invoice.line_items.len(),
            "Generated invoice"
        );

        Ok(invoice)
    }
}
