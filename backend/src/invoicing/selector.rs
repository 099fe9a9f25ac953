//! Entry selection: which time entries belong on an invoice.

use billable_shared::{GenerateInvoiceRequest, TimeEntryWithDetails};
use chrono::NaiveDate;
use serde::Deserialize;

/// Criteria over time entries. Every present bound must hold; date bounds are inclusive.
///
/// Also the query-string shape of `GET /api/time-entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    /// Owning client of the entry's project
    pub client_id: Option<i32>,
    pub project_id: Option<i32>,
    pub team_member_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl EntryFilter {
    /// Filter for invoice generation: the client is always constrained
    pub fn for_invoice(request: &GenerateInvoiceRequest) -> Self {
        Self {
            client_id: Some(request.client_id),
            project_id: request.project_id,
            team_member_id: None,
            date_from: request.date_from,
            date_to: request.date_to,
        }
    }

    pub fn matches(&self, entry: &TimeEntryWithDetails) -> bool {
        let date = entry.entry.date;

        self.client_id.is_none_or(|id| entry.project.project.client_id == id)
            && self.project_id.is_none_or(|id| entry.entry.project_id == id)
            && self.team_member_id.is_none_or(|id| entry.entry.team_member_id == id)
            && self.date_from.is_none_or(|from| date >= from)
            && self.date_to.is_none_or(|to| date <= to)
    }

    /// Keep the matching entries, preserving input order
    pub fn select<'a, I>(&self, entries: I) -> Vec<TimeEntryWithDetails>
    where
        I: IntoIterator<Item = &'a TimeEntryWithDetails>,
    {
        entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect()
    }
}
