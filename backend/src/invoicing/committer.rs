//! Invoice assembly and numbering.
//!
//! Persistence of a draft is delegated to [`InvoiceRepository::commit_invoice`],
//! which writes the header and all line items as one unit.
//!
//! [`InvoiceRepository::commit_invoice`]: crate::repository::InvoiceRepository::commit_invoice

use billable_shared::{InvoiceStatus, TimeEntryWithDetails};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculator::{round2, CalculatedLine};

/// Literal prefix of every invoice number
pub const INVOICE_NUMBER_PREFIX: &str = "INV-";

/// Zero-padded width of the sequence part
pub const INVOICE_NUMBER_WIDTH: usize = 5;

/// `INV-00001` for sequence value 1
pub fn format_invoice_number(sequence: i64) -> String {
    format!(
        "{}{:0width$}",
        INVOICE_NUMBER_PREFIX,
        sequence,
        width = INVOICE_NUMBER_WIDTH
    )
}

/// Inclusive date range an invoice covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl BillingPeriod {
    /// Requested bounds win; a missing bound falls back to the earliest or
    /// latest selected entry. `None` only when both are missing and no entry exists.
    pub fn resolve(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        entries: &[TimeEntryWithDetails],
    ) -> Option<Self> {
        let earliest = entries.iter().map(|e| e.entry.date).min();
        let latest = entries.iter().map(|e| e.entry.date).max();

        Some(Self {
            date_from: date_from.or(earliest)?,
            date_to: date_to.or(latest)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl From<CalculatedLine> for LineItemDraft {
    fn from(line: CalculatedLine) -> Self {
        Self {
            description: line.description,
            quantity: line.quantity,
            rate: line.rate,
            amount: line.amount,
        }
    }
}

/// A fully priced invoice that has not been numbered or stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub period: BillingPeriod,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub line_items: Vec<LineItemDraft>,
}

impl InvoiceDraft {
    /// The subtotal is the rounded sum of the *unrounded* line amounts, so it
    /// may differ by a few cents from the sum of the persisted line amounts.
    pub fn new(
        client_id: i32,
        project_id: Option<i32>,
        period: BillingPeriod,
        lines: Vec<CalculatedLine>,
    ) -> Self {
        let subtotal = round2(lines.iter().map(|line| line.unrounded_amount).sum());
        let tax = round2(Decimal::ZERO);

        Self {
            client_id,
            project_id,
            period,
            subtotal,
            tax,
            total: subtotal,
            status: InvoiceStatus::Draft,
            line_items: lines.into_iter().map(LineItemDraft::from).collect(),
        }
    }
}
