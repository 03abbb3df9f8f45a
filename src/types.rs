//! Core record types and derived structures for AR reconciliation

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paid/unpaid classification of an invoice, as derived from its
/// outstanding amount rather than any upstream status string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing outstanding
    Paid,
    /// A positive amount remains outstanding
    Unpaid,
}

impl PaymentStatus {
    /// Derive the status from an outstanding amount. Anything strictly
    /// greater than zero counts as unpaid; zero and negative (overpaid)
    /// amounts count as paid.
    pub fn from_outstanding(outstanding: &BigDecimal) -> Self {
        if *outstanding > BigDecimal::from(0) {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::Paid
        }
    }

    /// String form as reported in sync issues
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed field-service job awaiting billing
///
/// Read-only snapshot from the field-service system; this crate never
/// creates or mutates work orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Unique identifier in the field-service system
    pub work_order_id: String,
    /// Human-facing work order number
    pub work_order_number: String,
    /// Status string as reported upstream (expected "Completed")
    pub status: String,
    /// When the job was marked complete
    pub completed_at: NaiveDateTime,
    /// Service territory the job belongs to
    pub territory: String,
    /// Customer the job was performed for
    pub customer_name: String,
    /// Estimated billable value of the job
    #[serde(
        default = "crate::utils::amount::zero",
        deserialize_with = "crate::utils::amount::lenient"
    )]
    pub total_estimated_amount: BigDecimal,
}

/// Customer reference carried on an external invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    /// Customer identifier in the accounting system
    pub id: String,
    /// Customer display name
    pub name: String,
}

/// An invoice as recorded in the external accounting system
///
/// Read-only snapshot; the outstanding `balance` is the accounting
/// system's own view of what remains unpaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalInvoice {
    /// Unique identifier in the accounting system
    pub id: String,
    /// Document number printed on the invoice
    pub doc_number: String,
    /// Transaction date
    pub txn_date: NaiveDate,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Invoice total
    #[serde(
        default = "crate::utils::amount::zero",
        deserialize_with = "crate::utils::amount::lenient"
    )]
    pub total_amount: BigDecimal,
    /// Outstanding balance still owed
    #[serde(
        default = "crate::utils::amount::zero",
        deserialize_with = "crate::utils::amount::lenient"
    )]
    pub balance: BigDecimal,
    /// Customer the invoice was issued to
    pub customer: CustomerRef,
}

impl ExternalInvoice {
    /// Paid/unpaid status according to the accounting system's balance
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_outstanding(&self.balance)
    }
}

/// An invoice in the internal system of record
///
/// The only record type that is mutable across its lifecycle: created
/// when an invoice is first recorded, updated as payment, reminder, and
/// delivery-token fields change. This crate reads snapshots of it and
/// never performs the mutation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalInvoice {
    /// Primary key in the system of record
    pub id: String,
    /// Numeric link to the external accounting invoice, once one exists
    pub invoice_id: Option<i64>,
    /// Human-facing invoice number
    pub invoice_number: String,
    /// Invoice total
    #[serde(
        default = "crate::utils::amount::zero",
        deserialize_with = "crate::utils::amount::lenient"
    )]
    pub amount: BigDecimal,
    /// Amount received so far
    #[serde(
        default = "crate::utils::amount::zero",
        deserialize_with = "crate::utils::amount::lenient"
    )]
    pub amount_paid: BigDecimal,
    /// Amount still owed; equals `amount - amount_paid` in a correctly
    /// synced system, but the engine never enforces that
    #[serde(
        default = "crate::utils::amount::zero",
        deserialize_with = "crate::utils::amount::lenient"
    )]
    pub amount_due: BigDecimal,
    /// ISO currency code
    pub currency: String,
    /// Workflow status string as stored upstream
    pub status: String,
    /// When the invoice was issued
    pub date_issued: NaiveDateTime,
    /// When payment completed, if it has
    pub date_paid: Option<NaiveDateTime>,
    /// Billing contact name
    pub billing_name: String,
    /// Billing contact email
    pub billing_email: String,
    /// Link to the originating work order, if known
    pub work_order_id: Option<String>,
    /// Link to the external accounting invoice, if one was created
    pub external_invoice_id: Option<String>,
    /// Link to the customer record in the accounting system
    pub external_customer_id: Option<String>,
    /// Hosted invoice URL delivered to the customer
    pub invoice_url: Option<String>,
    /// Delivery/payment token backing the hosted URL
    pub token: Option<String>,
    /// When the invoice was sent to the customer
    pub sent_at: Option<NaiveDateTime>,
    /// First reminder timestamp
    pub reminder_1_sent: Option<NaiveDateTime>,
    /// Second reminder timestamp
    pub reminder_2_sent: Option<NaiveDateTime>,
    /// Final reminder timestamp
    pub final_reminder_sent: Option<NaiveDateTime>,
    /// Whether automatic reminders are enabled for this invoice
    pub reminders_enabled: bool,
    /// Record creation timestamp
    pub created_at: NaiveDateTime,
    /// Record update timestamp
    pub updated_at: NaiveDateTime,
}

impl InternalInvoice {
    /// Paid/unpaid status according to the system of record's amount due
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_outstanding(&self.amount_due)
    }
}

/// A detected paid/unpaid disagreement between the internal system of
/// record and the external accounting system for the same invoice
///
/// Derived and ephemeral: exists only as output of a reconciliation run,
/// never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncIssue {
    /// Invoice number as known internally
    pub invoice_number: String,
    /// Status according to the internal system of record
    pub internal_status: PaymentStatus,
    /// Status according to the external accounting system
    pub external_status: PaymentStatus,
    /// Internal amount due at the time of the run
    pub amount_due: BigDecimal,
}

/// Output of a reconciliation run over the three record collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Completed work orders with no billing trace in either invoice system
    pub unbilled_work: Vec<WorkOrder>,
    /// External invoices with an outstanding balance
    pub unpaid_invoices: Vec<ExternalInvoice>,
    /// Cross-system paid/unpaid disagreements
    pub sync_issues: Vec<SyncIssue>,
}

/// Aggregate AR totals for dashboard-style reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArSummary {
    /// Total estimated value of unbilled completed work
    pub unbilled_work_total: BigDecimal,
    /// Total outstanding balance across unpaid external invoices
    pub unpaid_invoices_total: BigDecimal,
    /// Total amount due across at-risk internal invoices
    pub at_risk_total: BigDecimal,
    /// Period-over-period change; no historical baseline is tracked yet,
    /// so this is always [`crate::engine::summary::NO_BASELINE_CHANGE`]
    pub unbilled_work_change: f64,
    /// Period-over-period change; always zero, see `unbilled_work_change`
    pub unpaid_invoices_change: f64,
    /// Period-over-period change; always zero, see `unbilled_work_change`
    pub at_risk_change: f64,
}

/// The three upstream record collections a reconciliation run reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Field-service work orders
    WorkOrders,
    /// Accounting-system invoices
    ExternalInvoices,
    /// System-of-record invoices
    InternalInvoices,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::WorkOrders => "work_orders",
            DataSource::ExternalInvoices => "external_invoices",
            DataSource::InternalInvoices => "internal_invoices",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// `ArError::Source` names its field `source`, which `thiserror` treats as the
// error's `source()`, requiring `DataSource: std::error::Error`. The trait is
// satisfied by the existing `Debug`/`Display` impls.
impl std::error::Error for DataSource {}

/// Record of a single upstream fetch failure within an otherwise usable
/// snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    /// Which collection could not be fetched
    pub source: DataSource,
    /// Upstream error description
    pub message: String,
}

/// Errors that can occur at the collaborator seam
///
/// The pure reconciliation functions are infallible; failures only arise
/// when fetching from the injected sources or invoking remediation
/// actions.
#[derive(Debug, thiserror::Error)]
pub enum ArError {
    #[error("source {source} failed: {message}")]
    Source { source: DataSource, message: String },
    #[error("all data sources failed, nothing to reconcile")]
    AllSourcesUnavailable,
    #[error("action failed: {0}")]
    Action(String),
}

/// Result type for collaborator-facing operations
pub type ArResult<T> = Result<T, ArError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_from_outstanding() {
        assert_eq!(
            PaymentStatus::from_outstanding(&BigDecimal::from(50)),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_outstanding(&BigDecimal::from(0)),
            PaymentStatus::Paid
        );
        // Overpayment still reads as paid
        assert_eq!(
            PaymentStatus::from_outstanding(&BigDecimal::from(-25)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn payment_status_strings() {
        assert_eq!(PaymentStatus::Paid.to_string(), "paid");
        assert_eq!(PaymentStatus::Unpaid.to_string(), "unpaid");
    }
}
