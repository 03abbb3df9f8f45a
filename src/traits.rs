//! Collaborator ports: data sources and remediation actions
//!
//! The reconciliation engine never performs I/O of its own. Everything it
//! consumes arrives through these traits, so any backend (HTTP clients
//! with their own auth and caching, database readers, in-memory fixtures)
//! can be plugged in without touching the engine.

use async_trait::async_trait;

use crate::types::*;

/// Source of completed work orders from the field-service system
///
/// Authentication, caching, and retry policy are the implementation's
/// concern; the engine only sees the returned snapshot.
#[async_trait]
pub trait WorkOrderSource: Send + Sync {
    /// Fetch work orders marked complete and awaiting billing review
    async fn fetch_work_orders(&self) -> ArResult<Vec<WorkOrder>>;
}

/// Source of invoices from the external accounting system
#[async_trait]
pub trait ExternalInvoiceSource: Send + Sync {
    /// Fetch the current external invoice snapshot
    async fn fetch_external_invoices(&self) -> ArResult<Vec<ExternalInvoice>>;
}

/// Source of invoices from the internal system of record
#[async_trait]
pub trait InternalInvoiceSource: Send + Sync {
    /// Fetch the current internal invoice snapshot
    async fn fetch_internal_invoices(&self) -> ArResult<Vec<InternalInvoice>>;
}

/// Remediation actions a presentation layer can trigger against the
/// reconciled view
///
/// The engine itself never executes these; it only routes them to the
/// injected implementation. [`NoopActions`] is the default until a real
/// backend exists.
#[async_trait]
pub trait ArActions: Send + Sync {
    /// Create an invoice for an unbilled work order
    async fn create_invoice(&self, work_order_id: &str) -> ArResult<()>;

    /// Send a payment reminder for an unpaid invoice
    async fn send_reminder(&self, invoice_number: &str) -> ArResult<()>;

    /// Repair the cross-system mapping behind a sync issue
    async fn fix_mapping(&self, invoice_number: &str) -> ArResult<()>;
}

/// Default action implementation that acknowledges every command without
/// doing anything
pub struct NoopActions;

#[async_trait]
impl ArActions for NoopActions {
    async fn create_invoice(&self, work_order_id: &str) -> ArResult<()> {
        tracing::debug!(work_order_id, "create_invoice requested, no backend wired");
        Ok(())
    }

    async fn send_reminder(&self, invoice_number: &str) -> ArResult<()> {
        tracing::debug!(invoice_number, "send_reminder requested, no backend wired");
        Ok(())
    }

    async fn fix_mapping(&self, invoice_number: &str) -> ArResult<()> {
        tracing::debug!(invoice_number, "fix_mapping requested, no backend wired");
        Ok(())
    }
}
