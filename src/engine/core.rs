//! Reconciliation over the three record collections and the engine
//! orchestrator that feeds it

use chrono::NaiveDateTime;
use std::collections::HashSet;
use uuid::Uuid;

use crate::engine::customers::{customer_mappings, CustomerMapping};
use crate::engine::matching::billing_key;
use crate::engine::stage::{analyze_stages, InvoiceStageAnalysis};
use crate::engine::summary::compute_summary;
use crate::traits::*;
use crate::types::*;

/// Derive unbilled work, unpaid invoices, and cross-system sync issues
/// from snapshots of the three upstream collections.
///
/// Pure and deterministic: no I/O, no clock, no shared state. Inputs are
/// taken as given; duplicates are not deduplicated and output order
/// follows input order. Empty inputs yield empty outputs.
///
/// A work order counts as billed if an internal invoice links to it by id
/// or if an external invoice matches its customer-name/amount key (a
/// deliberate fuzzy fallback, see [`billing_key`]). An external invoice
/// counts as unpaid while its balance is positive. A sync issue is
/// emitted for each internal invoice whose linked external invoice exists
/// but disagrees on paid/unpaid status; internal invoices whose link
/// resolves to nothing emit no issue, as a broken link is a data-quality
/// concern rather than a status discrepancy.
pub fn reconcile(
    work_orders: &[WorkOrder],
    external_invoices: &[ExternalInvoice],
    internal_invoices: &[InternalInvoice],
) -> ReconciliationResult {
    let billed_work_order_ids: HashSet<&str> = internal_invoices
        .iter()
        .filter_map(|inv| inv.work_order_id.as_deref())
        .collect();

    let externally_billed_keys: HashSet<String> = external_invoices
        .iter()
        .map(|inv| billing_key(&inv.customer.name, &inv.total_amount))
        .collect();

    let unbilled_work: Vec<WorkOrder> = work_orders
        .iter()
        .filter(|wo| {
            let key = billing_key(&wo.customer_name, &wo.total_estimated_amount);
            !billed_work_order_ids.contains(wo.work_order_id.as_str())
                && !externally_billed_keys.contains(&key)
        })
        .cloned()
        .collect();

    let unpaid_invoices: Vec<ExternalInvoice> = external_invoices
        .iter()
        .filter(|inv| inv.payment_status() == PaymentStatus::Unpaid)
        .cloned()
        .collect();

    let mut sync_issues = Vec::new();
    for internal in internal_invoices {
        if let Some(link) = internal.external_invoice_id.as_deref() {
            if let Some(external) = external_invoices.iter().find(|ext| ext.id == link) {
                let internal_status = internal.payment_status();
                let external_status = external.payment_status();

                if internal_status != external_status {
                    sync_issues.push(SyncIssue {
                        invoice_number: internal.invoice_number.clone(),
                        internal_status,
                        external_status,
                        amount_due: internal.amount_due.clone(),
                    });
                }
            }
        }
    }

    ReconciliationResult {
        unbilled_work,
        unpaid_invoices,
        sync_issues,
    }
}

/// Fully materialized input for one reconciliation run
///
/// Produced by [`ArEngine::snapshot`]; sources that failed contribute an
/// empty collection and a [`SourceFailure`] note so one broken upstream
/// never hides the others' data.
#[derive(Debug, Clone)]
pub struct ArSnapshot {
    /// Identifier for correlating log lines from this run
    pub run_id: Uuid,
    pub work_orders: Vec<WorkOrder>,
    pub external_invoices: Vec<ExternalInvoice>,
    pub internal_invoices: Vec<InternalInvoice>,
    /// Sources that failed during the fan-out, if any
    pub failures: Vec<SourceFailure>,
}

impl ArSnapshot {
    /// Whether any source failed and the snapshot is running on partial
    /// data
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Orchestrator wiring the three data sources and the remediation port
/// to the pure reconciliation functions
pub struct ArEngine<W, E, I> {
    work_order_source: W,
    external_invoice_source: E,
    internal_invoice_source: I,
    actions: Box<dyn ArActions>,
}

impl<W, E, I> ArEngine<W, E, I>
where
    W: WorkOrderSource,
    E: ExternalInvoiceSource,
    I: InternalInvoiceSource,
{
    /// Create an engine with the given sources and no-op remediation
    /// actions
    pub fn new(work_order_source: W, external_invoice_source: E, internal_invoice_source: I) -> Self {
        Self::with_actions(
            work_order_source,
            external_invoice_source,
            internal_invoice_source,
            Box::new(NoopActions),
        )
    }

    /// Create an engine with a custom remediation backend
    pub fn with_actions(
        work_order_source: W,
        external_invoice_source: E,
        internal_invoice_source: I,
        actions: Box<dyn ArActions>,
    ) -> Self {
        Self {
            work_order_source,
            external_invoice_source,
            internal_invoice_source,
            actions,
        }
    }

    /// Fetch all three collections concurrently.
    ///
    /// Each source fails independently: a failed fetch is logged,
    /// recorded on the snapshot, and replaced with an empty collection.
    /// Only when every source fails is there nothing to reconcile and an
    /// error returned.
    pub async fn snapshot(&self) -> ArResult<ArSnapshot> {
        let run_id = Uuid::new_v4();

        let (work_orders, external_invoices, internal_invoices) = futures::join!(
            self.work_order_source.fetch_work_orders(),
            self.external_invoice_source.fetch_external_invoices(),
            self.internal_invoice_source.fetch_internal_invoices(),
        );

        let mut failures = Vec::new();

        let work_orders = work_orders.unwrap_or_else(|err| {
            record_failure(&mut failures, run_id, DataSource::WorkOrders, err);
            Vec::new()
        });
        let external_invoices = external_invoices.unwrap_or_else(|err| {
            record_failure(&mut failures, run_id, DataSource::ExternalInvoices, err);
            Vec::new()
        });
        let internal_invoices = internal_invoices.unwrap_or_else(|err| {
            record_failure(&mut failures, run_id, DataSource::InternalInvoices, err);
            Vec::new()
        });

        if failures.len() == 3 {
            return Err(ArError::AllSourcesUnavailable);
        }

        tracing::debug!(
            %run_id,
            work_orders = work_orders.len(),
            external_invoices = external_invoices.len(),
            internal_invoices = internal_invoices.len(),
            degraded = !failures.is_empty(),
            "snapshot assembled"
        );

        Ok(ArSnapshot {
            run_id,
            work_orders,
            external_invoices,
            internal_invoices,
            failures,
        })
    }

    /// Fetch a snapshot and reconcile it
    pub async fn reconcile(&self) -> ArResult<ReconciliationResult> {
        let snapshot = self.snapshot().await?;
        Ok(reconcile(
            &snapshot.work_orders,
            &snapshot.external_invoices,
            &snapshot.internal_invoices,
        ))
    }

    /// Fetch a snapshot and compute the aggregate AR summary as of `now`
    pub async fn summary(&self, now: NaiveDateTime) -> ArResult<ArSummary> {
        let snapshot = self.snapshot().await?;
        Ok(compute_summary(
            &snapshot.work_orders,
            &snapshot.external_invoices,
            &snapshot.internal_invoices,
            now,
        ))
    }

    /// Fetch the internal invoices and bucket them by processing stage
    pub async fn stage_analysis(&self) -> ArResult<InvoiceStageAnalysis> {
        let snapshot = self.snapshot().await?;
        Ok(analyze_stages(&snapshot.internal_invoices))
    }

    /// Fetch a snapshot and roll it up per customer
    pub async fn customer_mappings(&self) -> ArResult<Vec<CustomerMapping>> {
        let snapshot = self.snapshot().await?;
        Ok(customer_mappings(
            &snapshot.work_orders,
            &snapshot.external_invoices,
            &snapshot.internal_invoices,
        ))
    }

    /// Request invoice creation for an unbilled work order
    pub async fn create_invoice(&self, work_order_id: &str) -> ArResult<()> {
        self.actions.create_invoice(work_order_id).await
    }

    /// Request a payment reminder for an unpaid invoice
    pub async fn send_reminder(&self, invoice_number: &str) -> ArResult<()> {
        self.actions.send_reminder(invoice_number).await
    }

    /// Request a mapping repair for a sync issue
    pub async fn fix_mapping(&self, invoice_number: &str) -> ArResult<()> {
        self.actions.fix_mapping(invoice_number).await
    }
}

fn record_failure(
    failures: &mut Vec<SourceFailure>,
    run_id: Uuid,
    source: DataSource,
    err: ArError,
) {
    tracing::warn!(%run_id, %source, error = %err, "source fetch failed, continuing without it");
    failures.push(SourceFailure {
        source,
        message: err.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn work_order(id: &str, customer: &str, amount: i64) -> WorkOrder {
        WorkOrder {
            work_order_id: id.to_string(),
            work_order_number: format!("WO-{id}"),
            status: "Completed".to_string(),
            completed_at: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            territory: "North".to_string(),
            customer_name: customer.to_string(),
            total_estimated_amount: BigDecimal::from(amount),
        }
    }

    fn external_invoice(id: &str, customer: &str, total: i64, balance: i64) -> ExternalInvoice {
        ExternalInvoice {
            id: id.to_string(),
            doc_number: format!("DOC-{id}"),
            txn_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            total_amount: BigDecimal::from(total),
            balance: BigDecimal::from(balance),
            customer: CustomerRef {
                id: format!("C-{customer}"),
                name: customer.to_string(),
            },
        }
    }

    #[test]
    fn unbilled_work_requires_neither_link_nor_key_match() {
        let orders = vec![work_order("WO1", "Acme", 100)];

        // No invoices anywhere: unbilled
        let result = reconcile(&orders, &[], &[]);
        assert_eq!(result.unbilled_work.len(), 1);
        assert_eq!(result.unbilled_work[0].work_order_id, "WO1");

        // A matching customer+amount external invoice hides it
        let externals = vec![external_invoice("E1", "Acme", 100, 0)];
        let result = reconcile(&orders, &externals, &[]);
        assert!(result.unbilled_work.is_empty());
    }

    #[test]
    fn unpaid_filter_keeps_only_positive_balances() {
        let externals = vec![
            external_invoice("E1", "Acme", 100, 100),
            external_invoice("E2", "Globex", 200, 0),
            external_invoice("E3", "Initech", 300, -10),
        ];

        let result = reconcile(&[], &externals, &[]);
        let unpaid_ids: Vec<&str> = result.unpaid_invoices.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(unpaid_ids, vec!["E1"]);
    }

    #[test]
    fn reconcile_of_empty_inputs_is_empty() {
        let result = reconcile(&[], &[], &[]);
        assert!(result.unbilled_work.is_empty());
        assert!(result.unpaid_invoices.is_empty());
        assert!(result.sync_issues.is_empty());
    }
}
