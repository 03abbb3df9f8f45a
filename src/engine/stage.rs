//! Invoice processing-stage classification
//!
//! Internal invoices move through a two-stage billing workflow: stage 1
//! creates the external accounting invoice (giving the record a numeric
//! `invoice_id`), stage 2 provisions the delivery token behind the hosted
//! invoice URL. Presence of those two optional fields is the only input
//! to the classification.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::InternalInvoice;

/// Workflow stage of an internal invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStage {
    /// Neither the external invoice nor the delivery token exists yet
    Stage1Missing,
    /// External invoice created, delivery token not yet provisioned
    Stage2Partial,
    /// External invoice and delivery token both present
    Stage2Complete,
    /// Token present without an external invoice; upstream data anomaly,
    /// classified rather than rejected so a bad record cannot abort a run
    Unknown,
}

impl InvoiceStage {
    /// Display label as shown on the AR dashboard
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStage::Stage1Missing => "Stage 1 Missing",
            InvoiceStage::Stage2Partial => "Stage 2 Partial",
            InvoiceStage::Stage2Complete => "Stage 2 Complete",
            InvoiceStage::Unknown => "Unknown Stage",
        }
    }
}

impl fmt::Display for InvoiceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an internal invoice by the presence of its external link and
/// delivery token.
///
/// Total over all four combinations; never fails, even on the anomalous
/// token-without-invoice case.
pub fn classify_stage(invoice: &InternalInvoice) -> InvoiceStage {
    match (invoice.invoice_id.is_some(), invoice.token.is_some()) {
        (false, false) => InvoiceStage::Stage1Missing,
        (true, true) => InvoiceStage::Stage2Complete,
        (true, false) => InvoiceStage::Stage2Partial,
        (false, true) => InvoiceStage::Unknown,
    }
}

/// Per-bucket invoice counts for the stage analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageBreakdown {
    pub stage1_missing: usize,
    pub stage2_partial: usize,
    pub stage2_complete: usize,
}

/// Stage-bucketed view of the internal invoice population
///
/// Unknown-stage invoices appear in no bucket and no total. That silent
/// drop matches the dashboards this feeds; callers needing to surface the
/// anomalies must classify separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceStageAnalysis {
    /// Invoices with no external invoice yet
    pub stage1_missing: Vec<InternalInvoice>,
    /// Invoices awaiting a delivery token
    pub stage2_partial: Vec<InternalInvoice>,
    /// Fully provisioned invoices
    pub stage2_complete: Vec<InternalInvoice>,
    /// Amount due across the stage-1-missing bucket
    pub total_stage1_missing: BigDecimal,
    /// Amount due across the stage-2-partial bucket
    pub total_stage2_partial: BigDecimal,
    /// Amount due across the stage-2-complete bucket
    pub total_stage2_complete: BigDecimal,
    /// Invoice counts per bucket
    pub breakdown: StageBreakdown,
}

/// Partition internal invoices into stage buckets with per-bucket amount
/// totals and counts.
pub fn analyze_stages(internal_invoices: &[InternalInvoice]) -> InvoiceStageAnalysis {
    let mut stage1_missing = Vec::new();
    let mut stage2_partial = Vec::new();
    let mut stage2_complete = Vec::new();

    for invoice in internal_invoices {
        match classify_stage(invoice) {
            InvoiceStage::Stage1Missing => stage1_missing.push(invoice.clone()),
            InvoiceStage::Stage2Partial => stage2_partial.push(invoice.clone()),
            InvoiceStage::Stage2Complete => stage2_complete.push(invoice.clone()),
            InvoiceStage::Unknown => {}
        }
    }

    let total_stage1_missing: BigDecimal =
        stage1_missing.iter().map(|inv| &inv.amount_due).sum();
    let total_stage2_partial: BigDecimal =
        stage2_partial.iter().map(|inv| &inv.amount_due).sum();
    let total_stage2_complete: BigDecimal =
        stage2_complete.iter().map(|inv| &inv.amount_due).sum();

    let breakdown = StageBreakdown {
        stage1_missing: stage1_missing.len(),
        stage2_partial: stage2_partial.len(),
        stage2_complete: stage2_complete.len(),
    };

    InvoiceStageAnalysis {
        stage1_missing,
        stage2_partial,
        stage2_complete,
        total_stage1_missing,
        total_stage2_partial,
        total_stage2_complete,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invoice(invoice_id: Option<i64>, token: Option<&str>, amount_due: i64) -> InternalInvoice {
        let issued = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        InternalInvoice {
            id: "inv-1".to_string(),
            invoice_id,
            invoice_number: "INV-001".to_string(),
            amount: BigDecimal::from(amount_due),
            amount_paid: BigDecimal::from(0),
            amount_due: BigDecimal::from(amount_due),
            currency: "USD".to_string(),
            status: "open".to_string(),
            date_issued: issued,
            date_paid: None,
            billing_name: "Acme".to_string(),
            billing_email: "billing@acme.test".to_string(),
            work_order_id: None,
            external_invoice_id: None,
            external_customer_id: None,
            invoice_url: None,
            token: token.map(str::to_string),
            sent_at: None,
            reminder_1_sent: None,
            reminder_2_sent: None,
            final_reminder_sent: None,
            reminders_enabled: true,
            created_at: issued,
            updated_at: issued,
        }
    }

    #[test]
    fn classification_covers_all_four_cells() {
        assert_eq!(
            classify_stage(&invoice(None, None, 0)),
            InvoiceStage::Stage1Missing
        );
        assert_eq!(
            classify_stage(&invoice(Some(42), Some("tok"), 0)),
            InvoiceStage::Stage2Complete
        );
        assert_eq!(
            classify_stage(&invoice(Some(42), None, 0)),
            InvoiceStage::Stage2Partial
        );
        assert_eq!(
            classify_stage(&invoice(None, Some("tok"), 0)),
            InvoiceStage::Unknown
        );
    }

    #[test]
    fn stage_labels_match_dashboard() {
        assert_eq!(InvoiceStage::Stage1Missing.to_string(), "Stage 1 Missing");
        assert_eq!(InvoiceStage::Stage2Partial.to_string(), "Stage 2 Partial");
        assert_eq!(InvoiceStage::Stage2Complete.to_string(), "Stage 2 Complete");
        assert_eq!(InvoiceStage::Unknown.to_string(), "Unknown Stage");
    }

    #[test]
    fn analysis_buckets_and_totals() {
        let invoices = vec![
            invoice(None, None, 500),
            invoice(None, None, 250),
            invoice(Some(1), None, 100),
            invoice(Some(2), Some("tok"), 75),
        ];

        let analysis = analyze_stages(&invoices);

        assert_eq!(analysis.breakdown.stage1_missing, 2);
        assert_eq!(analysis.breakdown.stage2_partial, 1);
        assert_eq!(analysis.breakdown.stage2_complete, 1);
        assert_eq!(analysis.total_stage1_missing, BigDecimal::from(750));
        assert_eq!(analysis.total_stage2_partial, BigDecimal::from(100));
        assert_eq!(analysis.total_stage2_complete, BigDecimal::from(75));
    }

    #[test]
    fn unknown_stage_excluded_from_every_bucket() {
        let invoices = vec![
            invoice(None, Some("orphan-token"), 999),
            invoice(None, None, 10),
        ];

        let analysis = analyze_stages(&invoices);

        let bucketed = analysis.breakdown.stage1_missing
            + analysis.breakdown.stage2_partial
            + analysis.breakdown.stage2_complete;
        assert_eq!(bucketed, invoices.len() - 1);
        assert_eq!(analysis.total_stage1_missing, BigDecimal::from(10));
        assert_eq!(analysis.total_stage2_partial, BigDecimal::from(0));
        assert_eq!(analysis.total_stage2_complete, BigDecimal::from(0));
    }
}
