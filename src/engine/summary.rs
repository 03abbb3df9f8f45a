//! Invoice aging and aggregate AR summary totals

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::engine::core::reconcile;
use crate::types::{ArSummary, ExternalInvoice, InternalInvoice, WorkOrder};

/// Age in days past which an unpaid invoice counts as at risk
pub const AT_RISK_AGE_DAYS: i64 = 30;

/// Placeholder for the period-over-period change percentages. No
/// historical baseline is tracked yet, so every change field reports
/// this value rather than a computed comparison.
pub const NO_BASELINE_CHANGE: f64 = 0.0;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Age of an invoice in whole days, rounded up.
///
/// The difference is taken as an absolute value, so a future-dated
/// `date_issued` yields a positive age instead of a negative one. Partial
/// days round toward the next full day.
pub fn invoice_age(date_issued: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let elapsed_ms = (now - date_issued).num_milliseconds().abs();
    // `i64::div_ceil` is still unstable (int_roundings); `elapsed_ms` is
    // non-negative here, so the unsigned `div_ceil` is identical.
    (elapsed_ms as u64).div_ceil(MILLIS_PER_DAY as u64) as i64
}

/// Whether an internal invoice is at risk: a positive amount due and an
/// age strictly over [`AT_RISK_AGE_DAYS`].
pub fn is_at_risk(invoice: &InternalInvoice, now: NaiveDateTime) -> bool {
    invoice.amount_due > BigDecimal::from(0)
        && invoice_age(invoice.date_issued, now) > AT_RISK_AGE_DAYS
}

/// Compute the aggregate AR summary over the three record collections.
///
/// Unbilled and unpaid totals are sums over the corresponding
/// [`reconcile`] outputs; the at-risk total sums `amount_due` over
/// internal invoices that satisfy [`is_at_risk`] at `now`.
pub fn compute_summary(
    work_orders: &[WorkOrder],
    external_invoices: &[ExternalInvoice],
    internal_invoices: &[InternalInvoice],
    now: NaiveDateTime,
) -> ArSummary {
    let reconciliation = reconcile(work_orders, external_invoices, internal_invoices);

    let unbilled_work_total: BigDecimal = reconciliation
        .unbilled_work
        .iter()
        .map(|wo| &wo.total_estimated_amount)
        .sum();

    let unpaid_invoices_total: BigDecimal = reconciliation
        .unpaid_invoices
        .iter()
        .map(|inv| &inv.balance)
        .sum();

    let at_risk_total: BigDecimal = internal_invoices
        .iter()
        .filter(|inv| is_at_risk(inv, now))
        .map(|inv| &inv.amount_due)
        .sum();

    ArSummary {
        unbilled_work_total,
        unpaid_invoices_total,
        at_risk_total,
        unbilled_work_change: NO_BASELINE_CHANGE,
        unpaid_invoices_change: NO_BASELINE_CHANGE,
        at_risk_change: NO_BASELINE_CHANGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn invoice_issued(date_issued: NaiveDateTime, amount_due: i64) -> InternalInvoice {
        InternalInvoice {
            id: "inv-1".to_string(),
            invoice_id: Some(1),
            invoice_number: "INV-001".to_string(),
            amount: BigDecimal::from(amount_due),
            amount_paid: BigDecimal::from(0),
            amount_due: BigDecimal::from(amount_due),
            currency: "USD".to_string(),
            status: "open".to_string(),
            date_issued,
            date_paid: None,
            billing_name: "Acme".to_string(),
            billing_email: "billing@acme.test".to_string(),
            work_order_id: None,
            external_invoice_id: None,
            external_customer_id: None,
            invoice_url: None,
            token: None,
            sent_at: None,
            reminder_1_sent: None,
            reminder_2_sent: None,
            final_reminder_sent: None,
            reminders_enabled: true,
            created_at: date_issued,
            updated_at: date_issued,
        }
    }

    #[test]
    fn age_counts_whole_days() {
        let issued = at(2024, 1, 1);
        assert_eq!(invoice_age(issued, issued + Duration::days(30)), 30);
        assert_eq!(invoice_age(issued, issued + Duration::days(31)), 31);
    }

    #[test]
    fn age_rounds_partial_days_up() {
        let issued = at(2024, 1, 1);
        let now = issued + Duration::days(30) + Duration::hours(1);
        assert_eq!(invoice_age(issued, now), 31);
    }

    #[test]
    fn age_of_future_dated_invoice_is_positive() {
        let issued = at(2024, 3, 1);
        let now = at(2024, 2, 1);
        assert!(invoice_age(issued, now) > 0);
    }

    #[test]
    fn at_risk_boundary_is_strict() {
        let issued = at(2024, 1, 1);
        let exactly_30 = invoice_issued(issued, 100);
        assert!(!is_at_risk(&exactly_30, issued + Duration::days(30)));
        assert!(is_at_risk(&exactly_30, issued + Duration::days(31)));
    }

    #[test]
    fn paid_invoice_is_never_at_risk() {
        let issued = at(2024, 1, 1);
        let paid = invoice_issued(issued, 0);
        assert!(!is_at_risk(&paid, issued + Duration::days(90)));
    }

    #[test]
    fn summary_change_fields_are_pinned_to_zero() {
        let summary = compute_summary(&[], &[], &[], at(2024, 6, 1));
        assert_eq!(summary.unbilled_work_total, BigDecimal::from(0));
        assert_eq!(summary.unpaid_invoices_total, BigDecimal::from(0));
        assert_eq!(summary.at_risk_total, BigDecimal::from(0));
        assert_eq!(summary.unbilled_work_change, NO_BASELINE_CHANGE);
        assert_eq!(summary.unpaid_invoices_change, NO_BASELINE_CHANGE);
        assert_eq!(summary.at_risk_change, NO_BASELINE_CHANGE);
    }

    #[test]
    fn at_risk_total_sums_only_old_unpaid_invoices() {
        let now = at(2024, 6, 1);
        let old_unpaid = invoice_issued(now - Duration::days(45), 300);
        let fresh_unpaid = invoice_issued(now - Duration::days(5), 200);
        let old_paid = invoice_issued(now - Duration::days(45), 0);

        let summary = compute_summary(&[], &[], &[old_unpaid, fresh_unpaid, old_paid], now);
        assert_eq!(summary.at_risk_total, BigDecimal::from(300));
    }
}
