//! Per-customer rollup of the reconciled AR position

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{ExternalInvoice, InternalInvoice, WorkOrder};

/// Overall billing state of a single customer across the three systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStatus {
    /// Nothing unbilled and nothing outstanding
    Matched,
    /// Completed work exists with no outstanding invoices
    Unbilled,
    /// Outstanding invoices exist with no unbilled work
    Unpaid,
    /// Both unbilled work and outstanding invoices at once
    SyncIssue,
}

/// Everything known about one customer across the three collections,
/// with their unbilled and unpaid exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMapping {
    pub customer_name: String,
    /// Completed work orders for this customer
    pub work_orders: Vec<WorkOrder>,
    /// External invoices issued to this customer
    pub external_invoices: Vec<ExternalInvoice>,
    /// Internal invoices billed to this customer
    pub internal_invoices: Vec<InternalInvoice>,
    /// Sum of estimated amounts over the customer's work orders
    pub total_unbilled: BigDecimal,
    /// Sum of outstanding balances over the customer's external invoices
    pub total_unpaid: BigDecimal,
    pub status: MappingStatus,
}

/// Group the three collections by customer name and compute each
/// customer's exposure.
///
/// Customers are matched by exact display name across systems (the same
/// heuristic the billing-key match uses). Output is sorted by combined
/// unbilled-plus-unpaid exposure, largest first, so the most pressing
/// customers surface at the top of a dashboard.
pub fn customer_mappings(
    work_orders: &[WorkOrder],
    external_invoices: &[ExternalInvoice],
    internal_invoices: &[InternalInvoice],
) -> Vec<CustomerMapping> {
    let mut names: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    let candidates = work_orders
        .iter()
        .map(|wo| wo.customer_name.as_str())
        .chain(external_invoices.iter().map(|inv| inv.customer.name.as_str()))
        .chain(internal_invoices.iter().map(|inv| inv.billing_name.as_str()));
    for name in candidates {
        if seen.insert(name) {
            names.push(name);
        }
    }

    let zero = BigDecimal::from(0);
    let mut mappings: Vec<CustomerMapping> = names
        .into_iter()
        .map(|name| {
            let customer_work_orders: Vec<WorkOrder> = work_orders
                .iter()
                .filter(|wo| wo.customer_name == name)
                .cloned()
                .collect();
            let customer_externals: Vec<ExternalInvoice> = external_invoices
                .iter()
                .filter(|inv| inv.customer.name == name)
                .cloned()
                .collect();
            let customer_internals: Vec<InternalInvoice> = internal_invoices
                .iter()
                .filter(|inv| inv.billing_name == name)
                .cloned()
                .collect();

            let total_unbilled: BigDecimal = customer_work_orders
                .iter()
                .map(|wo| &wo.total_estimated_amount)
                .sum();
            let total_unpaid: BigDecimal =
                customer_externals.iter().map(|inv| &inv.balance).sum();

            let status = if total_unbilled > zero && total_unpaid == zero {
                MappingStatus::Unbilled
            } else if total_unpaid > zero && total_unbilled == zero {
                MappingStatus::Unpaid
            } else if total_unbilled > zero && total_unpaid > zero {
                MappingStatus::SyncIssue
            } else {
                MappingStatus::Matched
            };

            CustomerMapping {
                customer_name: name.to_string(),
                work_orders: customer_work_orders,
                external_invoices: customer_externals,
                internal_invoices: customer_internals,
                total_unbilled,
                total_unpaid,
                status,
            }
        })
        .collect();

    mappings.sort_by(|a, b| {
        let exposure_a = &a.total_unbilled + &a.total_unpaid;
        let exposure_b = &b.total_unbilled + &b.total_unpaid;
        exposure_b.cmp(&exposure_a)
    });

    mappings
}
