//! Basic reconciliation usage example

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use receivables_core::utils::{format_currency, MemoryDataSet};
use receivables_core::{ArEngine, CustomerRef, ExternalInvoice, InternalInvoice, WorkOrder};

fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("📒 Receivables Core - Basic Reconciliation Example\n");

    // 1. Seed the three source systems with a small AR position
    println!("📥 Seeding source snapshots...");
    let data = MemoryDataSet::new();

    data.push_work_order(WorkOrder {
        work_order_id: "WO-1001".to_string(),
        work_order_number: "1001".to_string(),
        status: "Completed".to_string(),
        completed_at: ts(2024, 1, 8),
        territory: "North".to_string(),
        customer_name: "Acme Services".to_string(),
        total_estimated_amount: BigDecimal::from(1800),
    });
    data.push_work_order(WorkOrder {
        work_order_id: "WO-1002".to_string(),
        work_order_number: "1002".to_string(),
        status: "Completed".to_string(),
        completed_at: ts(2024, 1, 12),
        territory: "South".to_string(),
        customer_name: "Globex".to_string(),
        total_estimated_amount: BigDecimal::from(950),
    });

    data.push_external_invoice(ExternalInvoice {
        id: "QB-501".to_string(),
        doc_number: "INV-501".to_string(),
        txn_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
        total_amount: BigDecimal::from(950),
        balance: BigDecimal::from(950),
        customer: CustomerRef {
            id: "C-2".to_string(),
            name: "Globex".to_string(),
        },
    });

    data.push_internal_invoice(InternalInvoice {
        id: "sb-1".to_string(),
        invoice_id: Some(501),
        invoice_number: "INV-501".to_string(),
        amount: BigDecimal::from(950),
        amount_paid: BigDecimal::from(0),
        amount_due: BigDecimal::from(950),
        currency: "USD".to_string(),
        status: "sent".to_string(),
        date_issued: ts(2024, 1, 15),
        date_paid: None,
        billing_name: "Globex".to_string(),
        billing_email: "ap@globex.test".to_string(),
        work_order_id: Some("WO-1002".to_string()),
        external_invoice_id: Some("QB-501".to_string()),
        external_customer_id: Some("C-2".to_string()),
        invoice_url: None,
        token: None,
        sent_at: Some(ts(2024, 1, 16)),
        reminder_1_sent: None,
        reminder_2_sent: None,
        final_reminder_sent: None,
        reminders_enabled: true,
        created_at: ts(2024, 1, 15),
        updated_at: ts(2024, 1, 16),
    });

    println!("  ✓ 2 work orders, 1 external invoice, 1 internal invoice\n");

    // 2. Run the reconciliation
    println!("🔍 Reconciling...");
    let engine = ArEngine::new(data.clone(), data.clone(), data.clone());
    let result = engine.reconcile().await?;

    println!("  Unbilled work ({}):", result.unbilled_work.len());
    for wo in &result.unbilled_work {
        println!(
            "    {} - {} ({})",
            wo.work_order_number,
            wo.customer_name,
            format_currency(&wo.total_estimated_amount)
        );
    }

    println!("  Unpaid invoices ({}):", result.unpaid_invoices.len());
    for inv in &result.unpaid_invoices {
        println!(
            "    {} - {} ({} outstanding)",
            inv.doc_number,
            inv.customer.name,
            format_currency(&inv.balance)
        );
    }

    println!("  Sync issues ({}):", result.sync_issues.len());
    for issue in &result.sync_issues {
        println!(
            "    {} internal={} external={} ({})",
            issue.invoice_number,
            issue.internal_status,
            issue.external_status,
            format_currency(&issue.amount_due)
        );
    }
    println!();

    // 3. Aggregate summary as of the start of February
    println!("📊 AR Summary...");
    let summary = engine.summary(ts(2024, 2, 1)).await?;
    println!(
        "  Unbilled work total:   {}",
        format_currency(&summary.unbilled_work_total)
    );
    println!(
        "  Unpaid invoice total:  {}",
        format_currency(&summary.unpaid_invoices_total)
    );
    println!(
        "  At-risk total:         {}",
        format_currency(&summary.at_risk_total)
    );
    println!();

    // 4. Per-customer rollup
    println!("👥 Customer mappings...");
    for mapping in engine.customer_mappings().await? {
        println!(
            "  {} [{:?}] unbilled={} unpaid={}",
            mapping.customer_name,
            mapping.status,
            format_currency(&mapping.total_unbilled),
            format_currency(&mapping.total_unpaid)
        );
    }

    // 5. Remediation actions are routed to the injected port (no-op here)
    engine.create_invoice("WO-1001").await?;

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
