//! Invoice stage analysis example

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use receivables_core::utils::format_currency;
use receivables_core::{analyze_stages, classify_stage, InternalInvoice};

fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn invoice(
    id: &str,
    number: &str,
    invoice_id: Option<i64>,
    token: Option<&str>,
    amount_due: i64,
) -> InternalInvoice {
    InternalInvoice {
        id: id.to_string(),
        invoice_id,
        invoice_number: number.to_string(),
        amount: BigDecimal::from(amount_due),
        amount_paid: BigDecimal::from(0),
        amount_due: BigDecimal::from(amount_due),
        currency: "USD".to_string(),
        status: "open".to_string(),
        date_issued: ts(2024, 2, 1),
        date_paid: None,
        billing_name: "Acme Services".to_string(),
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
        created_at: ts(2024, 2, 1),
        updated_at: ts(2024, 2, 1),
    }
}

fn main() {
    println!("🏷️  Receivables Core - Invoice Stage Analysis Example\n");

    let invoices = vec![
        invoice("sb-1", "INV-701", None, None, 500),
        invoice("sb-2", "INV-702", None, None, 250),
        invoice("sb-3", "INV-703", Some(703), None, 320),
        invoice("sb-4", "INV-704", Some(704), Some("tok-704"), 75),
        // Anomalous: token without an external invoice
        invoice("sb-5", "INV-705", None, Some("tok-705"), 999),
    ];

    println!("Per-invoice classification:");
    for inv in &invoices {
        println!(
            "  {} → {} ({})",
            inv.invoice_number,
            classify_stage(inv),
            format_currency(&inv.amount_due)
        );
    }

    let analysis = analyze_stages(&invoices);

    println!("\nStage buckets:");
    println!(
        "  Stage 1 Missing:  {} invoices, {}",
        analysis.breakdown.stage1_missing,
        format_currency(&analysis.total_stage1_missing)
    );
    println!(
        "  Stage 2 Partial:  {} invoices, {}",
        analysis.breakdown.stage2_partial,
        format_currency(&analysis.total_stage2_partial)
    );
    println!(
        "  Stage 2 Complete: {} invoices, {}",
        analysis.breakdown.stage2_complete,
        format_currency(&analysis.total_stage2_complete)
    );

    let bucketed = analysis.breakdown.stage1_missing
        + analysis.breakdown.stage2_partial
        + analysis.breakdown.stage2_complete;
    println!(
        "\n{} of {} invoices bucketed (unknown-stage invoices are excluded)",
        bucketed,
        invoices.len()
    );
}
