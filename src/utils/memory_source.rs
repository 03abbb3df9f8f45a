//! In-memory data sources for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory implementation of all three data sources
///
/// Holds the three collections behind shared locks so a test or demo can
/// keep pushing records after the engine has been constructed around it.
#[derive(Debug, Clone)]
pub struct MemoryDataSet {
    work_orders: Arc<RwLock<Vec<WorkOrder>>>,
    external_invoices: Arc<RwLock<Vec<ExternalInvoice>>>,
    internal_invoices: Arc<RwLock<Vec<InternalInvoice>>>,
}

impl MemoryDataSet {
    /// Create an empty data set
    pub fn new() -> Self {
        Self {
            work_orders: Arc::new(RwLock::new(Vec::new())),
            external_invoices: Arc::new(RwLock::new(Vec::new())),
            internal_invoices: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a data set preloaded with the given records
    pub fn with_records(
        work_orders: Vec<WorkOrder>,
        external_invoices: Vec<ExternalInvoice>,
        internal_invoices: Vec<InternalInvoice>,
    ) -> Self {
        Self {
            work_orders: Arc::new(RwLock::new(work_orders)),
            external_invoices: Arc::new(RwLock::new(external_invoices)),
            internal_invoices: Arc::new(RwLock::new(internal_invoices)),
        }
    }

    /// Add a work order
    pub fn push_work_order(&self, work_order: WorkOrder) {
        self.work_orders.write().unwrap().push(work_order);
    }

    /// Add an external invoice
    pub fn push_external_invoice(&self, invoice: ExternalInvoice) {
        self.external_invoices.write().unwrap().push(invoice);
    }

    /// Add an internal invoice
    pub fn push_internal_invoice(&self, invoice: InternalInvoice) {
        self.internal_invoices.write().unwrap().push(invoice);
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.work_orders.write().unwrap().clear();
        self.external_invoices.write().unwrap().clear();
        self.internal_invoices.write().unwrap().clear();
    }
}

impl Default for MemoryDataSet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkOrderSource for MemoryDataSet {
    async fn fetch_work_orders(&self) -> ArResult<Vec<WorkOrder>> {
        Ok(self.work_orders.read().unwrap().clone())
    }
}

#[async_trait]
impl ExternalInvoiceSource for MemoryDataSet {
    async fn fetch_external_invoices(&self) -> ArResult<Vec<ExternalInvoice>> {
        Ok(self.external_invoices.read().unwrap().clone())
    }
}

#[async_trait]
impl InternalInvoiceSource for MemoryDataSet {
    async fn fetch_internal_invoices(&self) -> ArResult<Vec<InternalInvoice>> {
        Ok(self.internal_invoices.read().unwrap().clone())
    }
}
