//! # Receivables Core
//!
//! An accounts-receivable reconciliation library that merges snapshots
//! from three independent systems (field-service work orders, an external
//! accounting system, and an internal invoice system of record) into a
//! single actionable view.
//!
//! ## Features
//!
//! - **Reconciliation**: unbilled completed work, unpaid invoices, and
//!   cross-system paid/unpaid discrepancies from one pure pass
//! - **Stage classification**: two-stage invoice workflow buckets with
//!   per-bucket totals and counts
//! - **AR summary**: aggregate unbilled, unpaid, and at-risk totals
//! - **Customer rollups**: per-customer exposure and mapping status
//! - **Source abstraction**: backend-agnostic design with trait-based
//!   data sources and remediation actions, with concurrent fan-out and
//!   per-source failure isolation
//!
//! ## Quick Start
//!
//! ```rust
//! use receivables_core::{ArEngine, MemoryDataSet};
//!
//! # async fn run() -> receivables_core::ArResult<()> {
//! let data = MemoryDataSet::new();
//! let engine = ArEngine::new(data.clone(), data.clone(), data);
//! let result = engine.reconcile().await?;
//! assert!(result.unbilled_work.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_source::MemoryDataSet;
