//! Workflow error taxonomy.
//!
//! Almost nothing in a transition is allowed to fail the message: rejected
//! mutations and missing rows go to the critical log and the loop moves on.
//! Only structural failures - a data-integrity problem upstream, such as an
//! unknown profile during slot creation - propagate, aborting the transition
//! before its deduplication record is saved so the message is retriable in
//! full.

use thiserror::Error;

use stockyard_stock::StockStoreError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Structural stock-store failure.
    #[error(transparent)]
    Store(#[from] StockStoreError),
}
