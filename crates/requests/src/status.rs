//! Stock-request status enumeration (the state machine's vertices).

use serde::{Deserialize, Serialize};

/// Status of a stock request at one point in its lifecycle.
///
/// Every status change produces a new immutable [`StockRequestEvent`]
/// snapshot; handlers subscribe to exactly one status each.
///
/// [`StockRequestEvent`]: crate::StockRequestEvent
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Materials ordered from a supplier.
    Purchase,
    /// Sent to the warehouse.
    Warehouse,
    /// In transit between warehouses.
    Moving,
    /// Sent for order packaging.
    Package,
    /// Packed, ready for pickup/hand-off.
    Extradition,
    /// Delivered to destination.
    Completed,
    Cancel,
    Error,
    /// Split into per-warehouse sub-requests.
    Divide,
    /// Received at the destination warehouse.
    Incoming,
}

impl RequestStatus {
    /// Stable name, used in deduplication keys and logs.
    pub fn name(&self) -> &'static str {
        match self {
            RequestStatus::Purchase => "purchase",
            RequestStatus::Warehouse => "warehouse",
            RequestStatus::Moving => "moving",
            RequestStatus::Package => "package",
            RequestStatus::Extradition => "extradition",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancel => "cancel",
            RequestStatus::Error => "error",
            RequestStatus::Divide => "divide",
            RequestStatus::Incoming => "incoming",
        }
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
