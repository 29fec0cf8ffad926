//! Storage-slot stock record.

use serde::Serialize;

use stockyard_core::StockTotalId;

use crate::slot::SlotKey;

/// Per-slot stock counts for one (profile, material, variant, storage) key.
///
/// `total` is the quantity physically present; `reserve` the quantity
/// earmarked for an in-flight request. The store guarantees
/// `reserve <= total` after every committed mutation; a row is never
/// deleted - a zero-quantity row is the "no stock" terminal state,
/// distinguished from "row absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockTotal {
    id: StockTotalId,
    key: SlotKey,
    total: u32,
    reserve: u32,
}

impl StockTotal {
    pub(crate) fn new(id: StockTotalId, key: SlotKey) -> Self {
        Self {
            id,
            key,
            total: 0,
            reserve: 0,
        }
    }

    pub fn id(&self) -> StockTotalId {
        self.id
    }

    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn reserve(&self) -> u32 {
        self.reserve
    }

    /// Free, unreserved quantity.
    pub fn available(&self) -> u32 {
        self.total - self.reserve
    }

    pub(crate) fn set_counts(&mut self, total: u32, reserve: u32) {
        debug_assert!(reserve <= total);
        self.total = total;
        self.reserve = reserve;
    }
}
