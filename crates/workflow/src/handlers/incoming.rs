//! Incoming stock: materials received at the destination warehouse.

use tracing::{error, info};

use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};
use stockyard_stock::StockTotalStore;

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::units::line_slot_key;

/// Credits `total` at the receiving profile for every incoming line, at the
/// slot named by the line's storage label. The slot row is created lazily on
/// first stock; an unknown profile at that point is a data-integrity failure
/// and aborts the whole transition, leaving it retriable.
pub struct IncomingStockHandler<R, S, D> {
    requests: R,
    stock: S,
    dedup: D,
}

impl<R, S, D> IncomingStockHandler<R, S, D> {
    pub fn new(requests: R, stock: S, dedup: D) -> Self {
        Self {
            requests,
            stock,
            dedup,
        }
    }
}

impl<R, S, D> StatusChangeHandler for IncomingStockHandler<R, S, D>
where
    R: RequestStore,
    S: StockTotalStore,
    D: Deduplicator,
{
    fn name(&self) -> &'static str {
        "IncomingStockHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Incoming
    }

    fn handle(&self, message: &StatusChangeMessage) -> Result<(), WorkflowError> {
        let Some(prepared) = prepare(
            &self.requests,
            &self.dedup,
            message,
            self.status(),
            self.name(),
        ) else {
            return Ok(());
        };

        let profile = prepared.event.profile();

        for line in &prepared.lines {
            let key = line_slot_key(profile, line);
            let row = match self.stock.find(&key) {
                Some(row) => row,
                None => self.stock.create(key)?,
            };

            if self.stock.add_total(row.id(), line.quantity) == 0 {
                error!(
                    critical = true,
                    event = %prepared.event.id(),
                    profile = %profile,
                    material = %line.material,
                    slot = %row.id(),
                    quantity = line.quantity,
                    "incoming stock rejected by stock predicate"
                );
            }
        }

        self.dedup.save(prepared.token);

        info!(
            event = %prepared.event.id(),
            profile = %profile,
            lines = prepared.lines.len(),
            "incoming stock applied"
        );

        Ok(())
    }
}
