//! Package: materials sent for order packaging.

use serde_json::json;
use tracing::{info, warn};

use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};
use stockyard_stock::StockTotalStore;

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::notify::RealtimePublisher;
use crate::units::reserve_line;

/// Reserves one unit per unit of line quantity at the packaging profile,
/// least free headroom first, then publishes the request to the realtime
/// channel so other operators' screens drop it from their pick lists.
pub struct PackageReserveHandler<R, S, D, P> {
    requests: R,
    stock: S,
    dedup: D,
    realtime: P,
}

impl<R, S, D, P> PackageReserveHandler<R, S, D, P> {
    pub fn new(requests: R, stock: S, dedup: D, realtime: P) -> Self {
        Self {
            requests,
            stock,
            dedup,
            realtime,
        }
    }
}

impl<R, S, D, P> StatusChangeHandler for PackageReserveHandler<R, S, D, P>
where
    R: RequestStore,
    S: StockTotalStore,
    D: Deduplicator,
    P: RealtimePublisher,
{
    fn name(&self) -> &'static str {
        "PackageReserveHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Package
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
            reserve_line(&self.stock, profile, line, prepared.event.id());
        }

        self.dedup.save(prepared.token);

        let channel = format!("materials-stock/{profile}");
        let payload = json!({
            "request": prepared.event.request(),
            "event": prepared.event.id(),
            "status": RequestStatus::Package,
        });
        if let Err(err) = self.realtime.publish(&channel, &payload) {
            warn!(event = %prepared.event.id(), %channel, %err, "realtime publish failed");
        }

        info!(
            event = %prepared.event.id(),
            profile = %profile,
            lines = prepared.lines.len(),
            "package reservation applied"
        );

        Ok(())
    }
}
