//! Cancel: a stock request is abandoned and its reserve returned.

use tracing::{debug, info};

use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};
use stockyard_stock::StockTotalStore;

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::units::release_line;

/// Releases reserve only - totals stay put, the materials never left the
/// warehouse.
///
/// Order-linked requests are skipped entirely: their reserve belongs to the
/// order-cancellation flow, which releases it under its own deduplication
/// key. The ordering between the two flows under concurrent delivery is an
/// open question upstream; this handler takes no position beyond not
/// touching order-linked stock.
pub struct CancelReleaseHandler<R, S, D> {
    requests: R,
    stock: S,
    dedup: D,
}

impl<R, S, D> CancelReleaseHandler<R, S, D> {
    pub fn new(requests: R, stock: S, dedup: D) -> Self {
        Self {
            requests,
            stock,
            dedup,
        }
    }
}

impl<R, S, D> StatusChangeHandler for CancelReleaseHandler<R, S, D>
where
    R: RequestStore,
    S: StockTotalStore,
    D: Deduplicator,
{
    fn name(&self) -> &'static str {
        "CancelReleaseHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Cancel
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

        if let Some(order) = prepared.event.order() {
            debug!(
                event = %prepared.event.id(),
                order = %order,
                "order-linked cancellation, deferring to the order flow"
            );
            return Ok(());
        }

        let profile = prepared.event.profile();

        for line in &prepared.lines {
            release_line(&self.stock, profile, line, prepared.event.id());
        }

        self.dedup.save(prepared.token);

        info!(
            event = %prepared.event.id(),
            profile = %profile,
            lines = prepared.lines.len(),
            "cancelled reservation released"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stockyard_core::{MaterialId, OrderId, StockEventId, StockRequestId};
    use stockyard_requests::{MaterialLine, StockRequestEvent};
    use stockyard_stock::SlotKey;

    use super::*;
    use crate::handlers::testkit::Fixture;

    #[test]
    fn cancel_releases_reserve_and_keeps_total() {
        let fixture = Fixture::new();
        let material = MaterialId::new();
        let slot = fixture.stocked(SlotKey::new(fixture.profile, material), 8, 3);

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Cancel,
            fixture.profile,
        );
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(material, 3)]);

        CancelReleaseHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&event))
        .unwrap();

        let row = fixture.stock.get(slot.id()).unwrap();
        assert_eq!((row.total(), row.reserve()), (8, 0));
    }

    #[test]
    fn release_prefers_fullest_reserved_slot() {
        let fixture = Fixture::new();
        let material = MaterialId::new();

        let small = fixture.stocked(
            SlotKey::new(fixture.profile, material).with_storage("a"),
            5,
            2,
        );
        let full = fixture.stocked(
            SlotKey::new(fixture.profile, material).with_storage("b"),
            10,
            2,
        );

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Cancel,
            fixture.profile,
        );
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(material, 1)]);

        CancelReleaseHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&event))
        .unwrap();

        assert_eq!(fixture.stock.get(full.id()).unwrap().reserve(), 1);
        assert_eq!(fixture.stock.get(small.id()).unwrap().reserve(), 2);
    }

    #[test]
    fn order_linked_cancellation_is_skipped() {
        let fixture = Fixture::new();
        let material = MaterialId::new();
        let slot = fixture.stocked(SlotKey::new(fixture.profile, material), 8, 3);

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Cancel,
            fixture.profile,
        )
        .with_order(OrderId::new());
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(material, 3)]);

        CancelReleaseHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&event))
        .unwrap();

        // Untouched; the order-cancellation flow owns this reserve.
        let row = fixture.stock.get(slot.id()).unwrap();
        assert_eq!((row.total(), row.reserve()), (8, 3));
    }

    #[test]
    fn redelivery_is_applied_once() {
        let fixture = Fixture::new();
        let material = MaterialId::new();
        let slot = fixture.stocked(SlotKey::new(fixture.profile, material), 8, 4);

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Cancel,
            fixture.profile,
        );
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(material, 2)]);

        let handler = CancelReleaseHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        );
        let message = fixture.message(&event);
        handler.handle(&message).unwrap();
        handler.handle(&message).unwrap();

        assert_eq!(fixture.stock.get(slot.id()).unwrap().reserve(), 2);
    }
}
