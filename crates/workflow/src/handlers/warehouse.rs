//! Warehouse arrival: a move reached its destination warehouse.

use tracing::{debug, info, warn};

use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};
use stockyard_stock::StockTotalStore;

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::units::withdraw_line;

/// Debits the *shipping* profile when a move arrives: the reserve placed by
/// the moving handler is released and the total subtracted together - stock
/// has physically left the origin warehouse.
///
/// The shipping profile is the previous event's profile, not the current
/// one; a Warehouse event without a Moving predecessor ("sent to warehouse"
/// after purchase) moves no stock.
pub struct WarehouseArrivalHandler<R, S, D> {
    requests: R,
    stock: S,
    dedup: D,
}

impl<R, S, D> WarehouseArrivalHandler<R, S, D> {
    pub fn new(requests: R, stock: S, dedup: D) -> Self {
        Self {
            requests,
            stock,
            dedup,
        }
    }
}

impl<R, S, D> StatusChangeHandler for WarehouseArrivalHandler<R, S, D>
where
    R: RequestStore,
    S: StockTotalStore,
    D: Deduplicator,
{
    fn name(&self) -> &'static str {
        "WarehouseArrivalHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Warehouse
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

        let Some(previous_id) = message.previous() else {
            debug!(
                event = %prepared.event.id(),
                "warehouse status without predecessor, nothing to release"
            );
            return Ok(());
        };

        let Some(previous) = self.requests.lookup(previous_id) else {
            warn!(
                event = %prepared.event.id(),
                previous = %previous_id,
                "previous event not found"
            );
            return Ok(());
        };

        if !previous.equals_status(RequestStatus::Moving) {
            // Sent-to-warehouse after purchase, not an arrival.
            return Ok(());
        }

        let shipping = previous.profile();

        for line in &prepared.lines {
            withdraw_line(&self.stock, shipping, line, prepared.event.id());
        }

        self.dedup.save(prepared.token);

        info!(
            event = %prepared.event.id(),
            shipping_profile = %shipping,
            lines = prepared.lines.len(),
            "moved stock withdrawn from shipping profile"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stockyard_core::{MaterialId, ProfileId, StockEventId, StockRequestId};
    use stockyard_requests::{MaterialLine, StockRequestEvent};
    use stockyard_stock::SlotKey;

    use super::*;
    use crate::handlers::testkit::Fixture;
    use crate::handlers::moving::MovingReserveHandler;

    #[test]
    fn arrival_debits_the_previous_events_profile() {
        let shipping = ProfileId::new();
        let destination = ProfileId::new();
        let fixture = Fixture::with_profiles(vec![shipping, destination]);
        let material = MaterialId::new();
        let request = StockRequestId::new();

        let slot = fixture.stocked(SlotKey::new(shipping, material), 10, 0);

        // Moving at the shipping profile first.
        let moving = StockRequestEvent::new(
            StockEventId::new(),
            request,
            RequestStatus::Moving,
            shipping,
        )
        .with_destination(destination);
        fixture
            .requests
            .insert(moving.clone(), vec![MaterialLine::new(material, 3)]);

        MovingReserveHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&moving))
        .unwrap();

        assert_eq!(fixture.stock.get(slot.id()).unwrap().reserve(), 3);

        // Arrival: same request, new event at the destination profile,
        // previous pointing at the moving event.
        let arrival = StockRequestEvent::new(
            StockEventId::new(),
            request,
            RequestStatus::Warehouse,
            destination,
        )
        .with_previous(moving.id());
        fixture
            .requests
            .insert(arrival.clone(), vec![MaterialLine::new(material, 3)]);

        WarehouseArrivalHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&arrival))
        .unwrap();

        let row = fixture.stock.get(slot.id()).unwrap();
        assert_eq!((row.total(), row.reserve()), (7, 0));
    }

    #[test]
    fn withdraw_picks_scarcest_reserved_slot() {
        let shipping = ProfileId::new();
        let fixture = Fixture::with_profiles(vec![shipping]);
        let material = MaterialId::new();

        let scarce = fixture.stocked(
            SlotKey::new(shipping, material).with_storage("a"),
            5,
            2,
        );
        let full = fixture.stocked(
            SlotKey::new(shipping, material).with_storage("b"),
            10,
            1,
        );

        let moving =
            StockRequestEvent::new(StockEventId::new(), StockRequestId::new(), RequestStatus::Moving, shipping);
        let arrival = StockRequestEvent::new(
            StockEventId::new(),
            moving.request(),
            RequestStatus::Warehouse,
            shipping,
        )
        .with_previous(moving.id());
        fixture.requests.insert(moving, vec![]);
        fixture
            .requests
            .insert(arrival.clone(), vec![MaterialLine::new(material, 1)]);

        WarehouseArrivalHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&arrival))
        .unwrap();

        let scarce_row = fixture.stock.get(scarce.id()).unwrap();
        let full_row = fixture.stock.get(full.id()).unwrap();
        assert_eq!((scarce_row.total(), scarce_row.reserve()), (4, 1));
        assert_eq!((full_row.total(), full_row.reserve()), (10, 1));
    }

    #[test]
    fn warehouse_after_purchase_moves_no_stock() {
        let fixture = Fixture::new();
        let material = MaterialId::new();
        let slot = fixture.stocked(SlotKey::new(fixture.profile, material), 5, 2);

        let purchase = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Purchase,
            fixture.profile,
        );
        let warehouse = StockRequestEvent::new(
            StockEventId::new(),
            purchase.request(),
            RequestStatus::Warehouse,
            fixture.profile,
        )
        .with_previous(purchase.id());
        fixture.requests.insert(purchase, vec![]);
        fixture
            .requests
            .insert(warehouse.clone(), vec![MaterialLine::new(material, 2)]);

        WarehouseArrivalHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&warehouse))
        .unwrap();

        let row = fixture.stock.get(slot.id()).unwrap();
        assert_eq!((row.total(), row.reserve()), (5, 2));
    }

    #[test]
    fn insufficient_stock_is_logged_not_thrown() {
        let shipping = ProfileId::new();
        let fixture = Fixture::with_profiles(vec![shipping]);
        let material = MaterialId::new();

        // Reserve exists for only one unit.
        let slot = fixture.stocked(SlotKey::new(shipping, material), 1, 1);

        let moving =
            StockRequestEvent::new(StockEventId::new(), StockRequestId::new(), RequestStatus::Moving, shipping);
        let arrival = StockRequestEvent::new(
            StockEventId::new(),
            moving.request(),
            RequestStatus::Warehouse,
            shipping,
        )
        .with_previous(moving.id());
        fixture.requests.insert(moving, vec![]);
        fixture
            .requests
            .insert(arrival.clone(), vec![MaterialLine::new(material, 3)]);

        WarehouseArrivalHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        )
        .handle(&fixture.message(&arrival))
        .unwrap();

        // One unit withdrawn, the shortfall went to the critical log.
        let row = fixture.stock.get(slot.id()).unwrap();
        assert_eq!((row.total(), row.reserve()), (0, 0));
    }
}
