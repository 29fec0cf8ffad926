//! Moving: materials in transit between warehouses.

use tracing::info;

use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};
use stockyard_stock::StockTotalStore;

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::units::reserve_line;

/// Reserves the moved quantity at the shipping profile while the move is in
/// transit; the arrival handler releases it against the same profile.
pub struct MovingReserveHandler<R, S, D> {
    requests: R,
    stock: S,
    dedup: D,
}

impl<R, S, D> MovingReserveHandler<R, S, D> {
    pub fn new(requests: R, stock: S, dedup: D) -> Self {
        Self {
            requests,
            stock,
            dedup,
        }
    }
}

impl<R, S, D> StatusChangeHandler for MovingReserveHandler<R, S, D>
where
    R: RequestStore,
    S: StockTotalStore,
    D: Deduplicator,
{
    fn name(&self) -> &'static str {
        "MovingReserveHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Moving
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

        info!(
            event = %prepared.event.id(),
            profile = %profile,
            lines = prepared.lines.len(),
            "moving reservation applied"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stockyard_core::{MaterialId, OfferConst, StockEventId, StockRequestId, VariationConst};
    use stockyard_requests::{MaterialLine, StockRequestEvent};
    use stockyard_stock::SlotKey;

    use super::*;
    use crate::handlers::testkit::Fixture;

    #[test]
    fn reserves_line_quantity_at_shipping_profile() {
        let fixture = Fixture::new();
        let material = MaterialId::new();
        let slot = fixture.stocked(SlotKey::new(fixture.profile, material), 8, 0);

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Moving,
            fixture.profile,
        );
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(material, 3)]);

        let handler = MovingReserveHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        );
        handler.handle(&fixture.message(&event)).unwrap();

        let row = fixture.stock.get(slot.id()).unwrap();
        assert_eq!((row.total(), row.reserve()), (8, 3));
    }

    #[test]
    fn reservation_resolves_parent_bucket_when_specific_slot_is_absent() {
        let fixture = Fixture::new();
        let material = MaterialId::new();
        let offer = OfferConst::new();
        let variation = VariationConst::new();

        // Only the variation-level bucket is stocked.
        let bucket = fixture.stocked(
            SlotKey::new(fixture.profile, material)
                .with_offer(offer)
                .with_variation(variation),
            5,
            0,
        );

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Moving,
            fixture.profile,
        );
        fixture.requests.insert(
            event.clone(),
            vec![
                MaterialLine::new(material, 2)
                    .with_offer(offer)
                    .with_variation(variation)
                    .with_modification(stockyard_core::ModificationConst::new()),
            ],
        );

        let handler = MovingReserveHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        );
        handler.handle(&fixture.message(&event)).unwrap();

        assert_eq!(fixture.stock.get(bucket.id()).unwrap().reserve(), 2);
    }

    #[test]
    fn second_line_still_runs_after_first_line_shortage() {
        let fixture = Fixture::new();
        let scarce = MaterialId::new();
        let plentiful = MaterialId::new();
        let stocked = fixture.stocked(SlotKey::new(fixture.profile, plentiful), 6, 0);

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Moving,
            fixture.profile,
        );
        fixture.requests.insert(
            event.clone(),
            vec![
                // No slot at all for this material: every unit fails.
                MaterialLine::new(scarce, 2),
                MaterialLine::new(plentiful, 2),
            ],
        );

        let handler = MovingReserveHandler::new(
            fixture.requests.clone(),
            fixture.stock.clone(),
            fixture.dedup.clone(),
        );
        handler.handle(&fixture.message(&event)).unwrap();

        // Failure isolation per line.
        assert_eq!(fixture.stock.get(stocked.id()).unwrap().reserve(), 2);
    }
}
