//! Extradition: the request is packed and ready for pickup/hand-off.

use serde_json::json;
use tracing::{error, info, warn};

use stockyard_core::UserId;
use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::notify::{OrderStatus, OrderStatusSink, RealtimePublisher};

/// No stock mutation - the reserve stays in place until completion. The
/// handler's job is downstream: push the linked order to its
/// ready-for-pickup status and drop the request from other operators'
/// realtime screens.
///
/// `actor` is the service account the order module records as the acting
/// user for workflow-driven updates.
pub struct ExtraditionOrderHandler<R, D, O, P> {
    requests: R,
    dedup: D,
    orders: O,
    realtime: P,
    actor: UserId,
}

impl<R, D, O, P> ExtraditionOrderHandler<R, D, O, P> {
    pub fn new(requests: R, dedup: D, orders: O, realtime: P, actor: UserId) -> Self {
        Self {
            requests,
            dedup,
            orders,
            realtime,
            actor,
        }
    }
}

impl<R, D, O, P> StatusChangeHandler for ExtraditionOrderHandler<R, D, O, P>
where
    R: RequestStore,
    D: Deduplicator,
    O: OrderStatusSink,
    P: RealtimePublisher,
{
    fn name(&self) -> &'static str {
        "ExtraditionOrderHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Extradition
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
            if let Err(err) = self.orders.update(
                order,
                OrderStatus::Extradition,
                prepared.event.profile(),
                self.actor,
            ) {
                error!(
                    critical = true,
                    event = %prepared.event.id(),
                    order = %order,
                    %err,
                    "order status update failed"
                );
            }
        }

        let channel = format!("materials-stock/{}", prepared.event.profile());
        let payload = json!({
            "request": prepared.event.request(),
            "event": prepared.event.id(),
            "status": RequestStatus::Extradition,
        });
        if let Err(err) = self.realtime.publish(&channel, &payload) {
            warn!(event = %prepared.event.id(), %channel, %err, "realtime publish failed");
        }

        self.dedup.save(prepared.token);

        info!(
            event = %prepared.event.id(),
            profile = %prepared.event.profile(),
            "extradition propagated downstream"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stockyard_core::{MaterialId, OrderId, StockEventId, StockRequestId};
    use stockyard_requests::{MaterialLine, StockRequestEvent};

    use super::*;
    use crate::handlers::testkit::Fixture;
    use crate::notify::{RecordingOrderStatusSink, RecordingRealtimePublisher};

    #[test]
    fn order_linked_extradition_updates_the_order() {
        let fixture = Fixture::new();
        let order = OrderId::new();
        let actor = UserId::new();

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Extradition,
            fixture.profile,
        )
        .with_order(order);
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(MaterialId::new(), 1)]);

        let orders = RecordingOrderStatusSink::arc();
        let realtime = RecordingRealtimePublisher::arc();
        let handler = ExtraditionOrderHandler::new(
            fixture.requests.clone(),
            fixture.dedup.clone(),
            orders.clone(),
            realtime.clone(),
            actor,
        );
        handler.handle(&fixture.message(&event)).unwrap();

        assert_eq!(
            orders.updates(),
            vec![(order, OrderStatus::Extradition, fixture.profile, actor)]
        );
        assert_eq!(realtime.published().len(), 1);
        assert!(realtime.published()[0].0.contains(&fixture.profile.to_string()));
    }

    #[test]
    fn unlinked_extradition_only_publishes() {
        let fixture = Fixture::new();

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Extradition,
            fixture.profile,
        );
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(MaterialId::new(), 1)]);

        let orders = RecordingOrderStatusSink::arc();
        let realtime = RecordingRealtimePublisher::arc();
        let handler = ExtraditionOrderHandler::new(
            fixture.requests.clone(),
            fixture.dedup.clone(),
            orders.clone(),
            realtime.clone(),
            UserId::new(),
        );
        handler.handle(&fixture.message(&event)).unwrap();

        assert!(orders.updates().is_empty());
        assert_eq!(realtime.published().len(), 1);
    }

    #[test]
    fn redelivery_updates_the_order_once() {
        let fixture = Fixture::new();
        let order = OrderId::new();

        let event = StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            RequestStatus::Extradition,
            fixture.profile,
        )
        .with_order(order);
        fixture
            .requests
            .insert(event.clone(), vec![MaterialLine::new(MaterialId::new(), 1)]);

        let orders = RecordingOrderStatusSink::arc();
        let handler = ExtraditionOrderHandler::new(
            fixture.requests.clone(),
            fixture.dedup.clone(),
            orders.clone(),
            RecordingRealtimePublisher::arc(),
            UserId::new(),
        );
        let message = fixture.message(&event);
        handler.handle(&message).unwrap();
        handler.handle(&message).unwrap();

        assert_eq!(orders.updates().len(), 1);
    }
}
