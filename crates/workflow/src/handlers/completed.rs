//! Completed: the request reached its destination.

use tracing::{debug, error, info};

use stockyard_core::UserId;
use stockyard_events::Deduplicator;
use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};

use crate::error::WorkflowError;
use crate::handler::{StatusChangeHandler, prepare};
use crate::notify::{OrderStatus, OrderStatusSink};

/// No stock mutation - the incoming handler credits the destination when
/// the materials are booked in. Pushes the linked order to its completed
/// status, unless this completion belongs to an inter-warehouse move: those
/// requests still await packaging at the destination, and the destination's
/// own workflow finishes the order.
pub struct CompletedOrderHandler<R, D, O> {
    requests: R,
    dedup: D,
    orders: O,
    actor: UserId,
}

impl<R, D, O> CompletedOrderHandler<R, D, O> {
    pub fn new(requests: R, dedup: D, orders: O, actor: UserId) -> Self {
        Self {
            requests,
            dedup,
            orders,
            actor,
        }
    }
}

impl<R, D, O> StatusChangeHandler for CompletedOrderHandler<R, D, O>
where
    R: RequestStore,
    D: Deduplicator,
    O: OrderStatusSink,
{
    fn name(&self) -> &'static str {
        "CompletedOrderHandler"
    }

    fn status(&self) -> RequestStatus {
        RequestStatus::Completed
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

        if prepared.event.destination().is_some() {
            debug!(
                event = %prepared.event.id(),
                "move completion awaits destination packaging, order untouched"
            );
            return Ok(());
        }

        if let Some(order) = prepared.event.order() {
            if let Err(err) = self.orders.update(
                order,
                OrderStatus::Completed,
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

        self.dedup.save(prepared.token);

        info!(
            event = %prepared.event.id(),
            profile = %prepared.event.profile(),
            "completion propagated downstream"
        );

        Ok(())
    }
}
