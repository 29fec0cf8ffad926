//! Notifier adapters for environments without the real order/realtime
//! modules wired in.

use serde_json::Value as JsonValue;
use tracing::info;

use stockyard_core::{OrderId, ProfileId, UserId};
use stockyard_workflow::{NotifyError, OrderStatus, OrderStatusSink, RealtimePublisher};

/// Order-status sink that only logs; the operational log stream carries the
/// update to whoever watches it.
#[derive(Debug, Default)]
pub struct TracingOrderStatusSink;

impl TracingOrderStatusSink {
    pub fn new() -> Self {
        Self
    }
}

impl OrderStatusSink for TracingOrderStatusSink {
    fn update(
        &self,
        order: OrderId,
        status: OrderStatus,
        profile: ProfileId,
        actor: UserId,
    ) -> Result<(), NotifyError> {
        info!(
            order = %order,
            status = ?status,
            profile = %profile,
            actor = %actor,
            "order status update"
        );
        Ok(())
    }
}

/// Realtime publisher that only logs.
#[derive(Debug, Default)]
pub struct TracingRealtimePublisher;

impl TracingRealtimePublisher {
    pub fn new() -> Self {
        Self
    }
}

impl RealtimePublisher for TracingRealtimePublisher {
    fn publish(&self, channel: &str, payload: &JsonValue) -> Result<(), NotifyError> {
        info!(channel, %payload, "realtime publish");
        Ok(())
    }
}
