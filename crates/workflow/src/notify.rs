//! Downstream notifiers, invoked only after a transition completed.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use stockyard_core::{OrderId, ProfileId, UserId};

/// Order statuses the stock workflow pushes downstream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order sent for packaging.
    Package,
    /// Order packed, ready for pickup/hand-off.
    Extradition,
    /// Order delivered.
    Completed,
    Canceled,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Order-status update sink (the excluded orders module).
pub trait OrderStatusSink: Send + Sync {
    fn update(
        &self,
        order: OrderId,
        status: OrderStatus,
        profile: ProfileId,
        actor: UserId,
    ) -> Result<(), NotifyError>;
}

impl<O> OrderStatusSink for Arc<O>
where
    O: OrderStatusSink + ?Sized,
{
    fn update(
        &self,
        order: OrderId,
        status: OrderStatus,
        profile: ProfileId,
        actor: UserId,
    ) -> Result<(), NotifyError> {
        (**self).update(order, status, profile, actor)
    }
}

/// Fire-and-forget realtime publish (hides in-flight requests from other
/// operators' screens). Failures are logged by callers, never fatal.
pub trait RealtimePublisher: Send + Sync {
    fn publish(&self, channel: &str, payload: &JsonValue) -> Result<(), NotifyError>;
}

impl<P> RealtimePublisher for Arc<P>
where
    P: RealtimePublisher + ?Sized,
{
    fn publish(&self, channel: &str, payload: &JsonValue) -> Result<(), NotifyError> {
        (**self).publish(channel, payload)
    }
}

/// In-memory order-status sink for tests/dev.
#[derive(Debug, Default)]
pub struct RecordingOrderStatusSink {
    updates: RwLock<Vec<(OrderId, OrderStatus, ProfileId, UserId)>>,
}

impl RecordingOrderStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn updates(&self) -> Vec<(OrderId, OrderStatus, ProfileId, UserId)> {
        self.updates.read().map(|u| u.clone()).unwrap_or_default()
    }
}

impl OrderStatusSink for RecordingOrderStatusSink {
    fn update(
        &self,
        order: OrderId,
        status: OrderStatus,
        profile: ProfileId,
        actor: UserId,
    ) -> Result<(), NotifyError> {
        self.updates
            .write()
            .map_err(|_| NotifyError("lock poisoned".into()))?
            .push((order, status, profile, actor));
        Ok(())
    }
}

/// In-memory realtime publisher for tests/dev.
#[derive(Debug, Default)]
pub struct RecordingRealtimePublisher {
    published: RwLock<Vec<(String, JsonValue)>>,
}

impl RecordingRealtimePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn published(&self) -> Vec<(String, JsonValue)> {
        self.published.read().map(|p| p.clone()).unwrap_or_default()
    }
}

impl RealtimePublisher for RecordingRealtimePublisher {
    fn publish(&self, channel: &str, payload: &JsonValue) -> Result<(), NotifyError> {
        self.published
            .write()
            .map_err(|_| NotifyError("lock poisoned".into()))?
            .push((channel.to_string(), payload.clone()));
        Ok(())
    }
}
