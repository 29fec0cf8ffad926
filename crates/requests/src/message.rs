//! Status-change notification message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{StockEventId, StockRequestId};

/// Notification that a stock request changed status.
///
/// Published by the excluded use-case layer after it persisted the new
/// [`StockRequestEvent`] snapshot. The event id doubles as the message
/// identity for deduplication: a redelivery carries the same event id.
///
/// [`StockRequestEvent`]: crate::StockRequestEvent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeMessage {
    event: StockEventId,
    previous: Option<StockEventId>,
    request: StockRequestId,
    occurred_at: DateTime<Utc>,
}

impl StatusChangeMessage {
    pub fn new(
        event: StockEventId,
        previous: Option<StockEventId>,
        request: StockRequestId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event,
            previous,
            request,
            occurred_at,
        }
    }

    /// The snapshot the request is currently in.
    pub fn event(&self) -> StockEventId {
        self.event
    }

    /// The superseded snapshot, when the request had one.
    pub fn previous(&self) -> Option<StockEventId> {
        self.previous
    }

    pub fn request(&self) -> StockRequestId {
        self.request
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
