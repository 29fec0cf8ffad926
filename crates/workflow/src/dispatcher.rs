//! Status-keyed handler dispatch table.
//!
//! Replaces framework attribute registration: handlers are registered
//! explicitly at process startup, keyed by the status they subscribe to.

use std::collections::HashMap;

use tracing::{debug, warn};

use stockyard_requests::{RequestStatus, RequestStore, StatusChangeMessage};

use crate::error::WorkflowError;
use crate::handler::StatusChangeHandler;

/// Routes a status-change message to every handler registered for the
/// event's current status.
pub struct StatusDispatcher<R>
where
    R: RequestStore,
{
    requests: R,
    handlers: HashMap<RequestStatus, Vec<Box<dyn StatusChangeHandler>>>,
}

impl<R> StatusDispatcher<R>
where
    R: RequestStore,
{
    pub fn new(requests: R) -> Self {
        Self {
            requests,
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under the status it subscribes to.
    pub fn register(&mut self, handler: Box<dyn StatusChangeHandler>) {
        self.handlers
            .entry(handler.status())
            .or_default()
            .push(handler);
    }

    /// Number of registered handlers, all statuses.
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch one message.
    ///
    /// A structural handler error aborts the remaining handlers for this
    /// message; redelivery retries them all, and the deduplicator skips the
    /// ones that already completed.
    pub fn dispatch(&self, message: &StatusChangeMessage) -> Result<(), WorkflowError> {
        let Some(event) = self.requests.lookup(message.event()) else {
            warn!(event = %message.event(), "status change for unknown event");
            return Ok(());
        };

        let Some(handlers) = self.handlers.get(&event.status()) else {
            debug!(event = %event.id(), status = %event.status(), "no handlers for status");
            return Ok(());
        };

        for handler in handlers {
            handler.handle(message)?;
        }

        Ok(())
    }
}
