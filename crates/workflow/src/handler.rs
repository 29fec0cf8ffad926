//! Status-change handler contract and the shared transition preamble.

use tracing::{debug, warn};

use stockyard_events::{DedupToken, Deduplicator};
use stockyard_requests::{
    MaterialLine, RequestStatus, RequestStore, StatusChangeMessage, StockRequestEvent,
};

use crate::error::WorkflowError;

/// One handler per status transition.
///
/// Handlers subscribe to the status-change signal and are a no-op unless the
/// message's event currently sits in the status they care about - every
/// handler self-filters, there is no shared gatekeeper beyond the dispatch
/// table.
pub trait StatusChangeHandler: Send + Sync {
    /// Stable handler identity; part of the deduplication key, so renaming
    /// it re-applies transitions in flight.
    fn name(&self) -> &'static str;

    /// Status this handler reacts to.
    fn status(&self) -> RequestStatus;

    fn handle(&self, message: &StatusChangeMessage) -> Result<(), WorkflowError>;
}

/// Transition context after the common preamble passed.
pub(crate) struct Prepared {
    pub event: StockRequestEvent,
    pub lines: Vec<MaterialLine>,
    pub token: DedupToken,
}

/// The preamble every handler runs before touching stock:
///
/// 1. load the event - absent or status-mismatched is a silent no-op;
/// 2. resolve the material lines for the status - empty is a warning no-op;
/// 3. derive the deduplication token - already-executed is a no-op.
///
/// Returns `None` for every no-op case; the caller mutates stock and then
/// saves `token`.
pub(crate) fn prepare<R, D>(
    requests: &R,
    dedup: &D,
    message: &StatusChangeMessage,
    status: RequestStatus,
    handler: &'static str,
) -> Option<Prepared>
where
    R: RequestStore,
    D: Deduplicator,
{
    let Some(event) = requests.lookup(message.event()) else {
        debug!(handler, event = %message.event(), "event not found, skipping");
        return None;
    };

    if !event.equals_status(status) {
        debug!(
            handler,
            event = %event.id(),
            status = %event.status(),
            expected = %status,
            "status mismatch, skipping"
        );
        return None;
    }

    let lines = requests.materials_for_status(message.event(), status);
    if lines.is_empty() {
        warn!(
            handler,
            event = %event.id(),
            status = %status,
            "no material lines for status"
        );
        return None;
    }

    let event_id = message.event().to_string();
    let token = dedup.key(&[&event_id, status.name(), handler]);
    if dedup.is_executed(&token) {
        debug!(handler, event = %event.id(), token = %token, "already executed");
        return None;
    }

    Some(Prepared {
        event,
        lines,
        token,
    })
}
