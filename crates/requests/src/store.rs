//! Request lookup / event-to-materials resolver.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockyard_core::StockEventId;

use crate::event::{MaterialLine, StockRequestEvent};
use crate::status::RequestStatus;

/// Read-side contract the core consumes from the excluded request module.
pub trait RequestStore: Send + Sync {
    /// Look up one event snapshot.
    fn lookup(&self, event: StockEventId) -> Option<StockRequestEvent>;

    /// Material lines of the event, **provided** the event currently sits in
    /// `status`.
    ///
    /// Returns an empty vec when the event is absent or its status differs -
    /// this is how each handler self-filters to its own transition without a
    /// shared gatekeeper. Line order is the event's collection order.
    fn materials_for_status(&self, event: StockEventId, status: RequestStatus)
    -> Vec<MaterialLine>;
}

impl<S> RequestStore for Arc<S>
where
    S: RequestStore + ?Sized,
{
    fn lookup(&self, event: StockEventId) -> Option<StockRequestEvent> {
        (**self).lookup(event)
    }

    fn materials_for_status(
        &self,
        event: StockEventId,
        status: RequestStatus,
    ) -> Vec<MaterialLine> {
        (**self).materials_for_status(event, status)
    }
}

/// In-memory request store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    events: RwLock<HashMap<StockEventId, StockRequestEvent>>,
    lines: RwLock<HashMap<StockEventId, Vec<MaterialLine>>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register an event snapshot together with its material lines.
    pub fn insert(&self, event: StockRequestEvent, lines: Vec<MaterialLine>) {
        let id = event.id();
        if let Ok(mut events) = self.events.write() {
            events.insert(id, event);
        }
        if let Ok(mut map) = self.lines.write() {
            map.insert(id, lines);
        }
    }
}

impl RequestStore for InMemoryRequestStore {
    fn lookup(&self, event: StockEventId) -> Option<StockRequestEvent> {
        let events = self.events.read().ok()?;
        events.get(&event).cloned()
    }

    fn materials_for_status(
        &self,
        event: StockEventId,
        status: RequestStatus,
    ) -> Vec<MaterialLine> {
        let current = match self.lookup(event) {
            Some(e) => e,
            None => return vec![],
        };

        if !current.equals_status(status) {
            return vec![];
        }

        self.lines
            .read()
            .ok()
            .and_then(|map| map.get(&event).cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::{MaterialId, ProfileId, StockRequestId};

    fn event(status: RequestStatus) -> StockRequestEvent {
        StockRequestEvent::new(
            StockEventId::new(),
            StockRequestId::new(),
            status,
            ProfileId::new(),
        )
    }

    #[test]
    fn lookup_returns_inserted_snapshot() {
        let store = InMemoryRequestStore::new();
        let ev = event(RequestStatus::Moving);
        store.insert(ev.clone(), vec![]);

        assert_eq!(store.lookup(ev.id()), Some(ev));
    }

    #[test]
    fn materials_match_current_status_only() {
        let store = InMemoryRequestStore::new();
        let ev = event(RequestStatus::Moving);
        let line = MaterialLine::new(MaterialId::new(), 3);
        store.insert(ev.clone(), vec![line.clone()]);

        assert_eq!(
            store.materials_for_status(ev.id(), RequestStatus::Moving),
            vec![line]
        );
        // Another handler asking for its own status sees nothing.
        assert!(
            store
                .materials_for_status(ev.id(), RequestStatus::Package)
                .is_empty()
        );
    }

    #[test]
    fn materials_for_absent_event_are_empty() {
        let store = InMemoryRequestStore::new();
        assert!(
            store
                .materials_for_status(StockEventId::new(), RequestStatus::Incoming)
                .is_empty()
        );
    }

    #[test]
    fn line_order_is_preserved() {
        let store = InMemoryRequestStore::new();
        let ev = event(RequestStatus::Package);
        let first = MaterialLine::new(MaterialId::new(), 1);
        let second = MaterialLine::new(MaterialId::new(), 2);
        store.insert(ev.clone(), vec![first.clone(), second.clone()]);

        assert_eq!(
            store.materials_for_status(ev.id(), RequestStatus::Package),
            vec![first, second]
        );
    }
}
