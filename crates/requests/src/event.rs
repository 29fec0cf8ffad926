//! Stock-request event snapshot and material lines.
//!
//! These records are **read-only to the core**: the excluded use-case layer
//! owns the request aggregate and emits one immutable snapshot per status
//! change. The core never navigates an object graph - related records are
//! referenced by id and resolved through explicit lookups.

use serde::{Deserialize, Serialize};

use stockyard_core::{
    MaterialId, ModificationConst, OfferConst, OrderId, ProfileId, StockEventId, StockRequestId,
    VariationConst,
};

use crate::status::RequestStatus;

/// Immutable snapshot of a stock request at one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequestEvent {
    id: StockEventId,
    request: StockRequestId,
    status: RequestStatus,

    /// Warehouse context the event acts in (shipping profile for moves,
    /// packaging profile for packaging, receiving profile for incoming).
    profile: ProfileId,

    /// Customer order this request fulfils, when order-linked.
    order: Option<OrderId>,

    /// Destination warehouse of an inter-warehouse move.
    destination: Option<ProfileId>,

    /// The snapshot this one superseded (carries the "last status" context).
    previous: Option<StockEventId>,
}

impl StockRequestEvent {
    pub fn new(
        id: StockEventId,
        request: StockRequestId,
        status: RequestStatus,
        profile: ProfileId,
    ) -> Self {
        Self {
            id,
            request,
            status,
            profile,
            order: None,
            destination: None,
            previous: None,
        }
    }

    pub fn with_order(mut self, order: OrderId) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_destination(mut self, destination: ProfileId) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_previous(mut self, previous: StockEventId) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn id(&self) -> StockEventId {
        self.id
    }

    pub fn request(&self) -> StockRequestId {
        self.request
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Whether this snapshot currently sits in `status`.
    ///
    /// Handlers use this to self-filter: a redelivered or stale message for
    /// another status is a silent no-op.
    pub fn equals_status(&self, status: RequestStatus) -> bool {
        self.status == status
    }

    pub fn profile(&self) -> ProfileId {
        self.profile
    }

    pub fn order(&self) -> Option<OrderId> {
        self.order
    }

    pub fn destination(&self) -> Option<ProfileId> {
        self.destination
    }

    pub fn previous(&self) -> Option<StockEventId> {
        self.previous
    }
}

/// One material line within a stock-request event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub material: MaterialId,
    pub offer: Option<OfferConst>,
    pub variation: Option<VariationConst>,
    pub modification: Option<ModificationConst>,

    /// Non-negative unit count; a line's quantity may be physically split
    /// across several storage slots.
    pub quantity: u32,

    /// Free-text storage-slot label; set on incoming flows only.
    pub storage: Option<String>,
}

impl MaterialLine {
    pub fn new(material: MaterialId, quantity: u32) -> Self {
        Self {
            material,
            offer: None,
            variation: None,
            modification: None,
            quantity,
            storage: None,
        }
    }

    pub fn with_offer(mut self, offer: OfferConst) -> Self {
        self.offer = Some(offer);
        self
    }

    pub fn with_variation(mut self, variation: VariationConst) -> Self {
        self.variation = Some(variation);
        self
    }

    pub fn with_modification(mut self, modification: ModificationConst) -> Self {
        self.modification = Some(modification);
        self
    }

    pub fn with_storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }
}
