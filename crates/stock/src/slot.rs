//! Storage-slot identity and lookup filters.

use serde::{Deserialize, Serialize};

use stockyard_core::{MaterialId, ModificationConst, OfferConst, ProfileId, VariationConst};

/// Normalize a free-text storage-slot label for comparison.
///
/// Labels come from hand-filled warehouse forms; "  Rack A1 " and "rack a1"
/// are the same physical slot.
pub fn normalize_storage(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Identity of one storage-slot stock record.
///
/// The discriminator consts mirror the trade-offer hierarchy below a
/// material: a key either carries a discriminator level or it does not, and
/// rows at different levels are distinct stock buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    profile: ProfileId,
    material: MaterialId,
    offer: Option<OfferConst>,
    variation: Option<VariationConst>,
    modification: Option<ModificationConst>,
    storage: Option<String>,
}

impl SlotKey {
    pub fn new(profile: ProfileId, material: MaterialId) -> Self {
        Self {
            profile,
            material,
            offer: None,
            variation: None,
            modification: None,
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

    /// Attach a storage-slot label; the label is normalized on the way in.
    pub fn with_storage(mut self, label: &str) -> Self {
        let normalized = normalize_storage(label);
        self.storage = (!normalized.is_empty()).then_some(normalized);
        self
    }

    pub fn profile(&self) -> ProfileId {
        self.profile
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn offer(&self) -> Option<OfferConst> {
        self.offer
    }

    pub fn variation(&self) -> Option<VariationConst> {
        self.variation
    }

    pub fn modification(&self) -> Option<ModificationConst> {
        self.modification
    }

    pub fn storage(&self) -> Option<&str> {
        self.storage.as_deref()
    }
}

/// Lookup filter over the stock of one (profile, material) pair.
///
/// A filter matches rows at exactly its own discriminator level: included
/// discriminators must be equal, more specific ones must be absent. Widening
/// a filter drops its most specific discriminator, moving the lookup to the
/// parent stock bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockFilter {
    profile: ProfileId,
    material: MaterialId,
    offer: Option<OfferConst>,
    variation: Option<VariationConst>,
    modification: Option<ModificationConst>,
}

impl StockFilter {
    pub fn new(profile: ProfileId, material: MaterialId) -> Self {
        Self {
            profile,
            material,
            offer: None,
            variation: None,
            modification: None,
        }
    }

    pub fn with_offer(mut self, offer: Option<OfferConst>) -> Self {
        self.offer = offer;
        self
    }

    pub fn with_variation(mut self, variation: Option<VariationConst>) -> Self {
        self.variation = variation;
        self
    }

    pub fn with_modification(mut self, modification: Option<ModificationConst>) -> Self {
        self.modification = modification;
        self
    }

    pub fn profile(&self) -> ProfileId {
        self.profile
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Whether `key` sits at this filter's discriminator level.
    pub fn matches(&self, key: &SlotKey) -> bool {
        self.profile == key.profile()
            && self.material == key.material()
            && self.offer == key.offer()
            && self.variation == key.variation()
            && self.modification == key.modification()
    }

    /// Drop the most specific discriminator still present.
    ///
    /// Returns `None` once the filter is already at the bare-material level.
    pub fn widen(&self) -> Option<StockFilter> {
        let mut next = self.clone();
        if next.modification.take().is_some() {
            return Some(next);
        }
        if next.variation.take().is_some() {
            return Some(next);
        }
        if next.offer.take().is_some() {
            return Some(next);
        }
        None
    }
}
