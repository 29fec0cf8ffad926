//! Transition deduplication (idempotency guard).
//!
//! Every status transition is applied to stock totals **at most once**, even
//! under at-least-once message delivery. The guard is a persisted token keyed
//! by (message identity, status name, handler identity):
//!
//! - `is_executed` is checked *before* any stock mutation
//! - `save` is called only *after all* mutations for the transition ran
//!
//! A crash between the two leaves no token behind, so the redelivered message
//! is retried in full rather than silently skipped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deriving deduplication tokens (UUIDv5).
const DEDUP_NAMESPACE: Uuid = Uuid::from_u128(0x8f1d_2c6a_74e3_4b0f_9a5d_31c8_e6f2_0b47);

/// Deterministic idempotency token for one applied transition.
///
/// Equal key parts always derive the equal token, across processes and
/// restarts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupToken(Uuid);

impl DedupToken {
    /// Derive a token from ordered key parts.
    ///
    /// Parts are joined with a unit separator before hashing so that
    /// `["ab", "c"]` and `["a", "bc"]` derive distinct tokens.
    pub fn derive(parts: &[&str]) -> Self {
        let joined = parts.join("\u{1f}");
        Self(Uuid::new_v5(&DEDUP_NAMESPACE, joined.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for DedupToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Idempotency guard for status transitions.
pub trait Deduplicator: Send + Sync {
    /// Build the token for a transition's key parts.
    fn key(&self, parts: &[&str]) -> DedupToken {
        DedupToken::derive(parts)
    }

    /// Whether the transition behind `token` has already been applied.
    fn is_executed(&self, token: &DedupToken) -> bool;

    /// Record the transition as applied.
    ///
    /// Callers invoke this only after every mutation of the transition ran.
    fn save(&self, token: DedupToken);
}

impl<D> Deduplicator for Arc<D>
where
    D: Deduplicator + ?Sized,
{
    fn is_executed(&self, token: &DedupToken) -> bool {
        (**self).is_executed(token)
    }

    fn save(&self, token: DedupToken) {
        (**self).save(token)
    }
}

/// In-memory deduplicator for tests/dev.
///
/// Keeps the applied-at stamp per token; a persistent implementation would
/// store the same record in a table with the token as primary key.
#[derive(Debug, Default)]
pub struct InMemoryDeduplicator {
    executed: RwLock<HashMap<DedupToken, DateTime<Utc>>>,
}

impl InMemoryDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// When the transition behind `token` was recorded, if ever.
    pub fn executed_at(&self, token: &DedupToken) -> Option<DateTime<Utc>> {
        self.executed.read().ok()?.get(token).copied()
    }
}

impl Deduplicator for InMemoryDeduplicator {
    fn is_executed(&self, token: &DedupToken) -> bool {
        self.executed
            .read()
            .map(|map| map.contains_key(token))
            .unwrap_or(false)
    }

    fn save(&self, token: DedupToken) {
        if let Ok(mut map) = self.executed.write() {
            map.entry(token).or_insert_with(Utc::now);
        }
    }
}
