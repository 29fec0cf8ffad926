//! StockTotal store: predicate-guarded mutations over storage-slot rows.
//!
//! Every mutation is a single conditional update whose predicate ensures the
//! post-condition `total >= 0 && reserve >= 0 && reserve <= total`. The
//! affected-row count is the whole result: `0` means "precondition failed",
//! which callers log as critical and never raise. No caller is permitted to
//! read a row and write back a computed absolute value.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use stockyard_core::{ProfileId, StockTotalId};

use crate::locator::SlotPolicy;
use crate::slot::{SlotKey, StockFilter};
use crate::total::StockTotal;

/// Directory of known profiles (warehouses/owners).
///
/// Slot creation consults it: incoming stock for an unknown profile is a
/// data-integrity problem upstream, not a contention scenario.
pub trait ProfileDirectory: Send + Sync {
    fn contains(&self, profile: ProfileId) -> bool;
}

impl<P> ProfileDirectory for Arc<P>
where
    P: ProfileDirectory + ?Sized,
{
    fn contains(&self, profile: ProfileId) -> bool {
        (**self).contains(profile)
    }
}

/// Fixed profile set for tests/dev.
#[derive(Debug, Default)]
pub struct StaticProfileDirectory {
    profiles: HashSet<ProfileId>,
}

impl StaticProfileDirectory {
    pub fn new(profiles: impl IntoIterator<Item = ProfileId>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
        }
    }
}

impl ProfileDirectory for StaticProfileDirectory {
    fn contains(&self, profile: ProfileId) -> bool {
        self.profiles.contains(&profile)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockStoreError {
    /// Slot creation referenced a profile the directory does not know.
    #[error("unknown profile: {0}")]
    UnknownProfile(ProfileId),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Storage-slot stock records, keyed by [`SlotKey`].
pub trait StockTotalStore: Send + Sync {
    /// Exact-key lookup (including the storage label).
    fn find(&self, key: &SlotKey) -> Option<StockTotal>;

    /// Row lookup by id (snapshot).
    fn get(&self, id: StockTotalId) -> Option<StockTotal>;

    /// Create the zero row for `key`.
    ///
    /// Lazily called on first incoming stock. When a concurrent writer
    /// created the row first, the existing row is returned. An unknown
    /// profile is a hard failure.
    fn create(&self, key: SlotKey) -> Result<StockTotal, StockStoreError>;

    /// `total += qty`. Fails (0 affected) only on counter overflow.
    fn add_total(&self, id: StockTotalId, qty: u32) -> usize;

    /// `reserve += qty`, provided `reserve + qty <= total`.
    fn add_reserve(&self, id: StockTotalId, qty: u32) -> usize;

    /// `total -= qty`, provided `total - qty >= reserve` (and `>= 0`).
    fn sub_total(&self, id: StockTotalId, qty: u32) -> usize;

    /// `reserve -= qty`, provided `reserve >= qty`.
    fn sub_reserve(&self, id: StockTotalId, qty: u32) -> usize;

    /// Single-slot lookup at the filter's own discriminator level, selected
    /// per `policy`. Deterministic under ties (row-id order).
    fn find_one(&self, filter: &StockFilter, policy: SlotPolicy) -> Option<StockTotal>;

    /// Snapshot of all rows of one profile, for stock reports.
    fn list_by_profile(&self, profile: ProfileId) -> Vec<StockTotal>;
}

impl<S> StockTotalStore for Arc<S>
where
    S: StockTotalStore + ?Sized,
{
    fn find(&self, key: &SlotKey) -> Option<StockTotal> {
        (**self).find(key)
    }

    fn get(&self, id: StockTotalId) -> Option<StockTotal> {
        (**self).get(id)
    }

    fn create(&self, key: SlotKey) -> Result<StockTotal, StockStoreError> {
        (**self).create(key)
    }

    fn add_total(&self, id: StockTotalId, qty: u32) -> usize {
        (**self).add_total(id, qty)
    }

    fn add_reserve(&self, id: StockTotalId, qty: u32) -> usize {
        (**self).add_reserve(id, qty)
    }

    fn sub_total(&self, id: StockTotalId, qty: u32) -> usize {
        (**self).sub_total(id, qty)
    }

    fn sub_reserve(&self, id: StockTotalId, qty: u32) -> usize {
        (**self).sub_reserve(id, qty)
    }

    fn find_one(&self, filter: &StockFilter, policy: SlotPolicy) -> Option<StockTotal> {
        (**self).find_one(filter, policy)
    }

    fn list_by_profile(&self, profile: ProfileId) -> Vec<StockTotal> {
        (**self).list_by_profile(profile)
    }
}

/// In-memory stock-total store for tests/dev.
///
/// A row-level write lock stands in for the database's conditional UPDATE;
/// the predicate/affected-count contract is identical.
#[derive(Debug)]
pub struct InMemoryStockTotalStore<P>
where
    P: ProfileDirectory,
{
    profiles: P,
    rows: RwLock<HashMap<StockTotalId, StockTotal>>,
}

impl<P> InMemoryStockTotalStore<P>
where
    P: ProfileDirectory,
{
    pub fn new(profiles: P) -> Self {
        Self {
            profiles,
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Conditional read-modify-write on one row.
    ///
    /// `update` returns the new `(total, reserve)` pair when the predicate
    /// holds. Returns the affected-row count.
    fn update_row(&self, id: StockTotalId, update: impl Fn(u32, u32) -> Option<(u32, u32)>) -> usize {
        let mut rows = match self.rows.write() {
            Ok(rows) => rows,
            Err(_) => return 0,
        };

        let Some(row) = rows.get_mut(&id) else {
            return 0;
        };

        match update(row.total(), row.reserve()) {
            Some((total, reserve)) => {
                row.set_counts(total, reserve);
                1
            }
            None => 0,
        }
    }
}

impl<P> StockTotalStore for InMemoryStockTotalStore<P>
where
    P: ProfileDirectory,
{
    fn find(&self, key: &SlotKey) -> Option<StockTotal> {
        let rows = self.rows.read().ok()?;
        rows.values().find(|row| row.key() == key).cloned()
    }

    fn get(&self, id: StockTotalId) -> Option<StockTotal> {
        let rows = self.rows.read().ok()?;
        rows.get(&id).cloned()
    }

    fn create(&self, key: SlotKey) -> Result<StockTotal, StockStoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StockStoreError::Storage("lock poisoned".into()))?;

        // Re-check under the write lock: first writer wins.
        if let Some(existing) = rows.values().find(|row| *row.key() == key) {
            return Ok(existing.clone());
        }

        if !self.profiles.contains(key.profile()) {
            return Err(StockStoreError::UnknownProfile(key.profile()));
        }

        let row = StockTotal::new(StockTotalId::new(), key);
        rows.insert(row.id(), row.clone());
        Ok(row)
    }

    fn add_total(&self, id: StockTotalId, qty: u32) -> usize {
        self.update_row(id, |total, reserve| {
            total.checked_add(qty).map(|t| (t, reserve))
        })
    }

    fn add_reserve(&self, id: StockTotalId, qty: u32) -> usize {
        self.update_row(id, |total, reserve| {
            let next = reserve.checked_add(qty)?;
            (next <= total).then_some((total, next))
        })
    }

    fn sub_total(&self, id: StockTotalId, qty: u32) -> usize {
        self.update_row(id, |total, reserve| {
            let next = total.checked_sub(qty)?;
            (next >= reserve).then_some((next, reserve))
        })
    }

    fn sub_reserve(&self, id: StockTotalId, qty: u32) -> usize {
        self.update_row(id, |total, reserve| {
            reserve.checked_sub(qty).map(|r| (total, r))
        })
    }

    fn find_one(&self, filter: &StockFilter, policy: SlotPolicy) -> Option<StockTotal> {
        let rows = self.rows.read().ok()?;

        let mut candidates: Vec<&StockTotal> = rows
            .values()
            .filter(|row| filter.matches(row.key()) && policy.admits(row))
            .collect();

        // Deterministic order: total first, row id as tie-break.
        candidates.sort_by_key(|row| (row.total(), *row.id().as_uuid().as_bytes()));

        let picked = if policy.picks_largest_total() {
            candidates.last()
        } else {
            candidates.first()
        };

        picked.map(|row| (*row).clone())
    }

    fn list_by_profile(&self, profile: ProfileId) -> Vec<StockTotal> {
        let rows = match self.rows.read() {
            Ok(rows) => rows,
            Err(_) => return vec![],
        };

        let mut out: Vec<StockTotal> = rows
            .values()
            .filter(|row| row.key().profile() == profile)
            .cloned()
            .collect();

        out.sort_by_key(|row| {
            (
                *row.key().material().as_uuid().as_bytes(),
                *row.id().as_uuid().as_bytes(),
            )
        });
        out
    }
}
