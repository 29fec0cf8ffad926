//! Slot selection policies and the discriminator fallback chain.
//!
//! Debits walk slots in ascending total, credits in descending total; both
//! consolidate remaining stock onto fuller slots and keep large free
//! balances intact for bigger future orders. Selection is per unit of
//! quantity - one logical line may debit several physical slots.

use crate::slot::StockFilter;
use crate::store::StockTotalStore;
use crate::total::StockTotal;

/// Which slot to pick for one unit-level mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Smallest `total` with `total > 0 && reserve > 0` - releasing a unit of
    /// reserve and total together (stock leaves the warehouse).
    TotalMin,

    /// Largest `total` with `total > 0` - generic fullest-slot fallback.
    TotalMax,

    /// Largest `total` among `reserve > 0` - releasing a unit of reserve
    /// only.
    ReserveMax,

    /// Smallest `total` among `total - reserve > 0` - placing a new
    /// reservation on the slot with the least free headroom.
    SubReserve,
}

impl SlotPolicy {
    /// Whether `row` is a candidate under this policy.
    pub fn admits(&self, row: &StockTotal) -> bool {
        match self {
            SlotPolicy::TotalMin => row.total() > 0 && row.reserve() > 0,
            SlotPolicy::TotalMax => row.total() > 0,
            SlotPolicy::ReserveMax => row.reserve() > 0,
            SlotPolicy::SubReserve => row.available() > 0,
        }
    }

    /// Whether candidates are ranked by descending total.
    pub fn picks_largest_total(&self) -> bool {
        matches!(self, SlotPolicy::TotalMax | SlotPolicy::ReserveMax)
    }
}

/// Locate the slot to mutate next for `filter`, falling back through
/// discriminator levels: modification-specific → variation-specific →
/// offer-specific → bare material. The first level with a candidate wins -
/// mutate against the most specific stock bucket available, else the parent
/// bucket.
pub fn locate<S>(store: &S, filter: &StockFilter, policy: SlotPolicy) -> Option<StockTotal>
where
    S: StockTotalStore + ?Sized,
{
    let mut level = filter.clone();
    loop {
        if let Some(row) = store.find_one(&level, policy) {
            return Some(row);
        }
        level = level.widen()?;
    }
}
