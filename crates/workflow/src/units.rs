//! Unit-level stock mutation loops.
//!
//! Quantities are walked unit by unit so each unit independently selects its
//! own storage slot - a single logical line may be physically split across
//! several slots. A failed unit is logged critical and ends its line; the
//! caller continues with the next line (failure isolation per line) and a
//! human operator corrects stock from the log.

use tracing::error;

use stockyard_core::{ProfileId, StockEventId};
use stockyard_requests::MaterialLine;
use stockyard_stock::{SlotKey, SlotPolicy, StockFilter, StockTotalStore, locate};

/// Lookup filter for `line` at `profile`.
pub(crate) fn line_filter(profile: ProfileId, line: &MaterialLine) -> StockFilter {
    StockFilter::new(profile, line.material)
        .with_offer(line.offer)
        .with_variation(line.variation)
        .with_modification(line.modification)
}

/// Slot key for `line` at `profile`, including the line's storage label.
pub(crate) fn line_slot_key(profile: ProfileId, line: &MaterialLine) -> SlotKey {
    let mut key = SlotKey::new(profile, line.material);
    if let Some(offer) = line.offer {
        key = key.with_offer(offer);
    }
    if let Some(variation) = line.variation {
        key = key.with_variation(variation);
    }
    if let Some(modification) = line.modification {
        key = key.with_modification(modification);
    }
    if let Some(storage) = &line.storage {
        key = key.with_storage(storage);
    }
    key
}

/// Reserve `line.quantity` units at `profile`, least free headroom first.
pub(crate) fn reserve_line<S>(stock: &S, profile: ProfileId, line: &MaterialLine, event: StockEventId)
where
    S: StockTotalStore + ?Sized,
{
    let filter = line_filter(profile, line);

    for unit in 1..=line.quantity {
        let Some(row) = locate(stock, &filter, SlotPolicy::SubReserve) else {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                offer = ?line.offer,
                variation = ?line.variation,
                modification = ?line.modification,
                unit,
                quantity = line.quantity,
                "no slot with free stock to reserve"
            );
            return;
        };

        if stock.add_reserve(row.id(), 1) == 0 {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                slot = %row.id(),
                unit,
                quantity = line.quantity,
                "reserve rejected by stock predicate"
            );
            return;
        }
    }
}

/// Withdraw `line.quantity` units at `profile`: release reserve and subtract
/// total together, scarcest stocked-and-reserved slot first.
pub(crate) fn withdraw_line<S>(
    stock: &S,
    profile: ProfileId,
    line: &MaterialLine,
    event: StockEventId,
) where
    S: StockTotalStore + ?Sized,
{
    let filter = line_filter(profile, line);

    for unit in 1..=line.quantity {
        let Some(row) = locate(stock, &filter, SlotPolicy::TotalMin) else {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                offer = ?line.offer,
                variation = ?line.variation,
                modification = ?line.modification,
                unit,
                quantity = line.quantity,
                "no reserved slot to withdraw from"
            );
            return;
        };

        // Reserve first: the predicate `reserve <= total` then admits the
        // total subtraction on the same row.
        if stock.sub_reserve(row.id(), 1) == 0 {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                slot = %row.id(),
                unit,
                quantity = line.quantity,
                "reserve release rejected by stock predicate"
            );
            return;
        }

        if stock.sub_total(row.id(), 1) == 0 {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                slot = %row.id(),
                unit,
                quantity = line.quantity,
                "total subtraction rejected by stock predicate"
            );
            return;
        }
    }
}

/// Release `line.quantity` units of reserve only at `profile`, fullest
/// reserved slot first; totals stay put.
pub(crate) fn release_line<S>(
    stock: &S,
    profile: ProfileId,
    line: &MaterialLine,
    event: StockEventId,
) where
    S: StockTotalStore + ?Sized,
{
    let filter = line_filter(profile, line);

    for unit in 1..=line.quantity {
        let Some(row) = locate(stock, &filter, SlotPolicy::ReserveMax) else {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                offer = ?line.offer,
                variation = ?line.variation,
                modification = ?line.modification,
                unit,
                quantity = line.quantity,
                "no reserved slot to release"
            );
            return;
        };

        if stock.sub_reserve(row.id(), 1) == 0 {
            error!(
                critical = true,
                event = %event,
                profile = %profile,
                material = %line.material,
                slot = %row.id(),
                unit,
                quantity = line.quantity,
                "reserve release rejected by stock predicate"
            );
            return;
        }
    }
}
