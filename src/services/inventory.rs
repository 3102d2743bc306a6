//! Inventory ledger
//!
//! Attaches parts to units and keeps part stock in step. An attach that
//! can't be covered by stock is still recorded, as a pending use, and
//! leaves stock alone.

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{TraxError, TraxResult};
use crate::models::{Money, Part, PartId, PartUse, PartUseId, UnitId};
use crate::storage::Storage;

/// What an attach did to stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// Stock covered the quantity and was decremented
    Decremented,
    /// Not enough stock; the use was recorded and stock left unchanged
    PendingNoStock,
}

/// Result of attaching a part to a unit
#[derive(Debug, Clone)]
pub struct AttachResult {
    pub part_use: PartUse,
    pub outcome: UseOutcome,
    /// Stock level after the attach
    pub qty_on_hand: u32,
}

/// Result of removing a use
#[derive(Debug, Clone)]
pub struct RemoveResult {
    pub part_use: PartUse,
    /// Whether the quantity went back into stock
    pub credited: bool,
}

/// Service for part consumption
pub struct InventoryService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
}

impl<'a> InventoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_clock(storage, &SystemClock)
    }

    pub fn with_clock(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// Record `qty` of a part as used by a unit
    ///
    /// The stock change, the new use and the unit's activity timestamp are
    /// committed together or not at all.
    pub fn attach(
        &self,
        part_id: PartId,
        unit_id: UnitId,
        qty: u32,
        notes: &str,
    ) -> TraxResult<AttachResult> {
        if qty == 0 {
            return Err(TraxError::Validation(
                "Use quantity must be at least 1".into(),
            ));
        }

        let part = self
            .storage
            .parts
            .get(part_id)?
            .ok_or_else(|| TraxError::part_not_found(part_id.to_string()))?;

        if !self.storage.units.exists(unit_id)? {
            return Err(TraxError::unit_not_found(unit_id.to_string()));
        }

        let now = self.clock.now();
        let result = self.storage.transaction(|s| {
            let remaining = part.qty_on_hand.checked_sub(qty);
            let outcome = match remaining {
                Some(left) => {
                    s.parts.modify(part_id, |p| p.qty_on_hand = left)?;
                    UseOutcome::Decremented
                }
                None => UseOutcome::PendingNoStock,
            };

            let part_use = PartUse {
                id: PartUseId::new(),
                unit_id,
                part_id: Some(part_id),
                use_qty: qty,
                cost_snapshot: part.cost,
                stock_decremented: outcome == UseOutcome::Decremented,
                notes: notes.trim().to_string(),
                created_at: now,
            };
            s.part_uses.upsert(part_use.clone())?;
            s.units.modify(unit_id, |u| u.touch(now))?;

            Ok(AttachResult {
                part_use,
                outcome,
                qty_on_hand: remaining.unwrap_or(part.qty_on_hand),
            })
        })?;

        match result.outcome {
            UseOutcome::Decremented => info!(
                sku = %part.sku,
                qty,
                remaining = result.qty_on_hand,
                "attached part"
            ),
            UseOutcome::PendingNoStock => warn!(
                sku = %part.sku,
                qty,
                on_hand = part.qty_on_hand,
                "attached part without stock; use is pending"
            ),
        }

        Ok(result)
    }

    /// Delete a use, crediting its quantity back if it had been taken from stock
    ///
    /// When the part no longer exists the quantity is simply dropped.
    pub fn remove(&self, use_id: PartUseId) -> TraxResult<RemoveResult> {
        let part_use = self.storage.part_uses.require(use_id)?;
        let now = self.clock.now();

        let credited = self.storage.transaction(|s| {
            let mut credited = false;
            if part_use.stock_decremented {
                match part_use.part_id {
                    Some(part_id) if s.parts.exists(part_id)? => {
                        s.parts.modify(part_id, |p| {
                            p.qty_on_hand = p.qty_on_hand.saturating_add(part_use.use_qty)
                        })?;
                        credited = true;
                    }
                    _ => debug!(use_id = %use_id, qty = part_use.use_qty, "part gone; stock not credited"),
                }
            }

            s.part_uses.delete(use_id)?;
            s.units.modify(part_use.unit_id, |u| u.touch(now))?;
            Ok(credited)
        })?;

        info!(use_id = %use_id, credited, "removed part use");
        Ok(RemoveResult { part_use, credited })
    }

    /// Add stock to a part
    pub fn restock(&self, part_id: PartId, qty: u32) -> TraxResult<Part> {
        if qty == 0 {
            return Err(TraxError::Validation(
                "Restock quantity must be at least 1".into(),
            ));
        }

        let part = self
            .storage
            .parts
            .get(part_id)?
            .ok_or_else(|| TraxError::part_not_found(part_id.to_string()))?;

        let new_qty = part.qty_on_hand.checked_add(qty).ok_or_else(|| {
            TraxError::Validation(format!("Stock for '{}' would overflow", part.sku))
        })?;

        self.storage.transaction(|s| {
            s.parts.modify(part_id, |p| p.qty_on_hand = new_qty)?;
            Ok(())
        })?;

        info!(sku = %part.sku, added = qty, on_hand = new_qty, "restocked part");
        Ok(Part {
            qty_on_hand: new_qty,
            ..part
        })
    }

    /// Uses recorded against a unit, oldest first
    pub fn uses_for_unit(&self, unit_id: UnitId) -> TraxResult<Vec<PartUse>> {
        self.storage.part_uses.for_unit(unit_id)
    }

    /// Total parts cost for a unit at the captured snapshot prices
    pub fn parts_cost(&self, unit_id: UnitId) -> TraxResult<Money> {
        Ok(self
            .uses_for_unit(unit_id)?
            .iter()
            .map(PartUse::total_cost)
            .sum())
    }

    /// Uses still waiting on stock whose part still exists
    pub fn pending_uses(&self) -> TraxResult<Vec<PartUse>> {
        let pending = self.storage.part_uses.find_where(|u| u.is_pending())?;
        let mut live = Vec::with_capacity(pending.len());
        for part_use in pending {
            if let Some(part_id) = part_use.part_id {
                if self.storage.parts.exists(part_id)? {
                    live.push(part_use);
                }
            }
        }
        Ok(live)
    }
}
