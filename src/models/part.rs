//! Part and part-use models
//!
//! Parts are stocked items consumed by repairs. A `PartUse` records one
//! consumption against a unit, with the part cost captured at attach time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{PartId, PartUseId, UnitId};
use super::money::Money;

/// A stocked repair part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,

    pub name: String,

    pub brand: Option<String>,

    /// Natural key; unique among parts at creation time
    pub sku: String,

    #[serde(default)]
    pub qty_on_hand: u32,

    #[serde(default)]
    pub cost: Money,

    #[serde(default)]
    pub notes: String,
}

impl Part {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            id: PartId::new(),
            name: name.into(),
            brand: None,
            sku: sku.into(),
            qty_on_hand: 0,
            cost: Money::zero(),
            notes: String::new(),
        }
    }

    pub fn with_stock(mut self, qty_on_hand: u32, cost: Money) -> Self {
        self.qty_on_hand = qty_on_hand;
        self.cost = cost;
        self
    }

    /// Case-insensitive match against name and SKU
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty() || self.name.to_lowercase().contains(&q) || self.sku.to_lowercase().contains(&q)
    }

    pub fn validate(&self) -> Result<(), PartValidationError> {
        if self.name.trim().is_empty() {
            return Err(PartValidationError::EmptyName);
        }
        if self.sku.trim().is_empty() {
            return Err(PartValidationError::EmptySku);
        }
        if self.cost.is_negative() {
            return Err(PartValidationError::NegativeCost);
        }
        Ok(())
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.sku)
    }
}

/// Validation errors for parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValidationError {
    EmptyName,
    EmptySku,
    NegativeCost,
}

impl fmt::Display for PartValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Part name cannot be empty"),
            Self::EmptySku => write!(f, "Part SKU cannot be empty"),
            Self::NegativeCost => write!(f, "Part cost cannot be negative"),
        }
    }
}

impl std::error::Error for PartValidationError {}

/// A part consumed by a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUse {
    pub id: PartUseId,

    /// Owning unit
    pub unit_id: UnitId,

    /// Non-owning reference; `None` once the part is deleted or unmatched on restore
    pub part_id: Option<PartId>,

    pub use_qty: u32,

    /// Part cost at the moment of attach
    pub cost_snapshot: Money,

    /// Whether `use_qty` was subtracted from stock at attach time
    pub stock_decremented: bool,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

impl PartUse {
    /// Extended cost of this use (quantity × snapshot)
    pub fn total_cost(&self) -> Money {
        self.cost_snapshot * self.use_qty
    }

    /// Recorded without stock and still waiting on a restock
    pub fn is_pending(&self) -> bool {
        !self.stock_decremented
    }
}
