//! Supply model
//!
//! Shop consumables (isopropyl, flux, packing material). Tracked for
//! reordering only; supplies are never linked to units.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SupplyId;
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub id: SupplyId,

    pub name: String,

    pub sku: Option<String>,

    #[serde(default)]
    pub qty_on_hand: u32,

    #[serde(default)]
    pub cost_per_unit: Money,

    /// Reorder when stock falls to or below this level
    #[serde(default)]
    pub reorder_threshold: u32,

    pub purchase_url: Option<String>,

    #[serde(default)]
    pub notes: String,
}

impl Supply {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SupplyId::new(),
            name: name.into(),
            sku: None,
            qty_on_hand: 0,
            cost_per_unit: Money::zero(),
            reorder_threshold: 0,
            purchase_url: None,
            notes: String::new(),
        }
    }

    pub fn needs_reorder(&self) -> bool {
        self.qty_on_hand <= self.reorder_threshold
    }

    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty()
            || self.name.to_lowercase().contains(&q)
            || self
                .sku
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&q))
    }
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
