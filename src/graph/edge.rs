//! Order-Item edges
//!
//! Every edge runs from an Order to an Item; there is no way to connect two
//! nodes of the same kind.

use super::types::{EdgeId, ItemId, OrderId, SupplierId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weighted link between an order and an item it purchased
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,

    pub order: OrderId,

    pub item: ItemId,

    /// Cumulative amount over every raw record for this (order, item) pair
    pub amount: f64,

    /// Share of `amount` attributed to each named supplier.
    /// Records without a supplier add to `amount` only.
    pub contributions: BTreeMap<SupplierId, f64>,
}

impl Edge {
    pub fn new(id: EdgeId, order: OrderId, item: ItemId) -> Self {
        Edge {
            id,
            order,
            item,
            amount: 0.0,
            contributions: BTreeMap::new(),
        }
    }

    /// Add an amount to this edge
    pub(crate) fn accumulate(&mut self, supplier: Option<&SupplierId>, amount: f64) {
        self.amount += amount;
        if let Some(supplier) = supplier {
            *self.contributions.entry(supplier.clone()).or_insert(0.0) += amount;
        }
    }

    /// Amount attributed to `supplier` on this edge
    pub fn amount_for(&self, supplier: &SupplierId) -> f64 {
        self.contributions.get(supplier).copied().unwrap_or(0.0)
    }
}
