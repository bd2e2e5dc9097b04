//! Order and Item nodes of the bipartite procurement graph

use super::types::{ItemId, OrderId, SupplierId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum characters kept in an item's display label
pub const ITEM_LABEL_MAX_CHARS: usize = 80;

/// Who fulfilled an order.
///
/// Computed once per order after every raw row has been folded in. Source
/// data occasionally lists several suppliers under one order number; that is
/// a data anomaly to report, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierInfo {
    Single(SupplierId),
    Multiple(BTreeSet<SupplierId>),
}

impl SupplierInfo {
    /// Collapse a folded supplier set. Returns `None` for an empty set.
    pub fn from_set(mut suppliers: BTreeSet<SupplierId>) -> Option<Self> {
        match suppliers.len() {
            0 => None,
            1 => suppliers.pop_first().map(SupplierInfo::Single),
            _ => Some(SupplierInfo::Multiple(suppliers)),
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, SupplierInfo::Multiple(_))
    }

    /// Number of distinct suppliers
    pub fn len(&self) -> usize {
        match self {
            SupplierInfo::Single(_) => 1,
            SupplierInfo::Multiple(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Real supplier ids, in order. The synthetic MULTIPLE label is never among them.
    pub fn members(&self) -> Vec<&SupplierId> {
        match self {
            SupplierInfo::Single(id) => vec![id],
            SupplierInfo::Multiple(set) => set.iter().collect(),
        }
    }

    /// Display label: the supplier id, or `MULTIPLE (n)`
    pub fn label(&self) -> String {
        match self {
            SupplierInfo::Single(id) => id.to_string(),
            SupplierInfo::Multiple(set) => format!("MULTIPLE ({})", set.len()),
        }
    }
}

/// A purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Order number as printed on the source document
    pub number: String,

    /// `None` when no row of the order named a supplier
    pub suppliers: Option<SupplierInfo>,
}

impl Order {
    pub fn new(id: OrderId, number: impl Into<String>, suppliers: Option<SupplierInfo>) -> Self {
        Order {
            id,
            number: number.into(),
            suppliers,
        }
    }

    /// Supplier display label, `None` when supplier information is missing
    pub fn supplier_label(&self) -> Option<String> {
        self.suppliers.as_ref().map(SupplierInfo::label)
    }

    pub fn is_multiple(&self) -> bool {
        self.suppliers.as_ref().is_some_and(SupplierInfo::is_multiple)
    }

    pub fn supplier_members(&self) -> Vec<&SupplierId> {
        self.suppliers.as_ref().map(SupplierInfo::members).unwrap_or_default()
    }
}

/// A normalized product or service category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    /// Normalized key; identity of the item
    pub key: String,

    /// Human-readable description, truncated to `ITEM_LABEL_MAX_CHARS`
    pub label: String,
}

impl Item {
    pub fn new(id: ItemId, key: impl Into<String>, description: &str) -> Self {
        Item {
            id,
            key: key.into(),
            label: truncate_chars(description, ITEM_LABEL_MAX_CHARS),
        }
    }

    /// Label to show: the description, or the key when the description is blank
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// Truncate on a character boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
