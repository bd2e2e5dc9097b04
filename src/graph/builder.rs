//! Graph construction from cleaned order-line records

use super::node::SupplierInfo;
use super::store::{GraphError, GraphResult, ProcurementGraph};
use super::types::SupplierId;
use crate::algo::{format_amount, Summary};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// One cleaned purchase line, as delivered by the ingestion layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub order_number: String,
    /// Empty when the source row carried no supplier
    pub supplier_id: String,
    /// Normalized item key
    pub item_key: String,
    /// Original description
    pub description: String,
    pub amount: f64,
}

impl LineRecord {
    pub fn new(
        order_number: impl Into<String>,
        supplier_id: impl Into<String>,
        item_key: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            supplier_id: supplier_id.into(),
            item_key: item_key.into(),
            description: description.into(),
            amount,
        }
    }

    fn validate(&self) -> GraphResult<()> {
        if self.order_number.trim().is_empty() {
            return Err(GraphError::MissingOrderNumber);
        }
        if self.item_key.trim().is_empty() {
            return Err(GraphError::MissingItemKey(self.order_number.clone()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(GraphError::InvalidAmount {
                order: self.order_number.clone(),
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// Grouping key: (order number, supplier, normalized item, description)
type GroupKey = (String, String, String, String);

/// Folds line records into a [`ProcurementGraph`].
///
/// Records are grouped by (order, supplier, item key, description) with
/// amounts summed, in first-appearance order, so duplicate raw rows never
/// inflate degrees. Supplier sets are folded per order and turned into a
/// [`SupplierInfo`] only when the graph is built.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    groups: IndexMap<GroupKey, f64>,
    records: usize,
    skipped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. Invalid records are rejected and counted as skipped.
    pub fn add_record(&mut self, record: LineRecord) -> GraphResult<()> {
        if let Err(e) = record.validate() {
            self.skipped += 1;
            return Err(e);
        }
        self.records += 1;

        let LineRecord {
            order_number,
            supplier_id,
            item_key,
            description,
            amount,
        } = record;
        let key = (
            order_number.trim().to_string(),
            supplier_id.trim().to_string(),
            item_key.trim().to_string(),
            description.trim().to_string(),
        );
        *self.groups.entry(key).or_insert(0.0) += amount;
        Ok(())
    }

    /// Add many records, logging and skipping the invalid ones
    pub fn extend<I: IntoIterator<Item = LineRecord>>(&mut self, records: I) -> &mut Self {
        for record in records {
            if let Err(e) = self.add_record(record) {
                warn!("Skipping record: {}", e);
            }
        }
        self
    }

    /// Records accepted so far
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Records rejected so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Distinct (order, supplier, item, description) groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Fold the current state into a fresh graph.
    ///
    /// May be called repeatedly; equal inputs give equal graphs.
    pub fn build(&self) -> ProcurementGraph {
        // Pass 1: supplier set per order
        let mut order_suppliers: IndexMap<&str, BTreeSet<SupplierId>> = IndexMap::new();
        for (order, supplier, _, _) in self.groups.keys() {
            let set = order_suppliers.entry(order.as_str()).or_default();
            if !supplier.is_empty() {
                set.insert(SupplierId::new(supplier.as_str()));
            }
        }

        let mut graph = ProcurementGraph::new();
        for (number, suppliers) in order_suppliers {
            graph.upsert_order(number, SupplierInfo::from_set(suppliers));
        }

        // Pass 2: items and weighted edges
        for ((order, supplier, item_key, description), &amount) in &self.groups {
            let order_id = match graph.order_by_number(order) {
                Some(o) => o.id,
                None => continue,
            };
            let item_id = graph.upsert_item(item_key, description);
            let supplier = (!supplier.is_empty()).then(|| SupplierId::new(supplier.as_str()));
            if let Err(e) = graph.add_amount(order_id, item_id, supplier.as_ref(), amount) {
                // Only reachable through float overflow of a summed group
                warn!("Dropping group for order {}: {}", order, e);
            }
        }

        debug!(groups = self.groups.len(), "graph folded from record groups");
        info!(
            orders = graph.order_count(),
            items = graph.item_count(),
            edges = graph.edge_count(),
            multi_supplier_orders = graph.multi_supplier_orders().count(),
            "procurement graph built"
        );

        graph
    }

    /// Build statistics for `graph` (normally the result of [`build`](Self::build))
    pub fn summary(&self, graph: &ProcurementGraph) -> BuildSummary {
        BuildSummary::new(graph, self.records, self.skipped)
    }
}

/// Counts reported after a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub records: usize,
    pub skipped_records: usize,
    pub orders: usize,
    pub items: usize,
    pub edges: usize,
    pub total_amount: f64,
    pub multi_supplier_orders: usize,
    /// Up to three (order number, suppliers) examples
    pub multi_supplier_examples: Vec<(String, Vec<String>)>,
}

impl BuildSummary {
    pub fn new(graph: &ProcurementGraph, records: usize, skipped_records: usize) -> Self {
        let multi: Vec<_> = graph.multi_supplier_orders().collect();
        let multi_supplier_examples = multi
            .iter()
            .take(3)
            .map(|o| {
                let suppliers = o.supplier_members().iter().map(|s| s.to_string()).collect();
                (o.number.clone(), suppliers)
            })
            .collect();

        Self {
            records,
            skipped_records,
            orders: graph.order_count(),
            items: graph.item_count(),
            edges: graph.edge_count(),
            total_amount: graph.edges().iter().map(|e| e.amount).sum(),
            multi_supplier_orders: multi.len(),
            multi_supplier_examples,
        }
    }
}

impl Summary for BuildSummary {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Graph built:".to_string(),
            format!("  Records: {} ({} skipped)", self.records, self.skipped_records),
            format!("  Nodes: {}", self.orders + self.items),
            format!("  Orders: {}", self.orders),
            format!("  Items: {}", self.items),
            format!("  Edges: {}", self.edges),
            format!("  Total amount: {}", format_amount(self.total_amount)),
        ];
        if self.multi_supplier_orders > 0 {
            lines.push(format!("  Orders with multiple suppliers: {}", self.multi_supplier_orders));
            for (number, suppliers) in &self.multi_supplier_examples {
                let shown: Vec<&str> = suppliers.iter().take(3).map(String::as_str).collect();
                let more = if suppliers.len() > 3 { "..." } else { "" };
                lines.push(format!("    - {}: {}{}", number, shown.join(", "), more));
            }
        }
        lines
    }
}
