//! Graph analytics module
//!
//! Analyzers over a built [`ProcurementGraph`]. Generic algorithms live in
//! the `compras-graph-algorithms` and `compras-optimization` crates; this
//! module provides the adapter layer and the procurement-specific reports.

pub mod backbone;
pub mod budget;
pub mod fragmentation;
pub mod risk;
pub mod search;
pub mod segment;
pub mod stats;
pub mod subgraph;

use crate::graph::{ItemId, OrderId, ProcurementGraph};
use compras_graph_algorithms::GraphView;
use compras_optimization::KnapsackError;
use thiserror::Error;

pub use backbone::{extract_backbone, BackboneEdge, BackboneReport, SupplierCentrality, SupplierRole};
pub use budget::{optimize_budget, BudgetParams, BudgetReport, BudgetSelection};
pub use fragmentation::{analyze_fragmentation, BridgeItem, FragmentationReport, FragmentationSeverity};
pub use risk::{classify, detect_monopolies, RiskClass, RiskParams, RiskRecord, RiskReport};
pub use search::{search_item, ItemSearchResult, SupplierVerdict};
pub use segment::{segment_by_spend, BandSummary, ItemSpend, Segment, SegmentReport, SpendBand};
pub use stats::{item_statistics, DegreeBucket, ItemAmount, ItemCount, ItemStatistics};
pub use subgraph::{degree_window, interconnected_expansion, SubgraphParams, SubgraphSelection};

/// Errors raised by analyzers
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Analyzer {0} panicked: {1}")]
    Panicked(&'static str, String),

    #[error("Knapsack solver error: {0}")]
    Knapsack(#[from] KnapsackError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Human-readable rendering of a report
pub trait Summary {
    fn summary_lines(&self) -> Vec<String>;
}

/// Build an undirected CSR view of the bipartite graph.
///
/// Orders occupy dense indices `0..order_count`, items follow at
/// `order_count..order_count + item_count`. Edge weights are amounts.
pub fn build_view(graph: &ProcurementGraph) -> GraphView {
    let node_count = graph.order_count() + graph.item_count();
    let index_to_node: Vec<u64> = (0..node_count as u64).collect();

    let edges: Vec<(usize, usize, f64)> = graph
        .edges()
        .iter()
        .map(|e| (order_index(e.order), item_index(graph, e.item), e.amount))
        .collect();

    GraphView::from_undirected_edges(index_to_node, &edges)
}

/// Dense view index of an order
pub fn order_index(order: OrderId) -> usize {
    order.index()
}

/// Dense view index of an item
pub fn item_index(graph: &ProcurementGraph, item: ItemId) -> usize {
    graph.order_count() + item.index()
}

/// Item id behind a dense view index, `None` for order indices
pub fn item_at(graph: &ProcurementGraph, idx: usize) -> Option<ItemId> {
    idx.checked_sub(graph.order_count())
        .filter(|&i| i < graph.item_count())
        .map(|i| ItemId::new(i as u64))
}

/// Format an amount as `S/ 1,234.56`
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("S/ {}{}.{:02}", if negative { "-" } else { "" }, grouped, frac)
}

/// Share of `part` in `total` as a percentage, 0 when `total` is 0
pub(crate) fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::graph_from;
    use super::*;

    #[test]
    fn test_build_view_layout() {
        let graph = graph_from(&[("1", "A", "x", 10.0), ("1", "A", "y", 5.0), ("2", "B", "x", 7.0)]);
        let view = build_view(&graph);

        assert_eq!(view.node_count, 4);
        assert_eq!(view.edge_count(), 3);

        let x = graph.item_by_key("x").unwrap().id;
        let x_idx = item_index(&graph, x);
        assert_eq!(x_idx, 2);
        assert_eq!(view.degree(x_idx), 2);
        assert_eq!(item_at(&graph, x_idx), Some(x));
        assert_eq!(item_at(&graph, 0), None);
        assert_eq!(item_at(&graph, 4), None);
        assert_eq!(view.weights(x_idx).unwrap().iter().sum::<f64>(), 17.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "S/ 0.00");
        assert_eq!(format_amount(999.5), "S/ 999.50");
        assert_eq!(format_amount(1234.567), "S/ 1,234.57");
        assert_eq!(format_amount(100000.0), "S/ 100,000.00");
        assert_eq!(format_amount(-2500.0), "S/ -2,500.00");
    }
}
