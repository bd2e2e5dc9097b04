//! Network fragmentation and bridge items
//!
//! Implements BFS over the item projection of the bipartite graph: two items
//! are related when they appear on a common order.

use super::{build_view, format_amount, item_at, item_index, percent, AnalysisResult, Summary};
use crate::graph::{ItemId, ProcurementGraph};
use compras_graph_algorithms::{projected_components, two_hop_degree};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Items ranked by order count that are considered as bridge candidates
pub const BRIDGE_CANDIDATES: usize = 15;
/// Minimum order count of a bridge item
pub const BRIDGE_MIN_ORDERS: usize = 5;
/// Minimum distinct co-purchased items of a bridge item
pub const BRIDGE_MIN_NEIGHBORS: usize = 5;
/// Principal component share above which the network is well connected
pub const WELL_CONNECTED_SHARE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentationSeverity {
    #[serde(rename = "ALTA")]
    High,
    #[serde(rename = "MEDIA")]
    Medium,
    #[serde(rename = "BAJA")]
    Low,
}

impl FragmentationSeverity {
    pub fn from_component_count(count: usize) -> Self {
        if count > 100 {
            FragmentationSeverity::High
        } else if count > 10 {
            FragmentationSeverity::Medium
        } else {
            FragmentationSeverity::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FragmentationSeverity::High => "ALTA",
            FragmentationSeverity::Medium => "MEDIA",
            FragmentationSeverity::Low => "BAJA",
        }
    }
}

/// Item linking many orders and many other items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeItem {
    pub item: ItemId,
    pub name: String,
    pub order_count: usize,
    /// Distinct other items sharing at least one order
    pub connected_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentationReport {
    pub item_count: usize,
    pub component_count: usize,
    pub severity: FragmentationSeverity,
    /// Components sorted by size descending
    pub components: Vec<Vec<ItemId>>,
    pub principal_size: usize,
    pub principal_share: f64,
    pub well_connected: bool,
    pub single_order_items: usize,
    pub single_order_share: f64,
    /// Components with at most 5 items
    pub small_components: usize,
    /// Components with 6 to 20 items
    pub medium_components: usize,
    /// Components with more than 20 items
    pub large_components: usize,
    /// Ranked by connected items descending
    pub bridges: Vec<BridgeItem>,
    /// Components per item
    pub fragmentation_ratio: f64,
    /// Spend held by the principal component
    pub principal_spend: f64,
}

impl FragmentationReport {
    fn empty() -> Self {
        Self {
            item_count: 0,
            component_count: 0,
            severity: FragmentationSeverity::Low,
            components: Vec::new(),
            principal_size: 0,
            principal_share: 0.0,
            well_connected: false,
            single_order_items: 0,
            single_order_share: 0.0,
            small_components: 0,
            medium_components: 0,
            large_components: 0,
            bridges: Vec::new(),
            fragmentation_ratio: 0.0,
            principal_spend: 0.0,
        }
    }

    pub fn component_sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }
}

/// Connected components of the item projection and bridge items
pub fn analyze_fragmentation(graph: &ProcurementGraph) -> AnalysisResult<FragmentationReport> {
    let item_count = graph.item_count();
    if item_count == 0 {
        return Ok(FragmentationReport::empty());
    }

    let view = build_view(graph);
    let members: Vec<usize> = graph.items().iter().map(|i| item_index(graph, i.id)).collect();

    let mut components: Vec<Vec<ItemId>> = projected_components(&view, &members)
        .into_iter()
        .map(|c| c.into_iter().filter_map(|idx| item_at(graph, idx)).collect())
        .collect();
    // Stable: equal sizes keep discovery order
    components.sort_by(|a, b| b.len().cmp(&a.len()));

    let component_count = components.len();
    let principal_size = components.first().map_or(0, Vec::len);
    let principal_share = percent(principal_size as f64, item_count as f64);
    let principal_spend = components
        .first()
        .map_or(0.0, |c| c.iter().map(|&i| graph.item_total_spend(i)).sum());

    let single_order_items = graph
        .items()
        .iter()
        .filter(|i| graph.item_order_count(i.id) == 1)
        .count();

    let sizes = || components.iter().map(Vec::len);
    let small_components = sizes().filter(|&s| s <= 5).count();
    let medium_components = sizes().filter(|&s| (6..=20).contains(&s)).count();
    let large_components = sizes().filter(|&s| s > 20).count();

    // Bridge items
    let mut by_degree: Vec<(ItemId, usize)> = graph
        .items()
        .iter()
        .map(|i| (i.id, graph.item_order_count(i.id)))
        .collect();
    by_degree.sort_by(|a, b| b.1.cmp(&a.1));

    let mut bridges: Vec<BridgeItem> = by_degree
        .into_iter()
        .take(BRIDGE_CANDIDATES)
        .filter(|&(_, orders)| orders >= BRIDGE_MIN_ORDERS)
        .filter_map(|(item, orders)| {
            let connected = two_hop_degree(&view, item_index(graph, item));
            (connected >= BRIDGE_MIN_NEIGHBORS).then(|| BridgeItem {
                item,
                name: graph.item(item).map(|i| i.display_name().to_string()).unwrap_or_default(),
                order_count: orders,
                connected_items: connected,
            })
        })
        .collect();
    bridges.sort_by(|a, b| b.connected_items.cmp(&a.connected_items));

    let report = FragmentationReport {
        item_count,
        component_count,
        severity: FragmentationSeverity::from_component_count(component_count),
        principal_size,
        principal_share,
        well_connected: principal_share > WELL_CONNECTED_SHARE,
        single_order_items,
        single_order_share: percent(single_order_items as f64, item_count as f64),
        small_components,
        medium_components,
        large_components,
        bridges,
        fragmentation_ratio: component_count as f64 / item_count as f64,
        principal_spend,
        components,
    };

    info!(
        components = report.component_count,
        severity = report.severity.label(),
        bridges = report.bridges.len(),
        "fragmentation analysis complete"
    );

    Ok(report)
}

impl Summary for FragmentationReport {
    fn summary_lines(&self) -> Vec<String> {
        if self.item_count == 0 {
            return vec!["Network fragmentation: no items".to_string()];
        }

        let mut lines = vec![
            "Network fragmentation (BFS)".to_string(),
            format!("  Components: {}", self.component_count),
            format!("  Items: {}", self.item_count),
            format!("  Fragmentation: {}", self.severity.label()),
            format!(
                "  Principal component: {} items ({:.1}%), {}",
                self.principal_size,
                self.principal_share,
                if self.well_connected { "well-connected network" } else { "fragmented network" }
            ),
            format!("  Principal component spend: {}", format_amount(self.principal_spend)),
            format!(
                "  Component sizes: {} small, {} medium, {} large",
                self.small_components, self.medium_components, self.large_components
            ),
            format!(
                "  Single-order items: {} ({:.1}%)",
                self.single_order_items, self.single_order_share
            ),
        ];
        if self.small_components > 100 {
            lines.push(format!(
                "  {} small isolated components: specialized purchases with no relation",
                self.small_components
            ));
        }
        if !self.bridges.is_empty() {
            lines.push("  Bridge items:".to_string());
            for bridge in self.bridges.iter().take(5) {
                lines.push(format!(
                    "    {} | {} orders | connects {} items",
                    bridge.name, bridge.order_count, bridge.connected_items
                ));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_support::graph_from;
    use std::collections::HashSet;

    #[test]
    fn test_components_partition_items() {
        let graph = graph_from(&[
            ("1", "A", "a", 10.0),
            ("1", "A", "b", 10.0),
            ("2", "B", "b", 10.0),
            ("2", "B", "c", 10.0),
            ("3", "C", "d", 10.0),
            ("4", "C", "e", 10.0),
            ("4", "C", "f", 10.0),
        ]);
        let report = analyze_fragmentation(&graph).unwrap();

        assert_eq!(report.component_count, 3);
        assert_eq!(report.component_sizes(), vec![3, 2, 1]);
        let all: HashSet<ItemId> = report.components.iter().flatten().copied().collect();
        assert_eq!(all.len(), graph.item_count());
        assert_eq!(report.severity, FragmentationSeverity::Low);
        assert_eq!(report.principal_size, 3);
        assert!(!report.well_connected);
        assert_eq!(report.small_components, 3);
        assert_eq!(report.fragmentation_ratio, 0.5);
        assert_eq!(report.principal_spend, 40.0);
        // only b is on two orders
        assert_eq!(report.single_order_items, 5);
    }

    #[test]
    fn test_connected_graph_has_one_component() {
        let graph = graph_from(&[("1", "A", "a", 1.0), ("1", "A", "b", 1.0), ("2", "A", "b", 1.0)]);
        let report = analyze_fragmentation(&graph).unwrap();
        assert_eq!(report.component_count, 1);
        assert!(report.well_connected);
        assert_eq!(report.principal_share, 100.0);
    }

    #[test]
    fn test_bridge_items() {
        // "hub" appears on 6 orders, each with one distinct companion item
        let companions: Vec<String> = (0..6).map(|i| format!("c{}", i)).collect();
        let orders: Vec<String> = (0..6).map(|i| format!("o{}", i)).collect();
        let mut rows = Vec::new();
        for i in 0..6 {
            rows.push((orders[i].as_str(), "A", "hub", 100.0));
            rows.push((orders[i].as_str(), "A", companions[i].as_str(), 10.0));
        }
        let graph = graph_from(&rows);
        let report = analyze_fragmentation(&graph).unwrap();

        assert_eq!(report.bridges.len(), 1);
        let bridge = &report.bridges[0];
        assert_eq!(bridge.name, "HUB");
        assert_eq!(bridge.order_count, 6);
        assert_eq!(bridge.connected_items, 6);
    }

    #[test]
    fn test_high_degree_item_without_neighbors_is_not_a_bridge() {
        let orders: Vec<String> = (0..6).map(|i| format!("o{}", i)).collect();
        let rows: Vec<_> = orders.iter().map(|o| (o.as_str(), "A", "solo", 5.0)).collect();
        let graph = graph_from(&rows);
        let report = analyze_fragmentation(&graph).unwrap();
        assert!(report.bridges.is_empty());
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(FragmentationSeverity::from_component_count(101), FragmentationSeverity::High);
        assert_eq!(FragmentationSeverity::from_component_count(100), FragmentationSeverity::Medium);
        assert_eq!(FragmentationSeverity::from_component_count(11), FragmentationSeverity::Medium);
        assert_eq!(FragmentationSeverity::from_component_count(10), FragmentationSeverity::Low);
    }

    #[test]
    fn test_empty_graph_gives_zero_report() {
        let report = analyze_fragmentation(&ProcurementGraph::new()).unwrap();
        assert_eq!(report.component_count, 0);
        assert_eq!(report.fragmentation_ratio, 0.0);
        assert_eq!(report.summary_lines().len(), 1);
    }
}
