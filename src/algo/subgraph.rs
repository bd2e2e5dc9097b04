//! Size-bounded subgraph selection for visualization
//!
//! Two strategies are provided: a degree window over items and a greedy
//! expansion that favours items sharing orders with what is already chosen.
//! Both return plain data; layout and rendering happen elsewhere.

use super::{build_view, item_index, percent, AnalysisError, AnalysisResult, Summary};
use crate::graph::{EdgeId, ItemId, OrderId, ProcurementGraph};
use compras_graph_algorithms::two_hop_degree;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Shared orders weigh this much more than interconnection in the greedy score
pub const SHARED_ORDER_WEIGHT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubgraphParams {
    /// Minimum order count of a candidate item
    pub min_orders: usize,
    /// Maximum order count in the degree window, and orders brought in per item
    pub max_orders: usize,
    pub max_items: usize,
}

impl Default for SubgraphParams {
    fn default() -> Self {
        Self {
            min_orders: 2,
            max_orders: 75,
            max_items: 250,
        }
    }
}

impl SubgraphParams {
    fn validate(&self) -> AnalysisResult<()> {
        if self.min_orders > self.max_orders {
            return Err(AnalysisError::InvalidParameter {
                name: "subgraph.min_orders",
                reason: format!("{} exceeds max_orders {}", self.min_orders, self.max_orders),
            });
        }
        if self.max_items == 0 {
            return Err(AnalysisError::InvalidParameter {
                name: "subgraph.max_items",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Induced subgraph handed to a renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubgraphSelection {
    /// In selection order
    pub items: Vec<ItemId>,
    /// Ascending
    pub orders: Vec<OrderId>,
    /// Edges between selected orders and selected items
    pub edges: Vec<EdgeId>,
    /// Selected orders linked to at least two selected items
    pub shared_orders: usize,
    pub interconnection_share: f64,
}

impl SubgraphSelection {
    fn induced(graph: &ProcurementGraph, items: Vec<ItemId>, orders: FxHashSet<OrderId>) -> Self {
        let item_set: FxHashSet<ItemId> = items.iter().copied().collect();
        let mut orders: Vec<OrderId> = orders.into_iter().collect();
        orders.sort();

        let mut edges = Vec::new();
        let mut shared_orders = 0;
        for &order in &orders {
            let linked: Vec<EdgeId> = graph
                .order_edges(order)
                .filter(|e| item_set.contains(&e.item))
                .map(|e| e.id)
                .collect();
            if linked.len() >= 2 {
                shared_orders += 1;
            }
            edges.extend(linked);
        }
        edges.sort();

        Self {
            interconnection_share: percent(shared_orders as f64, orders.len() as f64),
            items,
            orders,
            edges,
            shared_orders,
        }
    }

    pub fn node_count(&self) -> usize {
        self.items.len() + self.orders.len()
    }
}

/// Items whose order count lies in `[min_orders, max_orders]`, highest first,
/// at most `max_items`, together with all their orders. When no item falls in
/// the window every item is a candidate.
pub fn degree_window(graph: &ProcurementGraph, params: &SubgraphParams) -> AnalysisResult<SubgraphSelection> {
    params.validate()?;

    let all: Vec<(ItemId, usize)> = graph
        .items()
        .iter()
        .map(|i| (i.id, graph.item_order_count(i.id)))
        .collect();

    let mut candidates: Vec<(ItemId, usize)> = all
        .iter()
        .copied()
        .filter(|&(_, d)| (params.min_orders..=params.max_orders).contains(&d))
        .collect();
    if candidates.is_empty() && !all.is_empty() {
        warn!(
            min = params.min_orders,
            max = params.max_orders,
            "no item inside the degree window, using all items"
        );
        candidates = all;
    }

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.truncate(params.max_items);

    let items: Vec<ItemId> = candidates.into_iter().map(|(id, _)| id).collect();
    let orders: FxHashSet<OrderId> = items
        .iter()
        .flat_map(|&i| graph.item_edges(i).map(|e| e.order))
        .collect();

    let selection = SubgraphSelection::induced(graph, items, orders);
    debug!(
        items = selection.items.len(),
        orders = selection.orders.len(),
        "degree window subgraph selected"
    );
    Ok(selection)
}

/// Greedy interconnected expansion.
///
/// Candidates are items with at least `min_orders` orders. The most
/// interconnected one seeds the selection; then the candidate maximizing
/// `10 * shared orders + interconnection` is added until `max_items` is
/// reached. Each item brings in at most `max_orders` of its orders.
pub fn interconnected_expansion(
    graph: &ProcurementGraph,
    params: &SubgraphParams,
) -> AnalysisResult<SubgraphSelection> {
    params.validate()?;

    let view = build_view(graph);
    let mut candidates: Vec<(ItemId, usize, usize)> = graph
        .items()
        .iter()
        .map(|i| (i.id, graph.item_order_count(i.id)))
        .filter(|&(_, degree)| degree >= params.min_orders)
        .map(|(id, degree)| (id, two_hop_degree(&view, item_index(graph, id)), degree))
        .collect();

    if candidates.is_empty() {
        warn!(min = params.min_orders, "no item meets the minimum order count");
        return Ok(SubgraphSelection::default());
    }

    // (interconnection, degree) descending
    candidates.sort_by(|a, b| (b.1, b.2).cmp(&(a.1, a.2)));

    let target = params.max_items.min(candidates.len());
    let mut chosen = vec![false; candidates.len()];
    let mut items: Vec<ItemId> = Vec::with_capacity(target);
    let mut orders: FxHashSet<OrderId> = FxHashSet::default();

    let admit = |item: ItemId, items: &mut Vec<ItemId>, orders: &mut FxHashSet<OrderId>| {
        items.push(item);
        orders.extend(graph.item_edges(item).take(params.max_orders).map(|e| e.order));
    };

    chosen[0] = true;
    admit(candidates[0].0, &mut items, &mut orders);

    while items.len() < target {
        let mut best: Option<(usize, usize)> = None;
        for (slot, &(item, interconnection, _)) in candidates.iter().enumerate() {
            if chosen[slot] {
                continue;
            }
            let shared = graph.item_edges(item).filter(|e| orders.contains(&e.order)).count();
            let score = shared * SHARED_ORDER_WEIGHT + interconnection;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((slot, score));
            }
        }
        let Some((slot, _)) = best else { break };
        chosen[slot] = true;
        admit(candidates[slot].0, &mut items, &mut orders);
    }

    let selection = SubgraphSelection::induced(graph, items, orders);
    debug!(
        items = selection.items.len(),
        orders = selection.orders.len(),
        shared = selection.shared_orders,
        "interconnected subgraph selected"
    );
    Ok(selection)
}

impl Summary for SubgraphSelection {
    fn summary_lines(&self) -> Vec<String> {
        vec![
            "Subgraph selected".to_string(),
            format!("  Nodes: {}", self.node_count()),
            format!("  Items: {}", self.items.len()),
            format!("  Orders: {}", self.orders.len()),
            format!("  Edges: {}", self.edges.len()),
            format!(
                "  Shared orders (2+ items): {} ({:.1}%)",
                self.shared_orders, self.interconnection_share
            ),
        ]
    }
}
