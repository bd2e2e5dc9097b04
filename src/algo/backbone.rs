//! Essential supplier backbone
//!
//! Implements a maximum-weight spanning forest over the supplier graph:
//! two suppliers are joined when they sold at least one common item, with
//! weight equal to the spend both accrued on the shared items.

use super::{format_amount, AnalysisResult, Summary};
use crate::graph::{ItemId, ProcurementGraph, SupplierId};
use compras_graph_algorithms::{kruskal, SpanningOrder, WeightedEdge};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Edge of the spanning forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackboneEdge {
    pub source: SupplierId,
    pub target: SupplierId,
    /// Combined spend of both suppliers on their shared items
    pub weight: f64,
    pub shared_items: usize,
}

/// Position of a supplier in the backbone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierRole {
    /// Sells more than half of the top supplier's volume
    MajorPlayer,
    /// Many backbone links with comparatively little volume
    Connector,
    Regular,
}

impl SupplierRole {
    fn assign(spend: f64, degree: usize, max_spend: f64) -> Self {
        if spend > max_spend * 0.5 {
            SupplierRole::MajorPlayer
        } else if degree > 2 && spend < max_spend * 0.1 {
            SupplierRole::Connector
        } else {
            SupplierRole::Regular
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierCentrality {
    pub supplier: SupplierId,
    /// Degree in the spanning forest
    pub degree: usize,
    pub total_spend: f64,
    pub role: SupplierRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackboneReport {
    pub supplier_count: usize,
    /// Supplier pairs sharing at least one item
    pub candidate_edges: usize,
    /// Accepted edges, heaviest first
    pub edges: Vec<BackboneEdge>,
    /// Suppliers on at least one backbone edge, by degree descending
    pub centrality: Vec<SupplierCentrality>,
    pub total_weight: f64,
    pub essential_suppliers: usize,
    pub component_count: usize,
    /// Attributed spend of every supplier
    pub supplier_spend: BTreeMap<SupplierId, f64>,
}

impl BackboneReport {
    fn empty(supplier_spend: BTreeMap<SupplierId, f64>) -> Self {
        Self {
            supplier_count: supplier_spend.len(),
            candidate_edges: 0,
            edges: Vec::new(),
            centrality: Vec::new(),
            total_weight: 0.0,
            essential_suppliers: 0,
            component_count: supplier_spend.len(),
            supplier_spend,
        }
    }
}

/// Per-supplier spend on each item, from edge contributions
fn supplier_item_spend(graph: &ProcurementGraph) -> BTreeMap<SupplierId, BTreeMap<ItemId, f64>> {
    let mut spend: BTreeMap<SupplierId, BTreeMap<ItemId, f64>> = BTreeMap::new();

    // Every named supplier is a node, even one whose amounts were all unattributed
    for order in graph.orders() {
        for supplier in order.supplier_members() {
            spend.entry(supplier.clone()).or_default();
        }
    }
    for edge in graph.edges() {
        for (supplier, &amount) in &edge.contributions {
            *spend
                .entry(supplier.clone())
                .or_default()
                .entry(edge.item)
                .or_insert(0.0) += amount;
        }
    }
    spend
}

/// Extract the maximum-weight spanning forest of the supplier graph
pub fn extract_backbone(graph: &ProcurementGraph) -> AnalysisResult<BackboneReport> {
    let per_item = supplier_item_spend(graph);
    let supplier_spend: BTreeMap<SupplierId, f64> = per_item
        .iter()
        .map(|(s, items)| (s.clone(), items.values().sum()))
        .collect();

    let n = per_item.len();
    if n < 2 {
        debug!(suppliers = n, "too few suppliers for a backbone");
        return Ok(BackboneReport::empty(supplier_spend));
    }

    let suppliers: Vec<(&SupplierId, &BTreeMap<ItemId, f64>)> = per_item.iter().collect();

    // Pairwise scan
    let mut candidates: Vec<WeightedEdge> = Vec::new();
    let mut shared_counts: Vec<usize> = Vec::new();
    for i in 0..n {
        let items_i = suppliers[i].1;
        for j in (i + 1)..n {
            let items_j = suppliers[j].1;
            let common: Vec<&ItemId> = items_i.keys().filter(|k| items_j.contains_key(*k)).collect();
            if common.is_empty() {
                continue;
            }
            let weight: f64 = common.iter().map(|k| items_i[*k] + items_j[*k]).sum();
            candidates.push(WeightedEdge::new(i, j, weight));
            shared_counts.push(common.len());
        }
    }

    let forest = kruskal(n, &candidates, SpanningOrder::Maximum);

    let mut degree = vec![0usize; n];
    let edges: Vec<BackboneEdge> = forest
        .edge_indices
        .iter()
        .map(|&e| {
            let edge = &candidates[e];
            degree[edge.source] += 1;
            degree[edge.target] += 1;
            BackboneEdge {
                source: suppliers[edge.source].0.clone(),
                target: suppliers[edge.target].0.clone(),
                weight: edge.weight,
                shared_items: shared_counts[e],
            }
        })
        .collect();

    let max_spend = supplier_spend.values().copied().fold(0.0, f64::max);
    let mut centrality: Vec<SupplierCentrality> = (0..n)
        .filter(|&i| degree[i] > 0)
        .map(|i| {
            let supplier = suppliers[i].0;
            let spend = supplier_spend.get(supplier).copied().unwrap_or(0.0);
            SupplierCentrality {
                supplier: supplier.clone(),
                degree: degree[i],
                total_spend: spend,
                role: SupplierRole::assign(spend, degree[i], max_spend),
            }
        })
        .collect();
    centrality.sort_by(|a, b| b.degree.cmp(&a.degree));

    let report = BackboneReport {
        supplier_count: n,
        candidate_edges: candidates.len(),
        essential_suppliers: centrality.len(),
        total_weight: forest.total_weight,
        component_count: forest.component_count,
        edges,
        centrality,
        supplier_spend,
    };

    info!(
        suppliers = report.supplier_count,
        backbone_edges = report.edges.len(),
        components = report.component_count,
        "supplier backbone extracted"
    );

    Ok(report)
}

impl Summary for BackboneReport {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Supplier backbone (Kruskal maximum spanning forest)".to_string(),
            format!("  Suppliers: {}", self.supplier_count),
            format!("  Essential suppliers: {}", self.essential_suppliers),
            format!("  Total shared volume: {}", format_amount(self.total_weight)),
            format!("  Connected components: {}", self.component_count),
        ];
        if !self.centrality.is_empty() {
            lines.push("  Most central suppliers:".to_string());
            for (rank, c) in self.centrality.iter().take(5).enumerate() {
                lines.push(format!(
                    "    {}. {} | degree {} | {}",
                    rank + 1,
                    c.supplier,
                    c.degree,
                    format_amount(c.total_spend)
                ));
            }
        }
        if !self.edges.is_empty() {
            lines.push("  Heaviest links:".to_string());
            for (rank, e) in self.edges.iter().take(5).enumerate() {
                lines.push(format!(
                    "    {}. {} <-> {} | {} shared item(s) | {}",
                    rank + 1,
                    e.source,
                    e.target,
                    e.shared_items,
                    format_amount(e.weight)
                ));
            }
        }
        lines
    }
}
