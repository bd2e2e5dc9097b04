//! Spanning tree algorithms
//!
//! Implements Kruskal's algorithm for minimum and maximum spanning forests.

use super::community::UnionFind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An undirected weighted edge between dense node indices
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightedEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(source: usize, target: usize, weight: f64) -> Self {
        Self { source, target, weight }
    }
}

/// Which extreme the spanning forest optimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpanningOrder {
    Minimum,
    Maximum,
}

pub struct SpanningForest {
    /// Indices into the input edge slice, in acceptance order
    pub edge_indices: Vec<usize>,
    pub total_weight: f64,
    /// Components left after the run (1 when the input graph is connected)
    pub component_count: usize,
}

/// Kruskal's Algorithm
///
/// Edges are considered by weight (ascending for `Minimum`, descending for
/// `Maximum`; equal weights keep input order). The run stops as soon as
/// `node_count - 1` edges have been accepted, which leaves a single tree.
/// On a disconnected graph the result is a spanning forest.
pub fn kruskal(node_count: usize, edges: &[WeightedEdge], order: SpanningOrder) -> SpanningForest {
    let mut sorted: Vec<usize> = (0..edges.len()).collect();
    sorted.sort_by(|&a, &b| {
        let cmp = edges[a].weight.total_cmp(&edges[b].weight);
        match order {
            SpanningOrder::Minimum => cmp,
            SpanningOrder::Maximum => cmp.reverse(),
        }
    });

    let mut uf = UnionFind::new(node_count);
    let mut edge_indices = Vec::new();
    let mut total_weight = 0.0;

    for idx in sorted {
        let edge = &edges[idx];
        if edge.source >= node_count || edge.target >= node_count {
            continue;
        }
        if uf.union(edge.source, edge.target) {
            edge_indices.push(idx);
            total_weight += edge.weight;

            if edge_indices.len() + 1 >= node_count && uf.component_count() == 1 {
                break;
            }
        }
    }

    SpanningForest {
        edge_indices,
        total_weight,
        component_count: uf.component_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<WeightedEdge> {
        // Triangle: 0-1 (1), 1-2 (2), 0-2 (10)
        vec![
            WeightedEdge::new(0, 1, 1.0),
            WeightedEdge::new(1, 2, 2.0),
            WeightedEdge::new(0, 2, 10.0),
        ]
    }

    #[test]
    fn test_kruskal_minimum() {
        let result = kruskal(3, &triangle(), SpanningOrder::Minimum);
        assert_eq!(result.total_weight, 3.0);
        assert_eq!(result.edge_indices, vec![0, 1]);
        assert_eq!(result.component_count, 1);
    }

    #[test]
    fn test_kruskal_maximum() {
        let result = kruskal(3, &triangle(), SpanningOrder::Maximum);
        assert_eq!(result.total_weight, 12.0);
        assert_eq!(result.edge_indices, vec![2, 1]);
    }

    #[test]
    fn test_kruskal_forest_on_disconnected_graph() {
        // 0-1 and 2-3, node 4 isolated
        let edges = vec![WeightedEdge::new(0, 1, 5.0), WeightedEdge::new(2, 3, 7.0)];
        let result = kruskal(5, &edges, SpanningOrder::Maximum);
        assert_eq!(result.edge_indices.len(), 2);
        assert_eq!(result.component_count, 3);
        assert_eq!(result.total_weight, 12.0);
    }

    #[test]
    fn test_kruskal_empty() {
        let result = kruskal(0, &[], SpanningOrder::Minimum);
        assert!(result.edge_indices.is_empty());
        assert_eq!(result.component_count, 0);
    }
}
