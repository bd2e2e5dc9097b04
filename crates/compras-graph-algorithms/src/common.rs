//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected graph using Compressed Sparse Row (CSR) format.
///
/// Every undirected edge is stored twice, once in each endpoint's adjacency run,
/// so `neighbors(i)` is the full neighborhood of `i`.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<usize>,

    /// Edge weights: aligned with `targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Get the degree of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Get the neighbors of a node
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Get weights for the edges of a node, aligned with `neighbors(idx)`
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.offsets[idx];
            let end = self.offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Total number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Build a view from a list of undirected `(u, v, weight)` edges over dense indices.
    ///
    /// Edges whose endpoints fall outside `0..index_to_node.len()` are ignored.
    pub fn from_undirected_edges(index_to_node: Vec<NodeId>, edges: &[(usize, usize, f64)]) -> Self {
        let node_count = index_to_node.len();
        let node_to_index: HashMap<NodeId, usize> = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        // Counting pass
        let mut degree = vec![0usize; node_count];
        for &(u, v, _) in edges {
            if u < node_count && v < node_count {
                degree[u] += 1;
                degree[v] += 1;
            }
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        // Fill pass
        let total = offsets[node_count];
        let mut targets = vec![0usize; total];
        let mut weights = vec![0.0f64; total];
        let mut cursor = offsets[..node_count].to_vec();
        for &(u, v, w) in edges {
            if u >= node_count || v >= node_count {
                continue;
            }
            targets[cursor[u]] = v;
            weights[cursor[u]] = w;
            cursor[u] += 1;
            targets[cursor[v]] = u;
            weights[cursor[v]] = w;
            cursor[v] += 1;
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            targets,
            weights: Some(weights),
        }
    }
}
