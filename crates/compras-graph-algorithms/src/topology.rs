//! Graph topology analysis algorithms
//!
//! Neighborhood queries used for bridge/hub detection on bipartite graphs.

use super::common::GraphView;
use std::collections::HashSet;

/// Two-hop neighborhood of `idx`, excluding `idx` itself.
///
/// On a bipartite graph this is the set of same-side nodes sharing at least
/// one neighbor with `idx`.
pub fn two_hop_neighborhood(view: &GraphView, idx: usize) -> HashSet<usize> {
    let mut reached = HashSet::new();
    for &hub in view.neighbors(idx) {
        for &next in view.neighbors(hub) {
            if next != idx {
                reached.insert(next);
            }
        }
    }
    reached
}

/// Number of distinct other nodes sharing a neighbor with `idx`
pub fn two_hop_degree(view: &GraphView, idx: usize) -> usize {
    two_hop_neighborhood(view, idx).len()
}
