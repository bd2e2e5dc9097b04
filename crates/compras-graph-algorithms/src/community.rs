//! Connectivity algorithms
//!
//! Union-Find (disjoint sets) and BFS components over the one-mode projection
//! of a bipartite graph.

use super::common::GraphView;
use std::collections::{HashMap, VecDeque};

/// Union-Find data structure with path compression and union by rank
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
            size: vec![1; size],
            components: size,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `i`'s set. Every node visited on the way is re-pointed at the root.
    pub fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    /// Merge the sets of `i` and `j`.
    ///
    /// Returns `false` when both already share a root; Kruskal relies on this
    /// to reject cycle-closing edges.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i == root_j {
            return false;
        }

        let (big, small) = if self.rank[root_i] < self.rank[root_j] {
            (root_j, root_i)
        } else {
            (root_i, root_j)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        if self.rank[big] == self.rank[small] {
            self.rank[big] += 1;
        }
        self.components -= 1;
        true
    }

    pub fn connected(&mut self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }

    /// Size of the set containing `i`
    pub fn size(&mut self, i: usize) -> usize {
        let root = self.find(i);
        self.size[root]
    }

    /// Number of disjoint sets
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Partition all elements by root: root -> members (ascending)
    pub fn get_components(&mut self) -> HashMap<usize, Vec<usize>> {
        let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..self.parent.len() {
            let root = self.find(i);
            components.entry(root).or_default().push(i);
        }
        components
    }
}

/// Connected components of the projection of a bipartite graph onto `members`.
///
/// Two members are related when they share a neighbor (one hop to the other
/// side and one hop back). Components are returned in discovery order, each
/// listing its members in BFS order. Members must all lie on the same side.
pub fn projected_components(view: &GraphView, members: &[usize]) -> Vec<Vec<usize>> {
    let mut is_member = vec![false; view.node_count];
    for &m in members {
        is_member[m] = true;
    }

    let mut visited = vec![false; view.node_count];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for &start in members {
        if visited[start] {
            continue;
        }

        let mut component = vec![start];
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for &hub in view.neighbors(current) {
                for &next in view.neighbors(hub) {
                    if is_member[next] && !visited[next] {
                        visited[next] = true;
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
        }

        components.push(component);
    }

    components
}
