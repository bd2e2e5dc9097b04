pub mod common;
pub mod community;
pub mod mst;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use community::{projected_components, UnionFind};
pub use mst::{kruskal, SpanningForest, SpanningOrder, WeightedEdge};
pub use topology::{two_hop_degree, two_hop_neighborhood};
