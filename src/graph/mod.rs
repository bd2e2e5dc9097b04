//! Procurement graph model
//!
//! This module implements the bipartite Order-Item graph:
//! - Order nodes carrying their supplier information
//! - Item nodes keyed by normalized description
//! - Order -> Item edges weighted by cumulative amount
//! - Builder folding raw records into an immutable graph
//! - Integrity checks over the built graph

pub mod builder;
pub mod edge;
pub mod integrity;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use builder::{BuildSummary, GraphBuilder, LineRecord};
pub use edge::Edge;
pub use integrity::{validate_integrity, IntegrityIssue, IntegrityReport};
pub use node::{truncate_chars, Item, Order, SupplierInfo, ITEM_LABEL_MAX_CHARS};
pub use store::{GraphError, GraphResult, ProcurementGraph};
pub use types::{EdgeId, ItemId, OrderId, SupplierId};
