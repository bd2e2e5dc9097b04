//! Compras: procurement graph analytics
//!
//! Government purchase records are folded into a weighted bipartite graph of
//! purchase orders and items. Analyzers over that graph answer who controls
//! the supply of what, how spend is distributed, where the item network is
//! fragmented, how a limited budget should be allocated, and which suppliers
//! form the backbone of the market.
//!
//! # Layout
//!
//! - [`graph`]: the order/item model and [`GraphBuilder`]
//! - [`algo`]: risk classification, spend segmentation, fragmentation,
//!   budget optimization, supplier backbone, plus item statistics, search
//!   and visualization subgraphs
//! - [`pipeline`]: runs the five core analyzers in parallel, fault-isolated
//! - [`session`]: record files, configuration and a cached graph
//! - [`config`]: YAML configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use compras::graph::{GraphBuilder, LineRecord};
//! use compras::algo::{detect_monopolies, RiskClass, RiskParams};
//!
//! let mut builder = GraphBuilder::new();
//! builder.extend(vec![
//!     LineRecord::new("OC-1", "20100070970", "diesel", "DIESEL B5 S50", 18_000.0),
//!     LineRecord::new("OC-2", "20100070970", "diesel", "DIESEL B5 S50", 12_000.0),
//!     LineRecord::new("OC-3", "20512345678", "toner", "TONER HP 85A", 300.0),
//! ]);
//! let graph = builder.build();
//! assert_eq!(graph.order_count(), 3);
//! assert_eq!(graph.item_count(), 2);
//!
//! let report = detect_monopolies(&graph, &RiskParams::default()).unwrap();
//! assert_eq!(report.records.len(), 1);
//! assert_eq!(report.records[0].class, RiskClass::CriticalMonopoly);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod normalize;
pub mod pipeline;
pub mod session;

// Re-export main types for convenience
pub use graph::{
    BuildSummary, GraphBuilder, GraphError, GraphResult, ItemId, LineRecord, OrderId,
    ProcurementGraph, SupplierId, SupplierInfo,
};

pub use algo::{AnalysisError, AnalysisResult, Summary};

pub use config::{AnalysisConfig, ConfigError, ConfigResult};

pub use normalize::{DescriptionNormalizer, Normalize};

pub use pipeline::{run_all, AnalyzerOutcome, PipelineReport};

pub use session::{AnalysisSession, RawRecord, RecordSource};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
