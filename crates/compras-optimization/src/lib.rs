pub mod algorithms;
pub mod common;

/// Re-export common types
pub use algorithms::ScaledKnapsackSolver;
pub use common::*;
