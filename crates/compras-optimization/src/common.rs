use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A selectable unit: what it costs and what it is worth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub cost: f64,
    pub value: u64,
}

impl KnapsackItem {
    pub fn new(cost: f64, value: u64) -> Self {
        Self { cost, value }
    }

    /// Value per unit of cost, used to rank candidates before the DP.
    pub fn density(&self) -> f64 {
        self.value as f64 / self.cost
    }
}

/// Bounds on the DP problem size.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnapsackConfig {
    /// Only this many items, best value density first, enter the DP.
    pub max_candidates: usize,
    /// Upper bound on the capacity axis of the DP table.
    pub max_capacity_slots: usize,
}

impl Default for KnapsackConfig {
    fn default() -> Self {
        Self {
            max_candidates: 600,
            max_capacity_slots: 10_000,
        }
    }
}

/// How the budget was discretized for the DP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    /// One capacity slot represents this much money.
    pub factor: f64,
    /// Number of capacity slots (table width is `capacity + 1`).
    pub capacity: usize,
    /// Feasible items before truncation.
    pub feasible: usize,
    /// Items that entered the DP.
    pub candidates: usize,
}

/// The result of a knapsack run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnapsackSolution {
    /// Indices into the input items, highest value first.
    pub selected: Vec<usize>,
    /// Sum of real (unscaled) costs of the selection.
    pub total_cost: f64,
    pub total_value: u64,
    pub scale: ScaleInfo,
    /// Items dropped by the feasibility repair after reconstruction.
    pub evicted: usize,
}

impl KnapsackSolution {
    pub(crate) fn empty(scale: ScaleInfo) -> Self {
        Self {
            selected: Vec::new(),
            total_cost: 0.0,
            total_value: 0,
            scale,
            evicted: 0,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum KnapsackError {
    #[error("Budget must be a positive finite amount, got {0}")]
    InvalidBudget(f64),

    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),
}

pub type KnapsackResult<T> = Result<T, KnapsackError>;
