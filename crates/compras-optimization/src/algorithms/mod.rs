pub mod knapsack;

pub use knapsack::ScaledKnapsackSolver;
