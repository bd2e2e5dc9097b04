//! Analysis configuration
//!
//! Every section falls back to its defaults, so a YAML file only needs the
//! values it changes:
//!
//! ```yaml
//! risk:
//!   threshold: 8000
//! budget:
//!   total: 250000
//! ```

use crate::algo::{BudgetParams, RiskParams, SubgraphParams};
use crate::algo::budget::DEFAULT_CRITICAL_KEYWORDS;
use compras_optimization::KnapsackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Risk classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            threshold: RiskParams::default().threshold,
        }
    }
}

/// Budget optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Available budget in currency units
    pub total: f64,
    pub critical_keywords: Vec<String>,
    /// Candidates kept after the value/cost pre-filter
    pub max_candidates: usize,
    /// Upper bound on DP capacity slots
    pub max_capacity_slots: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let knapsack = KnapsackConfig::default();
        Self {
            total: 100_000.0,
            critical_keywords: DEFAULT_CRITICAL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            max_candidates: knapsack.max_candidates,
            max_capacity_slots: knapsack.max_capacity_slots,
        }
    }
}

/// Visualization subgraph settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubgraphConfig {
    pub min_orders: usize,
    pub max_orders: usize,
    pub max_items: usize,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        let params = SubgraphParams::default();
        Self {
            min_orders: params.min_orders,
            max_orders: params.max_orders,
            max_items: params.max_items,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub risk: RiskConfig,
    pub budget: BudgetConfig,
    pub subgraph: SubgraphConfig,
}

impl AnalysisConfig {
    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading analysis configuration");
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.risk.threshold.is_finite() || self.risk.threshold <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "risk.threshold",
                reason: format!("must be positive, got {}", self.risk.threshold),
            });
        }
        if !self.budget.total.is_finite() || self.budget.total <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "budget.total",
                reason: format!("must be positive, got {}", self.budget.total),
            });
        }
        if self.budget.max_candidates == 0 {
            return Err(ConfigError::Invalid {
                field: "budget.max_candidates",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.budget.max_capacity_slots == 0 {
            return Err(ConfigError::Invalid {
                field: "budget.max_capacity_slots",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.subgraph.min_orders > self.subgraph.max_orders {
            return Err(ConfigError::Invalid {
                field: "subgraph.min_orders",
                reason: format!(
                    "{} exceeds subgraph.max_orders {}",
                    self.subgraph.min_orders, self.subgraph.max_orders
                ),
            });
        }
        if self.subgraph.max_items == 0 {
            return Err(ConfigError::Invalid {
                field: "subgraph.max_items",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn risk_params(&self) -> RiskParams {
        RiskParams {
            threshold: self.risk.threshold,
        }
    }

    pub fn budget_params(&self) -> BudgetParams {
        BudgetParams {
            budget: self.budget.total,
            critical_keywords: self.budget.critical_keywords.clone(),
            max_candidates: self.budget.max_candidates,
            max_capacity_slots: self.budget.max_capacity_slots,
        }
    }

    pub fn subgraph_params(&self) -> SubgraphParams {
        SubgraphParams {
            min_orders: self.subgraph.min_orders,
            max_orders: self.subgraph.max_orders,
            max_items: self.subgraph.max_items,
        }
    }
}
