//! Budget allocation over items
//!
//! Each item is priced at its average order amount and valued by demand
//! (order count, tripled for critical needs). The selection itself is a
//! scaled 0/1 knapsack from `compras-optimization`.

use super::{format_amount, percent, AnalysisResult, Summary};
use crate::graph::{ItemId, ProcurementGraph};
use crate::normalize::fold;
use compras_optimization::{KnapsackConfig, KnapsackItem, ScaleInfo, ScaledKnapsackSolver};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Value multiplier for items matching a critical-need keyword
pub const CRITICAL_MULTIPLIER: u64 = 3;

/// Default critical-need keywords
pub const DEFAULT_CRITICAL_KEYWORDS: [&str; 10] = [
    "agua",
    "alimento",
    "medicina",
    "salud",
    "educacion",
    "seguridad",
    "emergencia",
    "hospital",
    "obra",
    "social",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetParams {
    pub budget: f64,
    pub critical_keywords: Vec<String>,
    pub max_candidates: usize,
    pub max_capacity_slots: usize,
}

impl Default for BudgetParams {
    fn default() -> Self {
        let knapsack = KnapsackConfig::default();
        Self {
            budget: 100_000.0,
            critical_keywords: DEFAULT_CRITICAL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            max_candidates: knapsack.max_candidates,
            max_capacity_slots: knapsack.max_capacity_slots,
        }
    }
}

impl BudgetParams {
    pub fn with_budget(budget: f64) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }
}

/// One selected item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSelection {
    pub item: ItemId,
    pub name: String,
    /// Average order amount
    pub cost: f64,
    pub value: u64,
    pub critical: bool,
    pub order_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub budget: f64,
    /// Sorted by value descending
    pub selections: Vec<BudgetSelection>,
    pub total_cost: f64,
    pub total_value: u64,
    pub critical_covered: usize,
    /// Share of the budget spent, in percent
    pub utilization: f64,
    pub scale: ScaleInfo,
    /// Items removed by the real-cost repair
    pub evicted: usize,
}

struct Candidate {
    item: ItemId,
    name: String,
    cost: f64,
    value: u64,
    critical: bool,
    order_count: usize,
}

fn is_critical(name: &str, keywords: &[String]) -> bool {
    let folded = fold(name);
    keywords.iter().any(|k| {
        let k = fold(k);
        !k.is_empty() && folded.contains(&k)
    })
}

/// Choose the set of items that maximizes demand value within `params.budget`
pub fn optimize_budget(graph: &ProcurementGraph, params: &BudgetParams) -> AnalysisResult<BudgetReport> {
    let candidates: Vec<Candidate> = graph
        .items()
        .iter()
        .filter_map(|item| {
            let order_count = graph.item_order_count(item.id);
            if order_count == 0 {
                return None;
            }
            let cost = graph.item_total_spend(item.id) / order_count as f64;
            let critical = is_critical(item.display_name(), &params.critical_keywords);
            let value = order_count as u64 * if critical { CRITICAL_MULTIPLIER } else { 1 };
            Some(Candidate {
                item: item.id,
                name: item.display_name().to_string(),
                cost,
                value,
                critical,
                order_count,
            })
        })
        .collect();

    let knapsack_items: Vec<KnapsackItem> =
        candidates.iter().map(|c| KnapsackItem::new(c.cost, c.value)).collect();
    let solver = ScaledKnapsackSolver::new(KnapsackConfig {
        max_candidates: params.max_candidates,
        max_capacity_slots: params.max_capacity_slots,
    });
    let solution = solver.solve(&knapsack_items, params.budget)?;

    let selections: Vec<BudgetSelection> = solution
        .selected
        .iter()
        .map(|&i| {
            let c = &candidates[i];
            BudgetSelection {
                item: c.item,
                name: c.name.clone(),
                cost: c.cost,
                value: c.value,
                critical: c.critical,
                order_count: c.order_count,
            }
        })
        .collect();

    let critical_covered = selections.iter().filter(|s| s.critical).count();
    let report = BudgetReport {
        budget: params.budget,
        total_cost: solution.total_cost,
        total_value: solution.total_value,
        critical_covered,
        utilization: percent(solution.total_cost, params.budget),
        scale: solution.scale,
        evicted: solution.evicted,
        selections,
    };

    info!(
        selected = report.selections.len(),
        total_cost = report.total_cost,
        total_value = report.total_value,
        critical = report.critical_covered,
        "budget optimization complete"
    );

    Ok(report)
}

impl Summary for BudgetReport {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Budget optimization".to_string(),
            format!("  Budget: {}", format_amount(self.budget)),
            format!("  Scale factor: 1 slot = {}", format_amount(self.scale.factor)),
            format!(
                "  Table capacity: {} slots, {} of {} feasible items considered",
                self.scale.capacity, self.scale.candidates, self.scale.feasible
            ),
            format!("  Items selected: {}", self.selections.len()),
            format!("  Total cost: {} ({:.1}%)", format_amount(self.total_cost), self.utilization),
            format!("  Total value: {}", self.total_value),
            format!("  Critical needs covered: {}", self.critical_covered),
        ];
        for (rank, s) in self.selections.iter().take(10).enumerate() {
            lines.push(format!(
                "    {}. {} | {} | score {}{}",
                rank + 1,
                crate::graph::truncate_chars(&s.name, 40),
                format_amount(s.cost),
                s.value,
                if s.critical { " [CRITICAL]" } else { "" }
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_support::graph_from;
    use crate::algo::AnalysisError;
    use compras_optimization::KnapsackError;

    #[test]
    fn test_critical_keywords_ignore_case_and_accents() {
        let keywords: Vec<String> = DEFAULT_CRITICAL_KEYWORDS.iter().map(|k| k.to_string()).collect();
        assert!(is_critical("MATERIAL DE EDUCACIÓN", &keywords));
        assert!(is_critical("Agua de mesa", &keywords));
        assert!(is_critical("SERVICIO DE SALUD", &keywords));
        assert!(!is_critical("TONER", &keywords));
        assert!(!is_critical("PAPEL", &[String::new()]));
    }

    #[test]
    fn test_selection_respects_budget_and_weights_critical_items() {
        let graph = graph_from(&[
            ("1", "A", "agua potable", 40.0),
            ("2", "A", "agua potable", 40.0),
            ("3", "B", "toner", 50.0),
            ("4", "B", "toner", 50.0),
            ("5", "B", "toner", 50.0),
            ("6", "C", "laptop", 90.0),
        ]);
        let report = optimize_budget(&graph, &BudgetParams::with_budget(100.0)).unwrap();

        // agua: cost 40, value 2*3 = 6; toner: cost 50, value 3; laptop: cost 90, value 1
        let names: Vec<_> = report.selections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["AGUA POTABLE", "TONER"]);
        assert_eq!(report.total_cost, 90.0);
        assert_eq!(report.total_value, 9);
        assert_eq!(report.critical_covered, 1);
        assert_eq!(report.scale.factor, 1.0);
        assert_eq!(report.scale.capacity, 100);
        assert!(report.total_cost <= report.budget);
    }

    #[test]
    fn test_items_above_budget_are_excluded() {
        let graph = graph_from(&[("1", "A", "camion", 500_000.0)]);
        let report = optimize_budget(&graph, &BudgetParams::default()).unwrap();
        assert!(report.selections.is_empty());
        assert_eq!(report.scale.feasible, 0);
        assert_eq!(report.total_cost, 0.0);
    }

    #[test]
    fn test_invalid_budget() {
        let graph = graph_from(&[("1", "A", "x", 10.0)]);
        let result = optimize_budget(&graph, &BudgetParams::with_budget(-1.0));
        assert!(matches!(
            result,
            Err(AnalysisError::Knapsack(KnapsackError::InvalidBudget(b))) if b == -1.0
        ));
    }

    #[test]
    fn test_empty_graph() {
        let report = optimize_budget(&ProcurementGraph::new(), &BudgetParams::default()).unwrap();
        assert!(report.selections.is_empty());
        assert_eq!(report.total_value, 0);
    }
}
