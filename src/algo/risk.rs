//! Monopoly and oligopoly risk classification
//!
//! Implements a lookup table over (distinct supplier count, total spend)
//! per item. Only orders with supplier information contribute.

use super::{format_amount, AnalysisError, AnalysisResult, Summary};
use crate::graph::{ItemId, ProcurementGraph, SupplierId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Risk label assigned to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "MONOPOLIO_CRÍTICO")]
    CriticalMonopoly,
    #[serde(rename = "MONOPOLIO")]
    Monopoly,
    #[serde(rename = "MONOPOLIO_MENOR")]
    MinorMonopoly,
    #[serde(rename = "DUOPOLIO_CRÍTICO")]
    CriticalDuopoly,
    #[serde(rename = "DUOPOLIO")]
    Duopoly,
    #[serde(rename = "OLIGOPOLIO_CRÍTICO")]
    CriticalOligopoly,
    #[serde(rename = "OLIGOPOLIO")]
    Oligopoly,
}

impl RiskClass {
    pub fn severity(self) -> u8 {
        match self {
            RiskClass::CriticalMonopoly => 10,
            RiskClass::Monopoly => 7,
            RiskClass::CriticalDuopoly => 6,
            RiskClass::MinorMonopoly => 5,
            RiskClass::Duopoly => 4,
            RiskClass::CriticalOligopoly => 3,
            RiskClass::Oligopoly => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskClass::CriticalMonopoly => "MONOPOLIO_CRÍTICO",
            RiskClass::Monopoly => "MONOPOLIO",
            RiskClass::MinorMonopoly => "MONOPOLIO_MENOR",
            RiskClass::CriticalDuopoly => "DUOPOLIO_CRÍTICO",
            RiskClass::Duopoly => "DUOPOLIO",
            RiskClass::CriticalOligopoly => "OLIGOPOLIO_CRÍTICO",
            RiskClass::Oligopoly => "OLIGOPOLIO",
        }
    }
}

/// Classify an item from its distinct supplier count and total spend.
///
/// Items with more than three suppliers or spend below half the threshold
/// are never classified.
pub fn classify(supplier_count: usize, spend: f64, threshold: f64) -> Option<RiskClass> {
    if supplier_count == 0 || supplier_count > 3 || spend < threshold / 2.0 {
        return None;
    }

    match supplier_count {
        1 if spend >= threshold * 5.0 => Some(RiskClass::CriticalMonopoly),
        1 if spend >= threshold => Some(RiskClass::Monopoly),
        1 => Some(RiskClass::MinorMonopoly),
        2 if spend >= threshold * 5.0 => Some(RiskClass::CriticalDuopoly),
        2 if spend >= threshold => Some(RiskClass::Duopoly),
        3 if spend >= threshold * 10.0 => Some(RiskClass::CriticalOligopoly),
        3 if spend >= threshold * 3.0 => Some(RiskClass::Oligopoly),
        _ => None,
    }
}

/// Risk classifier parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    /// Spend threshold in currency units
    pub threshold: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self { threshold: 5000.0 }
    }
}

/// One classified item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub class: RiskClass,
    pub severity: u8,
    pub item: ItemId,
    pub item_name: String,
    pub supplier_count: usize,
    pub suppliers: Vec<SupplierId>,
    pub total_spend: f64,
    pub order_count: usize,
    pub average_spend: f64,
}

/// Output of [`detect_monopolies`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub threshold: f64,
    /// Items with at least one supplier-bearing order
    pub items_analyzed: usize,
    /// Sorted by (severity, spend) descending
    pub records: Vec<RiskRecord>,
    pub monopolies: usize,
    pub duopolies: usize,
    pub oligopolies: usize,
}

impl RiskReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Flag items at monopoly, duopoly or oligopoly risk
pub fn detect_monopolies(graph: &ProcurementGraph, params: &RiskParams) -> AnalysisResult<RiskReport> {
    let threshold = params.threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(AnalysisError::InvalidParameter {
            name: "risk.threshold",
            reason: format!("must be positive, got {}", threshold),
        });
    }

    let mut items_analyzed = 0;
    let mut records = Vec::new();

    for item in graph.items() {
        let mut suppliers: BTreeSet<&SupplierId> = BTreeSet::new();
        let mut spend = 0.0;
        let mut orders = 0;

        for edge in graph.item_edges(item.id) {
            let members = match graph.order(edge.order) {
                Some(order) => order.supplier_members(),
                None => continue,
            };
            if members.is_empty() {
                continue;
            }
            suppliers.extend(members);
            spend += edge.amount;
            orders += 1;
        }

        if orders == 0 {
            continue;
        }
        items_analyzed += 1;

        if let Some(class) = classify(suppliers.len(), spend, threshold) {
            records.push(RiskRecord {
                class,
                severity: class.severity(),
                item: item.id,
                item_name: item.display_name().to_string(),
                supplier_count: suppliers.len(),
                suppliers: suppliers.into_iter().cloned().collect(),
                total_spend: spend,
                order_count: orders,
                average_spend: spend / orders as f64,
            });
        }
    }

    records.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.total_spend.total_cmp(&a.total_spend))
    });

    let count = |n: usize| records.iter().filter(|r| r.supplier_count == n).count();
    let report = RiskReport {
        threshold,
        items_analyzed,
        monopolies: count(1),
        duopolies: count(2),
        oligopolies: count(3),
        records,
    };

    debug!(items_analyzed, "risk classification finished");
    info!(
        cases = report.records.len(),
        monopolies = report.monopolies,
        duopolies = report.duopolies,
        oligopolies = report.oligopolies,
        "monopoly detection complete"
    );

    Ok(report)
}

impl Summary for RiskReport {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Monopoly detection ({} items with supplier data, threshold {})",
                self.items_analyzed,
                format_amount(self.threshold)
            ),
            format!("  Cases detected: {}", self.records.len()),
            format!("  Monopolies (1 supplier): {}", self.monopolies),
            format!("  Duopolies (2 suppliers): {}", self.duopolies),
            format!("  Oligopolies (3 suppliers): {}", self.oligopolies),
        ];

        if self.records.is_empty() {
            lines.push("  No significant concentration detected".to_string());
            return lines;
        }

        for record in self.records.iter().take(10) {
            lines.push(format!(
                "  [{}] {} | {} supplier(s) | {} over {} order(s)",
                record.class.label(),
                record.item_name,
                record.supplier_count,
                format_amount(record.total_spend),
                record.order_count
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_support::graph_from;

    #[test]
    fn test_classification_table() {
        let t = 5000.0;
        assert_eq!(classify(1, 30_000.0, t), Some(RiskClass::CriticalMonopoly));
        assert_eq!(classify(1, 25_000.0, t), Some(RiskClass::CriticalMonopoly));
        assert_eq!(classify(1, 5_000.0, t), Some(RiskClass::Monopoly));
        assert_eq!(classify(1, 2_500.0, t), Some(RiskClass::MinorMonopoly));
        assert_eq!(classify(1, 2_499.99, t), None);
        assert_eq!(classify(2, 25_000.0, t), Some(RiskClass::CriticalDuopoly));
        assert_eq!(classify(2, 6_000.0, t), Some(RiskClass::Duopoly));
        assert_eq!(classify(2, 4_000.0, t), None);
        assert_eq!(classify(3, 60_000.0, t), Some(RiskClass::CriticalOligopoly));
        assert_eq!(classify(3, 15_000.0, t), Some(RiskClass::Oligopoly));
        assert_eq!(classify(3, 14_999.0, t), None);
        assert_eq!(classify(4, 1_000_000.0, t), None);
        assert_eq!(classify(0, 1_000_000.0, t), None);
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_string(&RiskClass::CriticalMonopoly).unwrap();
        assert_eq!(json, "\"MONOPOLIO_CRÍTICO\"");
        assert_eq!(RiskClass::Oligopoly.label(), "OLIGOPOLIO");
    }

    #[test]
    fn test_detect_sorted_by_severity_then_spend() {
        let graph = graph_from(&[
            ("1", "A", "diesel", 30_000.0),
            ("2", "B", "toner", 6_000.0),
            ("3", "C", "toner", 1_000.0),
            ("4", "D", "papel", 7_000.0),
            ("5", "E", "cemento", 26_000.0),
        ]);
        let report = detect_monopolies(&graph, &RiskParams::default()).unwrap();

        let labels: Vec<_> = report.records.iter().map(|r| (r.class, r.item_name.as_str())).collect();
        assert_eq!(
            labels,
            vec![
                (RiskClass::CriticalMonopoly, "DIESEL"),
                (RiskClass::CriticalMonopoly, "CEMENTO"),
                (RiskClass::Monopoly, "PAPEL"),
                (RiskClass::Duopoly, "TONER"),
            ]
        );
        assert_eq!(report.monopolies, 3);
        assert_eq!(report.duopolies, 1);
        assert_eq!(report.records[3].average_spend, 3_500.0);
    }

    #[test]
    fn test_multiple_label_is_never_a_supplier() {
        // Order 1 lists A and B; the item has exactly those two suppliers
        let graph = graph_from(&[("1", "A", "diesel", 10_000.0), ("1", "B", "toner", 10.0)]);
        let report = detect_monopolies(&graph, &RiskParams::default()).unwrap();

        let record = &report.records[0];
        assert_eq!(record.class, RiskClass::Duopoly);
        assert_eq!(record.suppliers, vec![SupplierId::new("A"), SupplierId::new("B")]);
        assert!(record.suppliers.iter().all(|s| !s.as_str().starts_with("MULTIPLE")));
    }

    #[test]
    fn test_orders_without_supplier_are_skipped() {
        let graph = graph_from(&[("1", "", "diesel", 50_000.0), ("2", "A", "diesel", 3_000.0)]);
        let report = detect_monopolies(&graph, &RiskParams::default()).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].total_spend, 3_000.0);
        assert_eq!(report.records[0].order_count, 1);
        assert_eq!(report.records[0].class, RiskClass::MinorMonopoly);
    }

    #[test]
    fn test_invalid_threshold() {
        let graph = graph_from(&[]);
        let result = detect_monopolies(&graph, &RiskParams { threshold: 0.0 });
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_empty_graph() {
        let report = detect_monopolies(&ProcurementGraph::new(), &RiskParams::default()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.items_analyzed, 0);
        assert!(report.summary_lines().iter().any(|l| l.contains("No significant")));
    }
}
