//! Single-item lookup with a quick supplier-risk verdict

use super::{format_amount, Summary};
use crate::graph::{ItemId, ProcurementGraph, SupplierId};
use crate::normalize::Normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Order numbers listed as examples in a search result
pub const EXAMPLE_ORDERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierVerdict {
    /// One supplier and spend above 5,000
    MonopolyRisk,
    /// Two suppliers and spend above 10,000
    DuopolyRisk,
    /// Anything else
    Diversification { suppliers: usize },
}

impl SupplierVerdict {
    pub fn assess(suppliers: usize, spend: f64) -> Self {
        match suppliers {
            1 if spend > 5_000.0 => SupplierVerdict::MonopolyRisk,
            2 if spend > 10_000.0 => SupplierVerdict::DuopolyRisk,
            n => SupplierVerdict::Diversification { suppliers: n },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SupplierVerdict::MonopolyRisk => "Monopoly risk (1 supplier)".to_string(),
            SupplierVerdict::DuopolyRisk => "Duopoly risk (2 suppliers)".to_string(),
            SupplierVerdict::Diversification { suppliers } => {
                format!("Low diversification ({} suppliers)", suppliers)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSearchResult {
    pub item: ItemId,
    pub name: String,
    pub key: String,
    pub order_count: usize,
    pub total_spend: f64,
    pub average_spend: f64,
    pub suppliers: Vec<SupplierId>,
    pub verdict: SupplierVerdict,
    pub example_orders: Vec<String>,
}

/// Find an item by case-insensitive substring of its label, or by exact
/// normalized key. The first item in insertion order that matches wins.
pub fn search_item<N>(graph: &ProcurementGraph, query: &str, normalizer: &N) -> Option<ItemSearchResult>
where
    N: Normalize + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    let key = normalizer.normalize(query);

    let item = graph
        .items()
        .iter()
        .find(|i| i.label.to_lowercase().contains(&needle) || i.key == key)?;

    let mut suppliers: BTreeSet<SupplierId> = BTreeSet::new();
    let mut total_spend = 0.0;
    let mut example_orders = Vec::new();
    let mut order_count = 0;

    for edge in graph.item_edges(item.id) {
        order_count += 1;
        total_spend += edge.amount;
        if let Some(order) = graph.order(edge.order) {
            suppliers.extend(order.supplier_members().into_iter().cloned());
            if example_orders.len() < EXAMPLE_ORDERS {
                example_orders.push(order.number.clone());
            }
        }
    }

    Some(ItemSearchResult {
        item: item.id,
        name: item.display_name().to_string(),
        key: item.key.clone(),
        order_count,
        total_spend,
        average_spend: if order_count > 0 { total_spend / order_count as f64 } else { 0.0 },
        verdict: SupplierVerdict::assess(suppliers.len(), total_spend),
        suppliers: suppliers.into_iter().collect(),
        example_orders,
    })
}

impl Summary for ItemSearchResult {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Item: {}", self.name),
            format!("  Orders: {}", self.order_count),
            format!("  Total spend: {}", format_amount(self.total_spend)),
            format!("  Average per order: {}", format_amount(self.average_spend)),
            format!("  Distinct suppliers: {}", self.suppliers.len()),
            format!("  Assessment: {}", self.verdict.describe()),
        ];
        if !self.suppliers.is_empty() {
            lines.push("  Suppliers:".to_string());
            for (rank, s) in self.suppliers.iter().take(5).enumerate() {
                lines.push(format!("    {}. {}", rank + 1, s));
            }
        }
        lines.push("  Example orders:".to_string());
        for number in &self.example_orders {
            lines.push(format!("    - {}", number));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_support::graph_from;
    use crate::normalize::DescriptionNormalizer;

    #[test]
    fn test_verdicts() {
        assert_eq!(SupplierVerdict::assess(1, 5_001.0), SupplierVerdict::MonopolyRisk);
        assert_eq!(SupplierVerdict::assess(1, 5_000.0), SupplierVerdict::Diversification { suppliers: 1 });
        assert_eq!(SupplierVerdict::assess(2, 10_001.0), SupplierVerdict::DuopolyRisk);
        assert_eq!(SupplierVerdict::assess(3, 99_999.0), SupplierVerdict::Diversification { suppliers: 3 });
    }

    #[test]
    fn test_search_by_label_substring() {
        let graph = graph_from(&[
            ("1", "A", "diesel", 4_000.0),
            ("2", "A", "diesel", 3_000.0),
            ("3", "B", "toner", 10.0),
        ]);
        let normalizer = DescriptionNormalizer::new().unwrap();
        let result = search_item(&graph, "iese", &normalizer).unwrap();

        assert_eq!(result.name, "DIESEL");
        assert_eq!(result.order_count, 2);
        assert_eq!(result.total_spend, 7_000.0);
        assert_eq!(result.average_spend, 3_500.0);
        assert_eq!(result.suppliers, vec![SupplierId::new("A")]);
        assert_eq!(result.verdict, SupplierVerdict::MonopolyRisk);
        assert_eq!(result.example_orders, vec!["1", "2"]);
    }

    #[test]
    fn test_search_by_normalized_key() {
        let graph = graph_from(&[("1", "A", "diesel", 10.0)]);
        let normalizer = DescriptionNormalizer::new().unwrap();
        let result = search_item(&graph, "petróleo b5", &normalizer).unwrap();
        assert_eq!(result.key, "diesel");
    }

    #[test]
    fn test_no_match() {
        let graph = graph_from(&[("1", "A", "diesel", 10.0)]);
        let identity = |s: &str| s.to_string();
        assert!(search_item(&graph, "cemento", &identity).is_none());
        assert!(search_item(&graph, "  ", &identity).is_none());
    }
}
