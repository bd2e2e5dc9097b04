//! Basic item statistics: rankings, degree distribution and interconnection

use super::{build_view, format_amount, item_index, percent, AnalysisResult, Summary};
use crate::graph::{truncate_chars, ItemId, ProcurementGraph};
use compras_graph_algorithms::two_hop_degree;
use serde::{Deserialize, Serialize};

/// Length of each ranking
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCount {
    pub item: ItemId,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAmount {
    pub item: ItemId,
    pub name: String,
    pub amount: f64,
}

/// Items whose order count falls in `[min, max]` (`max` absent: unbounded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeBucket {
    pub min: usize,
    pub max: Option<usize>,
    pub count: usize,
}

impl DegreeBucket {
    pub fn label(&self) -> String {
        match self.max {
            Some(max) if max == self.min => format!("{} order(s)", self.min),
            Some(max) => format!("{}-{} orders", self.min, max),
            None => format!("more than {} orders", self.min - 1),
        }
    }
}

const BUCKETS: [(usize, Option<usize>); 5] = [(1, Some(1)), (2, Some(5)), (6, Some(10)), (11, Some(20)), (21, None)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStatistics {
    pub top_by_orders: Vec<ItemCount>,
    pub top_by_spend: Vec<ItemAmount>,
    pub distribution: Vec<DegreeBucket>,
    pub total_orders: usize,
    /// Orders listing at least two items
    pub multi_item_orders: usize,
    pub interconnection_share: f64,
    /// Items sharing an order with the most other items
    pub top_interconnected: Vec<ItemCount>,
}

/// Rankings and distributions over all items
pub fn item_statistics(graph: &ProcurementGraph) -> AnalysisResult<ItemStatistics> {
    let name = |id: ItemId| {
        graph
            .item(id)
            .map(|i| truncate_chars(i.display_name(), 70))
            .unwrap_or_default()
    };

    let mut by_orders: Vec<ItemCount> = graph
        .items()
        .iter()
        .map(|i| ItemCount {
            item: i.id,
            name: name(i.id),
            count: graph.item_order_count(i.id),
        })
        .collect();
    by_orders.sort_by(|a, b| b.count.cmp(&a.count));

    let distribution = BUCKETS
        .iter()
        .map(|&(min, max)| DegreeBucket {
            min,
            max,
            count: by_orders
                .iter()
                .filter(|i| i.count >= min && max.map_or(true, |m| i.count <= m))
                .count(),
        })
        .collect();

    let mut top_by_spend: Vec<ItemAmount> = graph
        .items()
        .iter()
        .map(|i| ItemAmount {
            item: i.id,
            name: name(i.id),
            amount: graph.item_total_spend(i.id),
        })
        .collect();
    top_by_spend.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    top_by_spend.truncate(TOP_N);

    let multi_item_orders = graph
        .orders()
        .iter()
        .filter(|o| graph.order_item_count(o.id) >= 2)
        .count();

    let view = build_view(graph);
    let mut top_interconnected: Vec<ItemCount> = graph
        .items()
        .iter()
        .map(|i| ItemCount {
            item: i.id,
            name: name(i.id),
            count: two_hop_degree(&view, item_index(graph, i.id)),
        })
        .collect();
    top_interconnected.sort_by(|a, b| b.count.cmp(&a.count));
    top_interconnected.truncate(TOP_N);

    by_orders.truncate(TOP_N);

    Ok(ItemStatistics {
        top_by_orders: by_orders,
        top_by_spend,
        distribution,
        total_orders: graph.order_count(),
        multi_item_orders,
        interconnection_share: percent(multi_item_orders as f64, graph.order_count() as f64),
        top_interconnected,
    })
}

impl Summary for ItemStatistics {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["Top items by order count:".to_string()];
        for (rank, i) in self.top_by_orders.iter().enumerate() {
            lines.push(format!("  {}. {}: {} orders", rank + 1, i.name, i.count));
        }
        lines.push("Top items by total spend:".to_string());
        for (rank, i) in self.top_by_spend.iter().enumerate() {
            lines.push(format!("  {}. {}: {}", rank + 1, i.name, format_amount(i.amount)));
        }
        lines.push("Orders per item:".to_string());
        for bucket in &self.distribution {
            lines.push(format!("  - {}: {}", bucket.label(), bucket.count));
        }
        lines.push(format!(
            "Orders: {} | with several items: {} ({:.1}%)",
            self.total_orders, self.multi_item_orders, self.interconnection_share
        ));
        lines.push("Most interconnected items:".to_string());
        for (rank, i) in self.top_interconnected.iter().enumerate() {
            lines.push(format!("  {}. {}: shares orders with {} items", rank + 1, i.name, i.count));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_support::graph_from;

    #[test]
    fn test_rankings_and_distribution() {
        let graph = graph_from(&[
            ("1", "A", "a", 100.0),
            ("2", "A", "a", 100.0),
            ("3", "A", "a", 100.0),
            ("3", "A", "b", 500.0),
            ("4", "B", "c", 300.0),
            ("5", "B", "d", 300.0),
        ]);
        let stats = item_statistics(&graph).unwrap();

        assert_eq!(stats.top_by_orders[0].name, "A");
        assert_eq!(stats.top_by_orders[0].count, 3);

        let spend: Vec<_> = stats.top_by_spend.iter().map(|i| i.name.as_str()).collect();
        // a, c and d tie at 300, broken by name
        assert_eq!(spend, vec!["B", "A", "C", "D"]);

        let counts: Vec<_> = stats.distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 1, 0, 0, 0]);
        assert_eq!(stats.distribution[1].label(), "2-5 orders");
        assert_eq!(stats.distribution[4].label(), "more than 20 orders");

        assert_eq!(stats.total_orders, 5);
        assert_eq!(stats.multi_item_orders, 1);
        assert_eq!(stats.interconnection_share, 20.0);
        assert_eq!(stats.top_interconnected[0].count, 1);
    }

    #[test]
    fn test_empty_graph() {
        let stats = item_statistics(&ProcurementGraph::new()).unwrap();
        assert!(stats.top_by_orders.is_empty());
        assert_eq!(stats.interconnection_share, 0.0);
        assert!(stats.distribution.iter().all(|b| b.count == 0));
    }
}
