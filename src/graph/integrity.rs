//! Post-build consistency checks
//!
//! The checks report problems and never repair them.

use super::node::SupplierInfo;
use super::store::ProcurementGraph;
use super::types::OrderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single integrity violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IntegrityIssue {
    /// No record of the order named a supplier
    MissingSupplier { order: OrderId, number: String },

    /// `Multiple` holding fewer than two suppliers
    DegenerateMultiple { order: OrderId, number: String, members: usize },

    /// Edges of a `Single` order attribute spend to several suppliers
    UnflaggedMultiple { order: OrderId, number: String, suppliers: usize },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::MissingSupplier { number, .. } => {
                write!(f, "order {} has no supplier information", number)
            }
            IntegrityIssue::DegenerateMultiple { number, members, .. } => {
                write!(f, "order {} is flagged MULTIPLE with {} member(s)", number, members)
            }
            IntegrityIssue::UnflaggedMultiple { number, suppliers, .. } => {
                write!(f, "order {} has {} suppliers but is not flagged MULTIPLE", number, suppliers)
            }
        }
    }
}

/// Result of [`validate_integrity`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub orders_checked: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn missing_supplier_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, IntegrityIssue::MissingSupplier { .. }))
            .count()
    }
}

/// Check every order's supplier information against its edges
pub fn validate_integrity(graph: &ProcurementGraph) -> IntegrityReport {
    let mut issues = Vec::new();

    for order in graph.orders() {
        match &order.suppliers {
            None => issues.push(IntegrityIssue::MissingSupplier {
                order: order.id,
                number: order.number.clone(),
            }),
            Some(SupplierInfo::Multiple(set)) if set.len() < 2 => {
                issues.push(IntegrityIssue::DegenerateMultiple {
                    order: order.id,
                    number: order.number.clone(),
                    members: set.len(),
                })
            }
            Some(SupplierInfo::Multiple(_)) => {}
            Some(SupplierInfo::Single(_)) => {
                let seen: BTreeSet<_> = graph
                    .order_edges(order.id)
                    .flat_map(|e| e.contributions.keys())
                    .collect();
                if seen.len() > 1 {
                    issues.push(IntegrityIssue::UnflaggedMultiple {
                        order: order.id,
                        number: order.number.clone(),
                        suppliers: seen.len(),
                    });
                }
            }
        }
    }

    IntegrityReport {
        orders_checked: graph.order_count(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, LineRecord, SupplierId};

    #[test]
    fn test_clean_graph_is_valid() {
        let mut builder = GraphBuilder::new();
        builder.extend(vec![
            LineRecord::new("1", "A", "diesel", "DIESEL", 10.0),
            LineRecord::new("2", "A", "diesel", "DIESEL", 10.0),
            LineRecord::new("2", "B", "toner", "TONER", 10.0),
        ]);
        let report = validate_integrity(&builder.build());
        assert!(report.is_valid());
        assert_eq!(report.orders_checked, 2);
    }

    #[test]
    fn test_missing_supplier_is_reported() {
        let mut builder = GraphBuilder::new();
        builder.extend(vec![LineRecord::new("9", "", "diesel", "DIESEL", 10.0)]);
        let report = validate_integrity(&builder.build());
        assert_eq!(report.missing_supplier_count(), 1);
        assert!(report.issues[0].to_string().contains("order 9"));
    }

    #[test]
    fn test_tampered_orders_are_reported() {
        let mut builder = GraphBuilder::new();
        builder.extend(vec![
            LineRecord::new("1", "A", "diesel", "DIESEL", 10.0),
            LineRecord::new("1", "B", "toner", "TONER", 10.0),
            LineRecord::new("2", "C", "toner", "TONER", 10.0),
        ]);
        let mut graph = builder.build();

        let first = graph.order_by_number("1").unwrap().id;
        graph.order_mut(first).unwrap().suppliers = Some(SupplierInfo::Single(SupplierId::new("A")));
        let second = graph.order_by_number("2").unwrap().id;
        graph.order_mut(second).unwrap().suppliers =
            Some(SupplierInfo::Multiple([SupplierId::new("C")].into_iter().collect()));

        let report = validate_integrity(&graph);
        assert_eq!(report.issues.len(), 2);
        assert!(matches!(report.issues[0], IntegrityIssue::UnflaggedMultiple { suppliers: 2, .. }));
        assert!(matches!(report.issues[1], IntegrityIssue::DegenerateMultiple { members: 1, .. }));
    }
}
