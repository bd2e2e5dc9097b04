use compras::algo::{classify, detect_monopolies, RiskClass, RiskParams};
use compras::graph::{validate_integrity, GraphBuilder, IntegrityIssue, LineRecord, SupplierInfo};
use compras::SupplierId;

fn record(order: &str, supplier: &str, item: &str, amount: f64) -> LineRecord {
    LineRecord::new(order, supplier, item, item.to_uppercase(), amount)
}

#[test]
fn test_same_order_two_suppliers_becomes_multiple() {
    let mut builder = GraphBuilder::new();
    builder.extend(vec![
        record("OC-100", "20100070970", "cemento", 40_000.0),
        record("OC-100", "20600011122", "cemento", 35_000.0),
    ]);
    let graph = builder.build();

    assert_eq!(graph.order_count(), 1);
    assert_eq!(graph.item_count(), 1);
    assert_eq!(graph.edge_count(), 1);

    let order = graph.order_by_number("OC-100").unwrap();
    assert_eq!(order.supplier_label().as_deref(), Some("MULTIPLE (2)"));
    assert!(order.is_multiple());
    let members: Vec<&str> = order.supplier_members().iter().map(|s| s.as_str()).collect();
    assert_eq!(members, vec!["20100070970", "20600011122"]);

    // Both real suppliers count, the MULTIPLE label does not
    let report = detect_monopolies(&graph, &RiskParams::default()).unwrap();
    assert_eq!(report.records.len(), 1);
    let rec = &report.records[0];
    assert_eq!(rec.supplier_count, 2);
    assert_eq!(
        rec.suppliers,
        vec![SupplierId::new("20100070970"), SupplierId::new("20600011122")]
    );
    assert_eq!(rec.total_spend, 75_000.0);
    assert_eq!(rec.class, RiskClass::CriticalDuopoly);
    assert_eq!(rec.severity, 6);

    assert!(validate_integrity(&graph).is_valid());
}

#[test]
fn test_build_is_idempotent() {
    let mut builder = GraphBuilder::new();
    builder.extend(vec![
        record("1", "A", "diesel", 10.0),
        record("1", "A", "diesel", 5.0),
        record("2", "B", "toner", 3.0),
        record("2", "C", "papel", 7.0),
        record("3", "", "agua", 1.0),
    ]);

    let first = builder.build();
    let second = builder.build();
    assert_eq!(first, second);

    // Duplicate raw rows fold into one edge
    let order = first.order_by_number("1").unwrap().id;
    let diesel = first.item_by_key("diesel").unwrap().id;
    assert_eq!(first.edge_between(order, diesel).unwrap().amount, 15.0);
    assert_eq!(first.item_order_count(diesel), 1);
}

#[test]
fn test_supplier_set_never_shrinks() {
    let mut builder = GraphBuilder::new();
    builder.extend(vec![record("7", "A", "x", 1.0), record("7", "B", "y", 1.0)]);
    let before = builder.build();
    let size_before = before.order_by_number("7").unwrap().supplier_members().len();
    assert_eq!(size_before, 2);

    // More rows from an already known supplier keep the order MULTIPLE
    builder.extend(vec![record("7", "A", "z", 1.0), record("8", "C", "x", 1.0)]);
    let after = builder.build();
    let order = after.order_by_number("7").unwrap();
    assert!(order.is_multiple());
    assert_eq!(order.supplier_members().len(), 2);

    builder.extend(vec![record("7", "D", "x", 1.0)]);
    let grown = builder.build();
    let order = grown.order_by_number("7").unwrap();
    assert!(matches!(order.suppliers, Some(SupplierInfo::Multiple(ref set)) if set.len() == 3));
    assert_eq!(order.supplier_label().as_deref(), Some("MULTIPLE (3)"));
}

#[test]
fn test_graph_is_bipartite_with_positive_weights() {
    let mut builder = GraphBuilder::new();
    builder.extend(vec![
        record("1", "A", "a", 1.0),
        record("1", "A", "b", 2.0),
        record("2", "B", "a", 3.0),
        record("3", "B", "c", 0.0),
        record("4", "B", "c", f64::NAN),
        record("5", "B", "c", -4.0),
    ]);
    assert_eq!(builder.skipped(), 3);
    let graph = builder.build();

    for edge in graph.edges() {
        assert!(edge.amount > 0.0);
        assert!(graph.order(edge.order).is_some());
        assert!(graph.item(edge.item).is_some());
    }
    // Items only exist with at least one order
    assert!(graph.item_by_key("c").is_none());
    for item in graph.items() {
        assert!(graph.item_order_count(item.id) >= 1);
    }
}

#[test]
fn test_orders_without_supplier_are_reported() {
    let mut builder = GraphBuilder::new();
    builder.extend(vec![record("1", "", "agua", 9_000.0), record("2", "A", "agua", 1_000.0)]);
    let graph = builder.build();

    let integrity = validate_integrity(&graph);
    assert!(!integrity.is_valid());
    assert_eq!(integrity.missing_supplier_count(), 1);
    assert!(matches!(integrity.issues[0], IntegrityIssue::MissingSupplier { .. }));

    // The supplier-less order is skipped by the risk classifier
    let report = detect_monopolies(&graph, &RiskParams::default()).unwrap();
    assert_eq!(report.records.len(), 0);
}

#[test]
fn test_four_suppliers_never_classify() {
    assert_eq!(classify(4, f64::MAX, 5_000.0), None);
    assert_eq!(classify(1, 25_000.0, 5_000.0), Some(RiskClass::CriticalMonopoly));

    let mut builder = GraphBuilder::new();
    builder.extend(
        ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, s)| record(&format!("{}", i), s, "diesel", 1_000_000.0)),
    );
    let report = detect_monopolies(&builder.build(), &RiskParams::default()).unwrap();
    assert!(report.records.is_empty());
}
