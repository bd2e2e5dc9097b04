use compras::algo::{
    analyze_fragmentation, extract_backbone, optimize_budget, segment_by_spend, BudgetParams, Segment, SpendBand,
};
use compras::graph::{GraphBuilder, LineRecord, ProcurementGraph};
use compras_graph_algorithms::UnionFind;
use std::collections::HashSet;

fn graph_from(rows: &[(&str, &str, &str, f64)]) -> ProcurementGraph {
    let mut builder = GraphBuilder::new();
    builder.extend(
        rows.iter()
            .map(|&(o, s, i, a)| LineRecord::new(o, s, i, i.to_uppercase(), a)),
    );
    builder.build()
}

#[test]
fn test_segmentation_boundary_and_partition() {
    let mut rows: Vec<(String, String, f64)> = (0..11)
        .map(|i| (format!("{}", i), format!("micro{}", i), 50.0 * (i + 1) as f64))
        .collect();
    rows.push(("100".to_string(), "edge".to_string(), 1_000.0));
    rows.push(("101".to_string(), "big".to_string(), 20_000.0));
    let borrowed: Vec<(&str, &str, &str, f64)> =
        rows.iter().map(|(o, i, a)| (o.as_str(), "A", i.as_str(), *a)).collect();
    let graph = graph_from(&borrowed);

    let report = segment_by_spend(&graph).unwrap();
    assert_eq!(report.total_items, 13);

    let bands = match &report.tree {
        Segment::Split { bands, .. } => bands,
        Segment::Leaf { .. } => panic!("13 items must split at the root"),
    };
    let small: Vec<&str> = bands[&SpendBand::Small].leaf_items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(small, vec!["EDGE"]);
    assert!(bands[&SpendBand::Micro]
        .leaf_items()
        .iter()
        .all(|i| i.total_spend < 1_000.0));

    // Every item lands in exactly one leaf
    let leaves = report.tree.leaf_items();
    assert_eq!(leaves.len(), graph.item_count());
    let unique: HashSet<_> = leaves.iter().map(|i| i.item).collect();
    assert_eq!(unique.len(), graph.item_count());

    let summary_counts: usize = report.bands.iter().map(|b| b.count).sum();
    assert_eq!(summary_counts, 13);
}

#[test]
fn test_components_partition_items() {
    let graph = graph_from(&[
        ("1", "A", "a", 1.0),
        ("1", "A", "b", 1.0),
        ("2", "B", "b", 1.0),
        ("2", "B", "c", 1.0),
        ("3", "C", "d", 1.0),
        ("4", "C", "e", 1.0),
        ("4", "C", "d", 1.0),
        ("5", "D", "f", 1.0),
    ]);
    let report = analyze_fragmentation(&graph).unwrap();
    assert_eq!(report.component_count, 3);

    let mut seen = HashSet::new();
    for component in &report.components {
        for item in component {
            assert!(seen.insert(*item), "item in two components");
        }
    }
    assert_eq!(seen.len(), graph.item_count());

    // Sizes descending
    let sizes: Vec<usize> = report.components.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 2, 1]);

    // Linking the pieces through one order makes it a single component
    let connected = graph_from(&[
        ("1", "A", "a", 1.0),
        ("1", "A", "d", 1.0),
        ("1", "A", "f", 1.0),
        ("2", "B", "b", 1.0),
        ("2", "B", "a", 1.0),
    ]);
    assert_eq!(analyze_fragmentation(&connected).unwrap().component_count, 1);
}

#[test]
fn test_budget_repair_when_scaled_costs_overshoot() {
    // Each item scales to one slot of 10, so all ten fit the scaled capacity
    // while their real cost is 199
    let rows: Vec<(String, String)> = (0..10).map(|i| (format!("{}", i), format!("item{}", i))).collect();
    let borrowed: Vec<(&str, &str, &str, f64)> =
        rows.iter().map(|(o, i)| (o.as_str(), "A", i.as_str(), 19.9)).collect();
    let graph = graph_from(&borrowed);

    let params = BudgetParams {
        budget: 100.0,
        max_capacity_slots: 10,
        ..BudgetParams::default()
    };
    let report = optimize_budget(&graph, &params).unwrap();

    assert_eq!(report.scale.factor, 10.0);
    assert_eq!(report.scale.capacity, 10);
    assert_eq!(report.evicted, 5);
    assert_eq!(report.selections.len(), 5);
    assert!(report.total_cost <= 100.0);
    assert!((report.total_cost - 99.5).abs() < 1e-9);
}

#[test]
fn test_budget_never_exceeds_real_budget() {
    let graph = graph_from(&[
        ("1", "A", "agua", 40_000.0),
        ("2", "A", "agua", 45_000.0),
        ("3", "B", "toner", 900.0),
        ("4", "C", "cemento", 60_000.0),
        ("5", "C", "hospital", 99_000.0),
        ("6", "D", "mega", 500_000.0),
    ]);
    for budget in [1_000.0, 50_000.0, 100_000.0, 250_000.0] {
        let report = optimize_budget(&graph, &BudgetParams::with_budget(budget)).unwrap();
        assert!(report.total_cost <= budget, "budget {}", budget);
        assert!(report.selections.iter().all(|s| s.name != "MEGA"));
    }
}

#[test]
fn test_backbone_components() {
    let graph = graph_from(&[
        ("1", "A", "x", 100.0),
        ("2", "B", "x", 50.0),
        ("3", "B", "y", 30.0),
        ("4", "C", "y", 20.0),
        ("5", "D", "z", 10.0),
    ]);
    let report = extract_backbone(&graph).unwrap();

    assert_eq!(report.supplier_count, 4);
    assert_eq!(report.edges.len(), 2);
    assert_eq!(report.component_count, 2);
    assert_eq!(report.essential_suppliers, 3);
    // A-B on x: 150, B-C on y: 50
    assert_eq!(report.total_weight, 200.0);
    assert_eq!(report.edges[0].weight, 150.0);
}

#[test]
fn test_union_find_double_union() {
    let mut uf = UnionFind::new(4);
    assert!(uf.union(0, 1));
    assert!(!uf.union(1, 0));

    let root = uf.find(1);
    assert_eq!(uf.find(1), root);
    assert_eq!(uf.find(0), root);
    assert_eq!(uf.component_count(), 3);
    assert_eq!(uf.get_components().len(), 3);
}
