use compras::algo::Summary;
use compras::{AnalysisConfig, AnalysisSession, AnalyzerOutcome};
use std::io::Write;
use tempfile::NamedTempFile;

const RECORDS: &str = r#"[
  {"ORDEN_NUMERO": "0001-2024", "ORDEN_PROVEEDOR": "20100070970", "ORDEN_DESCRIPCION": "ADQUISICION DE PETROLEO DIESEL B5 PARA MAQUINARIA", "ORDEN_MONTO": 42000.0},
  {"ORDEN_NUMERO": "0001-2024", "ORDEN_PROVEEDOR": "20600011122", "ORDEN_DESCRIPCION": "ADQUISICION DE PETROLEO DIESEL B5 PARA MAQUINARIA", "ORDEN_MONTO": 8000.0},
  {"ORDEN_NUMERO": "0002-2024", "ORDEN_PROVEEDOR": "20100070970", "ORDEN_DESCRIPCION": "COMPRA DE AGUA DE MESA X 20 LITROS", "ORDEN_MONTO": 3500.0},
  {"ORDEN_NUMERO": "0002-2024", "ORDEN_PROVEEDOR": "20100070970", "ORDEN_DESCRIPCION": "TONER HP 85A", "ORDEN_MONTO": 900.0},
  {"ORDEN_NUMERO": "0003-2024", "ORDEN_PROVEEDOR": "20455566677", "ORDEN_DESCRIPCION": "CEMENTO PORTLAND TIPO I", "ORDEN_MONTO": 15000.0},
  {"ORDEN_NUMERO": "0004-2024", "ORDEN_PROVEEDOR": "20455566677", "ORDEN_DESCRIPCION": "TONER HP 85A", "ORDEN_MONTO": 450.0}
]"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_records_file_to_pipeline() {
    let records = write_temp(RECORDS);
    let config = write_temp("risk:\n  threshold: 4000\nbudget:\n  total: 20000\n");

    let config = AnalysisConfig::from_yaml_file(config.path()).unwrap();
    let mut session = AnalysisSession::from_path(records.path(), config).unwrap();

    let graph = session.ensure_loaded().unwrap();
    assert_eq!(graph.order_count(), 4);
    // diesel, agua de mesa, toner, cemento
    assert_eq!(graph.item_count(), 4);
    assert!(graph.item_by_key("diesel").is_some());
    assert!(graph.item_by_key("agua de mesa").is_some());

    let order = graph.order_by_number("0001-2024").unwrap();
    assert_eq!(order.supplier_label().as_deref(), Some("MULTIPLE (2)"));

    let report = session.run_all().unwrap();
    assert_eq!(report.succeeded(), 5);

    match &report.risk {
        AnalyzerOutcome::Completed(risk) => {
            assert_eq!(risk.threshold, 4_000.0);
            let diesel = risk.records.iter().find(|r| r.supplier_count == 2).unwrap();
            assert_eq!(diesel.total_spend, 50_000.0);
        }
        AnalyzerOutcome::Failed(e) => panic!("risk failed: {}", e),
    }

    let budget = report.budget.report().unwrap();
    assert_eq!(budget.budget, 20_000.0);
    assert!(budget.total_cost <= 20_000.0);
    // "agua" is a critical keyword
    assert!(budget.selections.iter().any(|s| s.critical));

    let lines = report.summary_lines();
    assert_eq!(lines.last().map(|l| l.starts_with("5/5")), Some(true));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["backbone"]["status"], "completed");
}

#[test]
fn test_invalid_config_file() {
    let config = write_temp("subgraph:\n  max_items: 0\n");
    assert!(AnalysisConfig::from_yaml_file(config.path()).is_err());
}

#[test]
fn test_search_through_session() {
    let records = write_temp(RECORDS);
    let mut session = AnalysisSession::from_path(records.path(), AnalysisConfig::default()).unwrap();

    let result = session.search("toner").unwrap().unwrap();
    assert_eq!(result.order_count, 2);
    assert_eq!(result.total_spend, 1_350.0);
    assert_eq!(result.suppliers.len(), 2);

    assert!(session.search("ladrillo").unwrap().is_none());
}
