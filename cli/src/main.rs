//! Compras CLI: procurement graph analytics from the command line
//!
//! Reads a JSON or JSON-lines record file, builds the order/item graph and
//! prints one analysis as a table or as JSON.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use compras::algo::{
    analyze_fragmentation, degree_window, detect_monopolies, extract_backbone, interconnected_expansion,
    item_statistics, optimize_budget, segment_by_spend, Summary,
};
use compras::algo::format_amount;
use compras::graph::{validate_integrity, ProcurementGraph};
use compras::{AnalysisConfig, AnalysisSession};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compras", version, about = "Procurement graph analytics")]
struct Cli {
    /// Record file (JSON array or JSON lines)
    #[arg(long, short, env = "COMPRAS_INPUT")]
    input: PathBuf,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Items inside an order-count window
    Degree,
    /// Greedy expansion over shared orders
    Interconnected,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and report its size and integrity
    Build,
    /// Run the five core analyzers
    Analyze,
    /// Supplier concentration risk per item
    Risk {
        /// Spend threshold (overrides the configuration)
        #[arg(long)]
        threshold: Option<f64>,

        /// Rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Spend segmentation by magnitude bands
    Segments,
    /// Connected components and bridge items
    Fragmentation,
    /// Budget-constrained item selection
    Budget {
        /// Available budget (overrides the configuration)
        #[arg(long)]
        budget: Option<f64>,
    },
    /// Maximum spanning forest over suppliers sharing items
    Backbone {
        /// Edges to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Item rankings and order distribution
    Stats,
    /// Look up one item
    Search {
        query: String,
    },
    /// Size-bounded subgraph for visualization
    Subgraph {
        #[arg(long, value_enum, default_value = "interconnected")]
        strategy: Strategy,

        #[arg(long)]
        min_orders: Option<usize>,

        #[arg(long)]
        max_orders: Option<usize>,

        #[arg(long)]
        max_items: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_yaml_file(path)?,
        None => AnalysisConfig::default(),
    };

    // flag overrides
    match &cli.command {
        Commands::Risk { threshold: Some(t), .. } => config.risk.threshold = *t,
        Commands::Budget { budget: Some(b) } => config.budget.total = *b,
        Commands::Subgraph {
            min_orders,
            max_orders,
            max_items,
            ..
        } => {
            if let Some(v) = min_orders {
                config.subgraph.min_orders = *v;
            }
            if let Some(v) = max_orders {
                config.subgraph.max_orders = *v;
            }
            if let Some(v) = max_items {
                config.subgraph.max_items = *v;
            }
        }
        _ => {}
    }
    config.validate()?;

    let format = cli.format;
    let mut session = AnalysisSession::from_path(&cli.input, config)?;
    session.ensure_loaded()?;
    debug!(input = %cli.input.display(), "records loaded");

    match cli.command {
        Commands::Search { query } => match session.search(&query)? {
            Some(result) => emit(format, &result, |r| print_lines(r)),
            None => bail!("no item matches '{}'", query),
        },
        Commands::Analyze => {
            let report = session.run_all()?;
            emit(format, &report, |r| print_lines(r))
        }
        command => {
            let graph = match session.graph() {
                Some(graph) => graph,
                None => bail!("graph not loaded"),
            };
            run_graph_command(command, &session, graph, format)
        }
    }
}

fn run_graph_command(
    command: Commands,
    session: &AnalysisSession,
    graph: &ProcurementGraph,
    format: OutputFormat,
) -> Result<()> {
    let config = session.config();
    match command {
        Commands::Build => {
            let summary = match session.build_summary() {
                Some(summary) => summary,
                None => bail!("graph not loaded"),
            };
            let integrity = validate_integrity(graph);
            if format == OutputFormat::Json {
                let out = serde_json::json!({ "summary": summary, "integrity": integrity });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            print_lines(summary);
            if integrity.is_valid() {
                println!("Integrity: OK ({} orders checked)", integrity.orders_checked);
            } else {
                println!("Integrity: {} issue(s)", integrity.issues.len());
                for issue in integrity.issues.iter().take(10) {
                    println!("  - {}", issue);
                }
            }
            Ok(())
        }
        Commands::Risk { limit, .. } => {
            let report = detect_monopolies(graph, &config.risk_params())?;
            emit(format, &report, |r| {
                print_lines(r);
                let rows = r.records.iter().take(limit).map(|rec| {
                    vec![
                        rec.class.label().to_string(),
                        rec.severity.to_string(),
                        rec.item_name.clone(),
                        rec.supplier_count.to_string(),
                        format_amount(rec.total_spend),
                        rec.order_count.to_string(),
                        format_amount(rec.average_spend),
                    ]
                });
                print_table(&["Class", "Severity", "Item", "Suppliers", "Spend", "Orders", "Avg/order"], rows);
            })
        }
        Commands::Segments => {
            let report = segment_by_spend(graph)?;
            emit(format, &report, |r| {
                let rows = r.bands.iter().map(|b| {
                    vec![
                        b.band.label().to_string(),
                        b.count.to_string(),
                        format!("{:.1}%", b.share),
                        format_amount(b.total_spend),
                        format_amount(b.average_spend),
                    ]
                });
                print_table(&["Band", "Items", "Share", "Spend", "Average"], rows);
                print_lines(r);
            })
        }
        Commands::Fragmentation => {
            let report = analyze_fragmentation(graph)?;
            emit(format, &report, |r| {
                print_lines(r);
                let rows = r.bridges.iter().map(|b| {
                    vec![b.name.clone(), b.order_count.to_string(), b.connected_items.to_string()]
                });
                print_table(&["Bridge item", "Orders", "Connected items"], rows);
            })
        }
        Commands::Budget { .. } => {
            let report = optimize_budget(graph, &config.budget_params())?;
            emit(format, &report, |r| {
                print_lines(r);
                let rows = r.selections.iter().map(|s| {
                    vec![
                        s.name.clone(),
                        format_amount(s.cost),
                        s.value.to_string(),
                        s.order_count.to_string(),
                        if s.critical { "yes" } else { "" }.to_string(),
                    ]
                });
                print_table(&["Item", "Cost", "Value", "Orders", "Critical"], rows);
            })
        }
        Commands::Backbone { limit } => {
            let report = extract_backbone(graph)?;
            emit(format, &report, |r| {
                print_lines(r);
                let rows = r.edges.iter().take(limit).map(|e| {
                    vec![
                        e.source.to_string(),
                        e.target.to_string(),
                        format_amount(e.weight),
                        e.shared_items.to_string(),
                    ]
                });
                print_table(&["Supplier", "Supplier", "Weight", "Shared items"], rows);
            })
        }
        Commands::Stats => {
            let stats = item_statistics(graph)?;
            emit(format, &stats, |s| print_lines(s))
        }
        Commands::Subgraph { strategy, .. } => {
            let params = config.subgraph_params();
            let selection = match strategy {
                Strategy::Degree => degree_window(graph, &params)?,
                Strategy::Interconnected => interconnected_expansion(graph, &params)?,
            };
            emit(format, &selection, |s| print_lines(s))
        }
        Commands::Analyze | Commands::Search { .. } => bail!("command needs a mutable session"),
    }
}

/// Print `value` as pretty JSON, or hand it to `table` for human output
fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => table(value),
    }
    Ok(())
}

fn print_lines<S: Summary + ?Sized>(report: &S) {
    for line in report.summary_lines() {
        println!("{}", line);
    }
}

fn print_table<I>(header: &[&str], rows: I)
where
    I: Iterator<Item = Vec<String>>,
{
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());

    let mut count = 0;
    for row in rows {
        table.add_row(row);
        count += 1;
    }

    if count == 0 {
        println!("(no results)");
        return;
    }
    println!("{}", table);
    println!("{} row(s)", count);
}
