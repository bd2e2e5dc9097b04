//! Analysis session: record loading and a cached graph
//!
//! An [`AnalysisSession`] owns the configuration and the record source. The
//! graph is built on the first [`AnalysisSession::ensure_loaded`] call and
//! reused until [`AnalysisSession::reload`].
//!
//! Record files are either a JSON array or JSON lines. Field names follow
//! [`LineRecord`]; the upper-case column names of the procurement exports
//! (`ORDEN_NUMERO`, `ORDEN_PROVEEDOR`, ...) are accepted as aliases.

use crate::algo::{search_item, ItemSearchResult};
use crate::config::AnalysisConfig;
use crate::graph::{BuildSummary, GraphBuilder, LineRecord, ProcurementGraph};
use crate::normalize::{DescriptionNormalizer, Normalize};
use crate::pipeline::{self, PipelineReport};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One row of a record file. `item_key` is derived from `description`
/// when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "ORDEN_NUMERO", deserialize_with = "text_or_number")]
    pub order_number: String,
    #[serde(default, alias = "ORDEN_PROVEEDOR", deserialize_with = "optional_text_or_number")]
    pub supplier_id: Option<String>,
    #[serde(default, alias = "ORDEN_DESCRIPCION_NORM")]
    pub item_key: Option<String>,
    #[serde(alias = "ORDEN_DESCRIPCION")]
    pub description: String,
    #[serde(alias = "ORDEN_MONTO")]
    pub amount: f64,
}

/// Identifier columns arrive as text or as JSON numbers depending on the export
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Integer(n) => n.to_string(),
            // 20100070970.0 is the supplier 20100070970
            TextOrNumber::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            TextOrNumber::Float(f) => f.to_string(),
        }
    }
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    TextOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<TextOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

impl RawRecord {
    pub fn into_line<N: Normalize + ?Sized>(self, normalizer: &N) -> LineRecord {
        let item_key = match self.item_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => normalizer.normalize(&self.description),
        };
        LineRecord {
            order_number: self.order_number,
            supplier_id: self.supplier_id.unwrap_or_default(),
            item_key,
            description: self.description,
            amount: self.amount,
        }
    }
}

/// Parse a JSON array or JSON-lines document
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("invalid JSON record array");
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid record on line {}", n + 1))
        })
        .collect()
}

pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records from {}", path.display()))?;
    parse_records(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Where the session gets its records from
#[derive(Debug, Clone)]
pub enum RecordSource {
    File(PathBuf),
    Records(Vec<RawRecord>),
}

#[derive(Debug)]
struct Loaded {
    graph: ProcurementGraph,
    summary: BuildSummary,
}

/// Configuration, record source and the lazily built graph
#[derive(Debug)]
pub struct AnalysisSession {
    config: AnalysisConfig,
    source: RecordSource,
    normalizer: DescriptionNormalizer,
    loaded: Option<Loaded>,
}

impl AnalysisSession {
    pub fn new(source: RecordSource, config: AnalysisConfig) -> Result<Self> {
        let normalizer = DescriptionNormalizer::new().context("failed to compile description normalizer")?;
        Ok(Self {
            config,
            source,
            normalizer,
            loaded: None,
        })
    }

    pub fn from_path(path: impl Into<PathBuf>, config: AnalysisConfig) -> Result<Self> {
        Self::new(RecordSource::File(path.into()), config)
    }

    pub fn from_records(records: Vec<RawRecord>, config: AnalysisConfig) -> Result<Self> {
        Self::new(RecordSource::Records(records), config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Changing the configuration keeps the cached graph
    pub fn config_mut(&mut self) -> &mut AnalysisConfig {
        &mut self.config
    }

    pub fn normalizer(&self) -> &DescriptionNormalizer {
        &self.normalizer
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The cached graph, if it has been built
    pub fn graph(&self) -> Option<&ProcurementGraph> {
        self.loaded.as_ref().map(|l| &l.graph)
    }

    pub fn build_summary(&self) -> Option<&BuildSummary> {
        self.loaded.as_ref().map(|l| &l.summary)
    }

    /// Build the graph unless it is cached
    pub fn ensure_loaded(&mut self) -> Result<&ProcurementGraph> {
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => self.load()?,
        };
        Ok(&self.loaded.insert(loaded).graph)
    }

    /// Drop the cached graph and build it again from the source
    pub fn reload(&mut self) -> Result<&ProcurementGraph> {
        self.loaded = None;
        self.ensure_loaded()
    }

    fn load(&self) -> Result<Loaded> {
        let records = match &self.source {
            RecordSource::File(path) => read_records(path)?,
            RecordSource::Records(records) => records.clone(),
        };
        debug!(records = records.len(), "records read");

        let mut builder = GraphBuilder::new();
        builder.extend(records.into_iter().map(|r| r.into_line(&self.normalizer)));
        let graph = builder.build();
        let summary = builder.summary(&graph);

        info!(
            records = summary.records,
            skipped = summary.skipped_records,
            orders = summary.orders,
            items = summary.items,
            "session graph loaded"
        );
        Ok(Loaded { graph, summary })
    }

    /// Run the five analyzers over the cached graph
    pub fn run_all(&mut self) -> Result<PipelineReport> {
        self.ensure_loaded()?;
        let graph = self.graph().context("graph not loaded")?;
        Ok(pipeline::run_all(graph, &self.config))
    }

    pub fn search(&mut self, query: &str) -> Result<Option<ItemSearchResult>> {
        self.ensure_loaded()?;
        let graph = self.graph().context("graph not loaded")?;
        Ok(search_item(graph, query, &self.normalizer))
    }
}
