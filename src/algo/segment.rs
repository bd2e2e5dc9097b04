//! Divide-and-conquer spend segmentation
//!
//! Items are bucketed into five fixed spend bands, recursively, until a node
//! holds few enough items or the depth limit is reached.

use super::{format_amount, percent, AnalysisResult, Summary};
use crate::graph::{truncate_chars, ItemId, ProcurementGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// A node with at most this many items is a leaf
pub const MAX_LEAF_ITEMS: usize = 10;
/// Recursion stops at this depth
pub const MAX_DEPTH: usize = 3;
/// Characters kept from an item name in segment listings
pub const SEGMENT_NAME_MAX_CHARS: usize = 60;

/// Fixed total-spend bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpendBand {
    /// < 1,000
    #[serde(rename = "MICRO")]
    Micro,
    /// [1,000, 10,000)
    #[serde(rename = "PEQUEÑAS")]
    Small,
    /// [10,000, 50,000)
    #[serde(rename = "MEDIANAS")]
    Medium,
    /// [50,000, 200,000)
    #[serde(rename = "GRANDES")]
    Large,
    /// >= 200,000
    #[serde(rename = "MEGA")]
    Mega,
}

impl SpendBand {
    pub const ALL: [SpendBand; 5] = [
        SpendBand::Micro,
        SpendBand::Small,
        SpendBand::Medium,
        SpendBand::Large,
        SpendBand::Mega,
    ];

    pub fn of(spend: f64) -> Self {
        if spend < 1_000.0 {
            SpendBand::Micro
        } else if spend < 10_000.0 {
            SpendBand::Small
        } else if spend < 50_000.0 {
            SpendBand::Medium
        } else if spend < 200_000.0 {
            SpendBand::Large
        } else {
            SpendBand::Mega
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpendBand::Micro => "MICRO",
            SpendBand::Small => "PEQUEÑAS",
            SpendBand::Medium => "MEDIANAS",
            SpendBand::Large => "GRANDES",
            SpendBand::Mega => "MEGA",
        }
    }
}

/// Spend profile of one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpend {
    pub item: ItemId,
    pub name: String,
    pub order_count: usize,
    pub total_spend: f64,
    pub average_order_amount: f64,
    pub min_order_amount: f64,
    pub max_order_amount: f64,
}

/// Aggregate of one band at the top level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub band: SpendBand,
    pub count: usize,
    /// Percentage of all items
    pub share: f64,
    pub total_spend: f64,
    pub min_spend: f64,
    pub max_spend: f64,
    pub average_spend: f64,
    /// Highest-spend items, at most three
    pub top_items: Vec<ItemSpend>,
}

/// Node of the segmentation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Terminal list, ascending by total spend
    Leaf { depth: usize, items: Vec<ItemSpend> },
    /// Non-empty bands only
    Split { depth: usize, bands: BTreeMap<SpendBand, Segment> },
}

impl Segment {
    pub fn depth(&self) -> usize {
        match self {
            Segment::Leaf { depth, .. } | Segment::Split { depth, .. } => *depth,
        }
    }

    /// Items in every leaf below this node
    pub fn leaf_items(&self) -> Vec<&ItemSpend> {
        match self {
            Segment::Leaf { items, .. } => items.iter().collect(),
            Segment::Split { bands, .. } => bands.values().flat_map(Segment::leaf_items).collect(),
        }
    }
}

/// Output of [`segment_by_spend`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub total_items: usize,
    pub total_spend: f64,
    pub bands: Vec<BandSummary>,
    pub tree: Segment,
}

/// Per-item spend profiles sorted ascending by total spend
pub fn item_spends(graph: &ProcurementGraph) -> Vec<ItemSpend> {
    let mut spends: Vec<ItemSpend> = graph
        .items()
        .iter()
        .filter_map(|item| {
            let amounts: Vec<f64> = graph.item_edges(item.id).map(|e| e.amount).collect();
            if amounts.is_empty() {
                return None;
            }
            let total: f64 = amounts.iter().sum();
            Some(ItemSpend {
                item: item.id,
                name: truncate_chars(item.display_name(), SEGMENT_NAME_MAX_CHARS),
                order_count: amounts.len(),
                total_spend: total,
                average_order_amount: total / amounts.len() as f64,
                min_order_amount: amounts.iter().copied().fold(f64::INFINITY, f64::min),
                max_order_amount: amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        })
        .collect();

    spends.sort_by(|a, b| a.total_spend.total_cmp(&b.total_spend));
    spends
}

fn partition(items: Vec<ItemSpend>) -> BTreeMap<SpendBand, Vec<ItemSpend>> {
    let mut bands: BTreeMap<SpendBand, Vec<ItemSpend>> = BTreeMap::new();
    for item in items {
        bands.entry(SpendBand::of(item.total_spend)).or_default().push(item);
    }
    bands
}

fn split(items: Vec<ItemSpend>, depth: usize) -> Segment {
    if items.len() <= MAX_LEAF_ITEMS || depth >= MAX_DEPTH {
        return Segment::Leaf { depth, items };
    }

    let bands = partition(items)
        .into_iter()
        .map(|(band, members)| (band, split(members, depth + 1)))
        .collect();
    Segment::Split { depth, bands }
}

fn summarize(band: SpendBand, members: &[ItemSpend], total_items: usize) -> BandSummary {
    let total: f64 = members.iter().map(|i| i.total_spend).sum();
    let mut top: Vec<ItemSpend> = members.to_vec();
    top.sort_by(|a, b| b.total_spend.total_cmp(&a.total_spend));
    top.truncate(3);

    BandSummary {
        band,
        count: members.len(),
        share: percent(members.len() as f64, total_items as f64),
        total_spend: total,
        min_spend: members.iter().map(|i| i.total_spend).fold(f64::INFINITY, f64::min),
        max_spend: members.iter().map(|i| i.total_spend).fold(f64::NEG_INFINITY, f64::max),
        average_spend: total / members.len() as f64,
        top_items: top,
    }
}

/// Segment items by total spend
pub fn segment_by_spend(graph: &ProcurementGraph) -> AnalysisResult<SegmentReport> {
    let items = item_spends(graph);
    let total_items = items.len();
    let total_spend = items.iter().map(|i| i.total_spend).sum();

    let bands = partition(items.clone())
        .iter()
        .map(|(&band, members)| summarize(band, members, total_items))
        .collect();
    let tree = split(items, 0);

    info!(items = total_items, root_depth = tree.depth(), "spend segmentation complete");

    Ok(SegmentReport {
        total_items,
        total_spend,
        bands,
        tree,
    })
}

impl Summary for SegmentReport {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Spend ranges (divide and conquer)".to_string(),
            format!("  Items: {} | Total spend: {}", self.total_items, format_amount(self.total_spend)),
        ];
        for band in &self.bands {
            lines.push(format!("  {}:", band.band.label()));
            lines.push(format!("    Count: {} items ({:.1}%)", band.count, band.share));
            lines.push(format!("    Total: {}", format_amount(band.total_spend)));
            lines.push(format!(
                "    Range: {} - {}",
                format_amount(band.min_spend),
                format_amount(band.max_spend)
            ));
            lines.push(format!("    Average: {}", format_amount(band.average_spend)));
            for item in &band.top_items {
                lines.push(format!(
                    "      - {}: {}",
                    truncate_chars(&item.name, 50),
                    format_amount(item.total_spend)
                ));
            }
        }
        lines
    }
}
