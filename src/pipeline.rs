//! Runs the five core analyzers over one graph
//!
//! Analyzers only read the graph, so they run in parallel on the rayon pool.
//! Each one is isolated: an error or a panic in one analyzer becomes a
//! [`AnalyzerOutcome::Failed`] entry and the others still complete.

use crate::algo::{
    analyze_fragmentation, detect_monopolies, extract_backbone, optimize_budget, segment_by_spend,
    AnalysisError, AnalysisResult, BackboneReport, BudgetReport, FragmentationReport, RiskReport,
    SegmentReport, Summary,
};
use crate::config::AnalysisConfig;
use crate::graph::ProcurementGraph;
use serde::Serialize;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{error, info};

/// Number of analyzers run by [`run_all`]
pub const ANALYZER_COUNT: usize = 5;

/// Result of one analyzer inside the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum AnalyzerOutcome<T> {
    Completed(T),
    Failed(String),
}

impl<T> AnalyzerOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalyzerOutcome::Completed(_))
    }

    pub fn report(&self) -> Option<&T> {
        match self {
            AnalyzerOutcome::Completed(report) => Some(report),
            AnalyzerOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalyzerOutcome::Completed(_) => None,
            AnalyzerOutcome::Failed(message) => Some(message),
        }
    }
}

/// Outcomes of all analyzers for one graph
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub risk: AnalyzerOutcome<RiskReport>,
    pub segments: AnalyzerOutcome<SegmentReport>,
    pub fragmentation: AnalyzerOutcome<FragmentationReport>,
    pub budget: AnalyzerOutcome<BudgetReport>,
    pub backbone: AnalyzerOutcome<BackboneReport>,
    pub elapsed_ms: u64,
}

impl PipelineReport {
    pub fn succeeded(&self) -> usize {
        [
            self.risk.is_completed(),
            self.segments.is_completed(),
            self.fragmentation.is_completed(),
            self.budget.is_completed(),
            self.backbone.is_completed(),
        ]
        .iter()
        .filter(|&&ok| ok)
        .count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == ANALYZER_COUNT
    }

    /// `(name, error)` for every analyzer that failed
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        [
            ("risk", self.risk.error()),
            ("segments", self.segments.error()),
            ("fragmentation", self.fragmentation.error()),
            ("budget", self.budget.error()),
            ("backbone", self.backbone.error()),
        ]
        .into_iter()
        .filter_map(|(name, err)| err.map(|e| (name, e)))
        .collect()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `analyzer`, turning both errors and panics into `Failed`
pub fn guarded<T, F>(name: &'static str, analyzer: F) -> AnalyzerOutcome<T>
where
    F: FnOnce() -> AnalysisResult<T>,
{
    let result = catch_unwind(AssertUnwindSafe(analyzer))
        .unwrap_or_else(|payload| Err(AnalysisError::Panicked(name, panic_message(payload))));

    match result {
        Ok(report) => AnalyzerOutcome::Completed(report),
        Err(e) => {
            error!(analyzer = name, error = %e, "analyzer failed");
            AnalyzerOutcome::Failed(e.to_string())
        }
    }
}

/// Run risk, segmentation, fragmentation, budget and backbone analysis
pub fn run_all(graph: &ProcurementGraph, config: &AnalysisConfig) -> PipelineReport {
    let start = Instant::now();
    let risk_params = config.risk_params();
    let budget_params = config.budget_params();

    let ((risk, segments), (fragmentation, (budget, backbone))) = rayon::join(
        || {
            rayon::join(
                || guarded("risk", || detect_monopolies(graph, &risk_params)),
                || guarded("segments", || segment_by_spend(graph)),
            )
        },
        || {
            rayon::join(
                || guarded("fragmentation", || analyze_fragmentation(graph)),
                || {
                    rayon::join(
                        || guarded("budget", || optimize_budget(graph, &budget_params)),
                        || guarded("backbone", || extract_backbone(graph)),
                    )
                },
            )
        },
    );

    let report = PipelineReport {
        risk,
        segments,
        fragmentation,
        budget,
        backbone,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        succeeded = report.succeeded(),
        total = ANALYZER_COUNT,
        elapsed_ms = report.elapsed_ms,
        "analysis pipeline finished"
    );
    report
}

fn outcome_lines<T: Summary>(title: &str, outcome: &AnalyzerOutcome<T>, lines: &mut Vec<String>) {
    lines.push(format!("== {} ==", title));
    match outcome {
        AnalyzerOutcome::Completed(report) => lines.extend(report.summary_lines()),
        AnalyzerOutcome::Failed(message) => lines.push(format!("  FAILED: {}", message)),
    }
    lines.push(String::new());
}

impl Summary for PipelineReport {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        outcome_lines("Supplier concentration risk", &self.risk, &mut lines);
        outcome_lines("Spend segmentation", &self.segments, &mut lines);
        outcome_lines("Fragmentation", &self.fragmentation, &mut lines);
        outcome_lines("Budget optimization", &self.budget, &mut lines);
        outcome_lines("Supplier backbone", &self.backbone, &mut lines);
        lines.push(format!(
            "{}/{} analyzers succeeded in {} ms",
            self.succeeded(),
            ANALYZER_COUNT,
            self.elapsed_ms
        ));
        lines
    }
}
