//! Batch analysis over many fibers.
//!
//! Fibers are independent, so each one is analyzed on the rayon pool and the
//! reports are collected back in input order.

use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::fiber::{FiberAnalyzer, InitiationSite};
use crate::domain::{AnalysisConfig, WindowKind};
use crate::error::AnalysisError;

/// Outcome of analyzing one fiber.
#[derive(Debug, Clone, Serialize)]
pub struct FiberReport {
    /// Position of the fiber in the input.
    pub fiber: usize,
    pub nodes: usize,
    pub site: Option<InitiationSite>,
    /// Kind actually extracted (`Zeros` when the site was unusable).
    pub kind: WindowKind,
    pub window: Vec<f64>,
    pub error: Option<String>,
}

impl FiberReport {
    /// Site found and far enough from both fiber ends.
    pub fn is_valid(&self) -> bool {
        self.site.is_some_and(|s| s.is_valid)
    }
}

/// Counts over a set of fiber reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[FiberReport]) -> Self {
        let mut summary = BatchSummary {
            total: reports.len(),
            ..Default::default()
        };
        for r in reports {
            if r.error.is_some() {
                summary.failed += 1;
            } else if r.is_valid() {
                summary.valid += 1;
            } else {
                summary.invalid += 1;
            }
        }
        summary
    }
}

/// Analyze one fiber: find its site, then cut the configured window around it.
///
/// A site that was found is always reported, even when the window around it
/// cannot be cut.
pub fn analyze_fiber(fiber: usize, ecs: Vec<f64>, config: &AnalysisConfig) -> FiberReport {
    let nodes = ecs.len();
    let mut analyzer = FiberAnalyzer::new(ecs);

    let failed = |site: Option<InitiationSite>, err: AnalysisError| {
        tracing::debug!(fiber, nodes, "fiber analysis failed: {err}");
        FiberReport {
            fiber,
            nodes,
            site,
            kind: WindowKind::Zeros,
            window: vec![0.0; config.num_values],
            error: Some(err.to_string()),
        }
    };

    let site = match analyzer.find_initiation_site(config.strategy, config.site_window) {
        Ok(site) => site,
        Err(err) => return failed(None, err),
    };

    let kind = if site.is_valid { config.kind } else { WindowKind::Zeros };
    match analyzer.window_at_site(kind, config.num_values) {
        Ok(window) => FiberReport {
            fiber,
            nodes,
            site: Some(site),
            kind,
            window,
            error: None,
        },
        Err(err) => failed(Some(site), err),
    }
}

/// Analyze every fiber in parallel; the output order matches the input order.
pub fn analyze_fibers(fibers: &[Vec<f64>], config: &AnalysisConfig) -> Vec<FiberReport> {
    fibers
        .par_iter()
        .enumerate()
        .map(|(idx, ecs)| analyze_fiber(idx, ecs.clone(), config))
        .collect()
}
