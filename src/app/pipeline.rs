//! Shared pipeline logic used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflows:
//! - potentials -> per-fiber sites -> windows -> summary
//! - tract + thresholds -> activation per pulse width -> summary
//!
//! The front-end can then focus on presentation (printing vs exporting).

use crate::activation::{self, ActivationSummary, PulseWidthActivation};
use crate::analysis::{BatchSummary, FiberReport, analyze_fibers};
use crate::domain::{ActivationConfig, AnalysisConfig, Bounds3, Tract};
use crate::error::AppError;
use crate::io::{load_thresholds, read_tract_file};

/// All computed outputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub reports: Vec<FiberReport>,
    pub summary: BatchSummary,
}

/// All computed outputs of one activation run.
#[derive(Debug, Clone)]
pub struct ActivationRun {
    pub tracts: Vec<Tract>,
    pub bounds: Bounds3,
    pub electrode: Bounds3,
    pub results: Vec<PulseWidthActivation>,
    pub summary: ActivationSummary,
}

pub fn run_analysis(fibers: &[Vec<f64>], config: &AnalysisConfig) -> Result<AnalysisRun, AppError> {
    if fibers.is_empty() {
        return Err(AppError::new(3, "No fibers to analyze."));
    }

    let reports = analyze_fibers(fibers, config);
    let summary = BatchSummary::from_reports(&reports);
    tracing::info!(
        fibers = summary.total,
        valid = summary.valid,
        invalid = summary.invalid,
        failed = summary.failed,
        strategy = %config.strategy,
        "analyzed fibers"
    );

    if summary.failed == summary.total {
        return Err(AppError::new(4, "Analysis failed for every fiber."));
    }

    Ok(AnalysisRun { reports, summary })
}

pub fn run_activation(config: &ActivationConfig) -> Result<ActivationRun, AppError> {
    if !config.voltage_limit.is_finite() {
        return Err(AppError::new(2, "Voltage limit must be a finite number."));
    }
    let pw_indices = activation::select_pulse_widths(config.pulse_width_index)?;

    let tracts = read_tract_file(&config.tract_path)?;
    let table = load_thresholds(&config.thresholds_path)?;
    tracing::info!(
        fibers = tracts.len(),
        pulse_widths = pw_indices.len(),
        voltage_limit = config.voltage_limit,
        "loaded tract and thresholds"
    );

    let limit = config.voltage_limit;
    let results = activation::activate(tracts.len(), &table, limit, &pw_indices);
    let summary = activation::summarize(&results, tracts.len(), limit, config.conductivity);

    Ok(ActivationRun {
        bounds: activation::bounds_from_fibers(&tracts),
        electrode: config.conductivity.electrode_bounds(),
        tracts,
        results,
        summary,
    })
}
