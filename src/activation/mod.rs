//! Fiber activation per pulse width.
//!
//! A fiber is activated at a pulse width when its threshold is strictly below
//! the stimulation voltage limit. Fibers without a usable threshold (no entry,
//! `null`, or non-numeric) count as not activated.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::{Bounds3, Conductivity, PULSE_WIDTHS_US, Tract};
use crate::error::AppError;
use crate::io::ThresholdTable;

/// Activation flags for one pulse width.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseWidthActivation {
    /// Index into `PULSE_WIDTHS_US`.
    pub index: usize,
    pub pulse_width_us: u32,
    /// One flag per fiber of the tract.
    pub activated: Vec<bool>,
}

impl PulseWidthActivation {
    pub fn activated_indices(&self) -> Vec<usize> {
        self.activated
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.activated.iter().filter(|&&on| on).count()
    }
}

/// Serialized run summary (`activation_summary.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationSummary {
    pub pulse_widths: Vec<u32>,
    pub voltage_limit: f64,
    /// Activated fiber indices keyed by pulse width (us).
    pub activated: BTreeMap<u32, Vec<usize>>,
    pub fibers: usize,
    pub conductivity: Conductivity,
    pub generated: DateTime<Local>,
}

/// Flag each of `n_fibers` fibers as activated under `voltage_limit`.
pub fn classify(row: &[Option<f64>], n_fibers: usize, voltage_limit: f64) -> Vec<bool> {
    (0..n_fibers)
        .map(|i| row.get(i).copied().flatten().is_some_and(|thr| thr < voltage_limit))
        .collect()
}

/// Pulse-width indices to process: all of them, or a single validated one.
pub fn select_pulse_widths(index: Option<usize>) -> Result<Vec<usize>, AppError> {
    match index {
        None => Ok((0..PULSE_WIDTHS_US.len()).collect()),
        Some(i) if i < PULSE_WIDTHS_US.len() => Ok(vec![i]),
        Some(i) => Err(AppError::new(
            2,
            format!(
                "Pulse width index {i} out of range [0, {}].",
                PULSE_WIDTHS_US.len() - 1
            ),
        )),
    }
}

/// Classify every selected pulse width.
pub fn activate(
    n_fibers: usize,
    table: &ThresholdTable,
    voltage_limit: f64,
    pw_indices: &[usize],
) -> Vec<PulseWidthActivation> {
    let covered = table.fibers();
    if covered < n_fibers {
        tracing::warn!(
            covered,
            n_fibers,
            "thresholds cover fewer fibers than the tract; missing fibers count as not activated"
        );
    }

    pw_indices
        .iter()
        .map(|&index| {
            let activated = classify(table.row(index), n_fibers, voltage_limit);
            let result = PulseWidthActivation {
                index,
                pulse_width_us: PULSE_WIDTHS_US[index],
                activated,
            };
            tracing::debug!(
                pulse_width_us = result.pulse_width_us,
                activated = result.count(),
                "classified pulse width"
            );
            result
        })
        .collect()
}

pub fn summarize(
    results: &[PulseWidthActivation],
    n_fibers: usize,
    voltage_limit: f64,
    conductivity: Conductivity,
) -> ActivationSummary {
    ActivationSummary {
        pulse_widths: PULSE_WIDTHS_US.to_vec(),
        voltage_limit,
        activated: results
            .iter()
            .map(|r| (r.pulse_width_us, r.activated_indices()))
            .collect(),
        fibers: n_fibers,
        conductivity,
        generated: Local::now(),
    }
}

/// Bounding box of all fiber points; the unit box when there are none.
pub fn bounds_from_fibers(fibers: &[Tract]) -> Bounds3 {
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for p in fibers.iter().flatten() {
        for axis in 0..3 {
            lo[axis] = lo[axis].min(p[axis]);
            hi[axis] = hi[axis].max(p[axis]);
        }
    }
    if lo.iter().chain(hi.iter()).any(|v| !v.is_finite()) {
        return Bounds3 {
            x: [0.0, 1.0],
            y: [0.0, 1.0],
            z: [0.0, 1.0],
        };
    }
    Bounds3 {
        x: [lo[0], hi[0]],
        y: [lo[1], hi[1]],
        z: [lo[2], hi[2]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn table(row: &[f64]) -> ThresholdTable {
        let row: Vec<Option<f64>> = row.iter().copied().map(Some).collect();
        ThresholdTable {
            rows: vec![row; PULSE_WIDTHS_US.len()],
        }
    }

    #[test]
    fn threshold_must_be_strictly_below_limit() {
        let row = [Some(1.0), Some(3.0), Some(2.999)];
        assert_eq!(classify(&row, 3, 3.0), vec![true, false, true]);
    }

    #[test]
    fn missing_thresholds_are_not_activated() {
        assert_eq!(classify(&[Some(0.5)], 3, 3.0), vec![true, false, false]);
        assert_eq!(classify(&[], 2, 3.0), vec![false, false]);
    }

    #[test]
    fn null_threshold_never_activates() {
        let row = [Some(1.0), None, Some(0.1)];
        assert_eq!(classify(&row, 3, f64::MAX), vec![true, false, true]);

        let t = ThresholdTable {
            rows: vec![row.to_vec(); PULSE_WIDTHS_US.len()],
        };
        let results = activate(3, &t, 3.0, &[0, 16]);
        assert!(results.iter().all(|r| r.activated_indices() == vec![0, 2]));
    }

    #[test]
    fn pulse_width_selection_is_range_checked() {
        assert_eq!(select_pulse_widths(None).unwrap().len(), 17);
        assert_eq!(select_pulse_widths(Some(16)).unwrap(), vec![16]);
        let err = select_pulse_widths(Some(17)).unwrap_err();
        assert_eq!(err.message(), "Pulse width index 17 out of range [0, 16].");
    }

    #[test]
    fn summary_lists_activated_indices_per_pulse_width() {
        let t = table(&[1.0, 5.0, 2.0]);
        let results = activate(4, &t, 3.0, &[0, 8]);
        let summary = summarize(&results, 4, 3.0, Conductivity::Isotropic);

        assert_eq!(summary.activated.len(), 2);
        assert_eq!(summary.activated[&60], vec![0, 2]);
        assert_eq!(summary.activated[&200], vec![0, 2]);
        assert_eq!(summary.pulse_widths.len(), 17);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["activated"]["60"], serde_json::json!([0, 2]));
        assert_eq!(json["conductivity"], "isotropic");
    }

    #[test]
    fn bounds_cover_every_point() {
        let fibers = vec![
            vec![Point3::new(1.0, -2.0, 3.0), Point3::new(4.0, 5.0, -6.0)],
            vec![Point3::new(0.5, 0.0, 10.0)],
        ];
        let b = bounds_from_fibers(&fibers);
        assert_eq!(b.x, [0.5, 4.0]);
        assert_eq!(b.y, [-2.0, 5.0]);
        assert_eq!(b.z, [-6.0, 10.0]);

        let empty = bounds_from_fibers(&[]);
        assert_eq!(empty.x, [0.0, 1.0]);
    }
}
