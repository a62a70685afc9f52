//! Per-fiber analysis: derivatives, site of initiation, and centered windows.
//!
//! A `FiberAnalyzer` owns one fiber's EC potentials (one per node of Ranvier)
//! and the derivatives computed from them at construction. Site selection is
//! stateful: the last site found is kept so that callers can check its
//! validity before trusting any window cut around it.

use serde::Serialize;

use crate::analysis::derivative::{
    SpatialDerivative, argmin, compute_first_derivative, compute_second_derivative,
};
use crate::domain::{CenteringStrategy, DEFAULT_WINDOW, WindowKind};
use crate::error::AnalysisError;

/// Chosen site of action-potential initiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitiationSite {
    pub index: usize,
    /// `true` when a full symmetric window of the requested size fits around `index`.
    pub is_valid: bool,
    pub strategy: CenteringStrategy,
}

#[derive(Debug, Clone)]
pub struct FiberAnalyzer {
    ecs: Vec<f64>,
    fsds: SpatialDerivative,
    ssds: SpatialDerivative,
    site: Option<InitiationSite>,
}

impl FiberAnalyzer {
    pub fn new(ecs: Vec<f64>) -> Self {
        let fsds = compute_first_derivative(&ecs);
        let ssds = compute_second_derivative(&ecs);
        Self {
            ecs,
            fsds,
            ssds,
            site: None,
        }
    }

    pub fn ecs(&self) -> &[f64] {
        &self.ecs
    }

    pub fn fsds(&self) -> &SpatialDerivative {
        &self.fsds
    }

    pub fn ssds(&self) -> &SpatialDerivative {
        &self.ssds
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.ecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ecs.is_empty()
    }

    /// Site found by the last call to [`FiberAnalyzer::find_initiation_site`].
    pub fn initiation_site(&self) -> Option<InitiationSite> {
        self.site
    }

    /// Same as [`FiberAnalyzer::find_initiation_site`] with an 11-node window.
    pub fn find_initiation_site_default(
        &mut self,
        strategy: CenteringStrategy,
    ) -> Result<InitiationSite, AnalysisError> {
        self.find_initiation_site(strategy, DEFAULT_WINDOW)
    }

    /// Locate the site of initiation and record it.
    ///
    /// - `Ssd`: node with the largest interior second derivative.
    /// - `Ec`: node with the most negative potential.
    ///
    /// The site is valid when at least `window_size / 2 + 1` nodes separate it
    /// from each end of the fiber.
    pub fn find_initiation_site(
        &mut self,
        strategy: CenteringStrategy,
        window_size: usize,
    ) -> Result<InitiationSite, AnalysisError> {
        let index = match strategy {
            CenteringStrategy::Ssd => {
                if self.ecs.len() < 3 {
                    return Err(AnalysisError::TooShort {
                        len: self.ecs.len(),
                        required: 3,
                    });
                }
                self.ssds
                    .argmax_interior()
                    .ok_or(AnalysisError::NoFiniteValues)?
            }
            CenteringStrategy::Ec => {
                if self.ecs.is_empty() {
                    return Err(AnalysisError::Empty);
                }
                argmin(&self.ecs).ok_or(AnalysisError::NoFiniteValues)?
            }
        };

        let bound = window_size / 2 + 1;
        let to_end = self.ecs.len() - 1 - index;
        let site = InitiationSite {
            index,
            is_valid: index >= bound && to_end >= bound,
            strategy,
        };
        self.site = Some(site);
        Ok(site)
    }

    /// Cut `num_values` values centered on `center` from the selected source.
    ///
    /// The range is `[center - num_values/2, center + num_values/2 + 1)`, so an
    /// even request yields one extra value. Undefined derivative ends inside
    /// the range read as `0.0`. `Zeros` ignores `center` entirely.
    pub fn extract_window(
        &self,
        kind: WindowKind,
        num_values: usize,
        center: usize,
    ) -> Result<Vec<f64>, AnalysisError> {
        if num_values == 0 {
            return Ok(Vec::new());
        }
        if kind == WindowKind::Zeros {
            return Ok(vec![0.0; num_values]);
        }

        let half = num_values / 2;
        let upper = center.saturating_add(half).saturating_add(1);
        if center < half || upper > self.ecs.len() {
            return Err(AnalysisError::WindowOutOfBounds {
                lower: center as isize - half as isize,
                upper,
                len: self.ecs.len(),
            });
        }
        let range = (center - half)..upper;

        let window = match kind {
            WindowKind::Ec => self.ecs[range].to_vec(),
            WindowKind::Fsd => range.map(|i| self.fsds.get(i).unwrap_or(0.0)).collect(),
            WindowKind::Ssd => range.map(|i| self.ssds.get(i).unwrap_or(0.0)).collect(),
            WindowKind::Zeros => vec![0.0; num_values],
        };
        Ok(window)
    }

    /// Window around the recorded site, or the zero placeholder when the site
    /// is missing or too close to a fiber end.
    pub fn window_at_site(
        &self,
        kind: WindowKind,
        num_values: usize,
    ) -> Result<Vec<f64>, AnalysisError> {
        match self.site {
            Some(site) if site.is_valid => self.extract_window(kind, num_values, site.index),
            _ => self.extract_window(WindowKind::Zeros, num_values, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    /// V-shaped well with its minimum (and curvature peak) at `at`.
    fn well(n: usize, at: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 - at as f64).abs()).collect()
    }

    #[test]
    fn ec_strategy_picks_global_minimum() {
        let mut fiber = FiberAnalyzer::new(vec![5.0, 3.0, 1.0, 4.0, 8.0]);
        let site = fiber.find_initiation_site_default(CenteringStrategy::Ec).unwrap();
        assert_eq!(site.index, 2);
        assert!(!site.is_valid);
        assert_eq!(fiber.initiation_site(), Some(site));
    }

    #[test]
    fn ssd_strategy_never_picks_an_end() {
        // Steep ends put the largest curvature right next to a boundary.
        let mut fiber = FiberAnalyzer::new(vec![100.0, 0.0, 1.0, 0.0, 2.0, 0.0, -100.0]);
        let site = fiber.find_initiation_site(CenteringStrategy::Ssd, 3).unwrap();
        assert!(site.index > 0 && site.index < 6);
        assert_eq!(site.index, 1);
    }

    #[test]
    fn ssd_strategy_finds_curvature_peak() {
        let mut fiber = FiberAnalyzer::new(well(30, 17));
        let site = fiber.find_initiation_site(CenteringStrategy::Ssd, 11).unwrap();
        assert_eq!(site.index, 17);
        assert!(site.is_valid);
    }

    #[test]
    fn validity_boundary_is_exact() {
        // window 11 -> half 5 -> need 6 nodes of clearance on each side.
        let n = 20;
        let cases = [(5, false), (6, true), (13, true), (14, false)];
        for (at, expected) in cases {
            let mut fiber = FiberAnalyzer::new(well(n, at));
            let site = fiber.find_initiation_site(CenteringStrategy::Ec, 11).unwrap();
            assert_eq!(site.index, at);
            assert_eq!(site.is_valid, expected, "site at {at}");
        }
    }

    #[test]
    fn short_fibers_are_reported() {
        let mut fiber = FiberAnalyzer::new(vec![1.0, 2.0]);
        assert_eq!(
            fiber.find_initiation_site_default(CenteringStrategy::Ssd),
            Err(AnalysisError::TooShort { len: 2, required: 3 })
        );
        let mut empty = FiberAnalyzer::new(Vec::new());
        assert_eq!(
            empty.find_initiation_site_default(CenteringStrategy::Ec),
            Err(AnalysisError::Empty)
        );
        let mut nan = FiberAnalyzer::new(vec![f64::NAN; 4]);
        assert_eq!(
            nan.find_initiation_site_default(CenteringStrategy::Ec),
            Err(AnalysisError::NoFiniteValues)
        );
    }

    #[test]
    fn zero_length_window_is_empty_for_every_kind() {
        let fiber = FiberAnalyzer::new(linear(5));
        for kind in [WindowKind::Ec, WindowKind::Fsd, WindowKind::Ssd, WindowKind::Zeros] {
            assert!(fiber.extract_window(kind, 0, 0).unwrap().is_empty());
            assert!(fiber.extract_window(kind, 0, 1000).unwrap().is_empty());
        }
    }

    #[test]
    fn zeros_window_ignores_center() {
        let fiber = FiberAnalyzer::new(linear(3));
        assert_eq!(fiber.extract_window(WindowKind::Zeros, 4, 999).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn ec_window_is_centered() {
        let fiber = FiberAnalyzer::new(linear(10));
        assert_eq!(
            fiber.extract_window(WindowKind::Ec, 5, 4).unwrap(),
            vec![2.0, 3.0, 4.0, 5.0, 6.0]
        );
        // Even requests keep the original half-width on both sides.
        assert_eq!(
            fiber.extract_window(WindowKind::Ec, 4, 4).unwrap(),
            vec![2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn derivative_windows_replace_ends_with_zero() {
        let fiber = FiberAnalyzer::new(vec![1.0, 2.0, 4.0, 7.0, 11.0]);
        assert_eq!(
            fiber.extract_window(WindowKind::Fsd, 3, 1).unwrap(),
            vec![0.0, 1.5, 2.5]
        );
        assert_eq!(
            fiber.extract_window(WindowKind::Ssd, 3, 3).unwrap(),
            vec![1.0, 1.0, 0.0]
        );
        assert_eq!(
            fiber.extract_window(WindowKind::Ssd, 5, 2).unwrap(),
            vec![0.0, 1.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn out_of_range_windows_fail() {
        let fiber = FiberAnalyzer::new(linear(5));
        assert_eq!(
            fiber.extract_window(WindowKind::Ec, 5, 1),
            Err(AnalysisError::WindowOutOfBounds { lower: -1, upper: 4, len: 5 })
        );
        assert_eq!(
            fiber.extract_window(WindowKind::Fsd, 3, 4),
            Err(AnalysisError::WindowOutOfBounds { lower: 3, upper: 6, len: 5 })
        );
    }

    #[test]
    fn window_at_site_falls_back_to_zeros() {
        let mut fiber = FiberAnalyzer::new(vec![5.0, 3.0, 1.0, 4.0, 8.0]);
        assert_eq!(fiber.window_at_site(WindowKind::Ec, 3).unwrap(), vec![0.0; 3]);

        fiber.find_initiation_site(CenteringStrategy::Ec, 11).unwrap();
        assert_eq!(fiber.window_at_site(WindowKind::Ec, 3).unwrap(), vec![0.0; 3]);

        fiber.find_initiation_site(CenteringStrategy::Ec, 1).unwrap();
        assert_eq!(fiber.window_at_site(WindowKind::Ec, 3).unwrap(), vec![3.0, 1.0, 4.0]);
    }
}
