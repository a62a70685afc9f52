//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - parsed from CLI flags (`clap::ValueEnum`)
//! - used in-memory during fiber analysis
//! - exported to JSON/CSV

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Stimulation pulse widths (microseconds) that carry their own threshold table.
pub const PULSE_WIDTHS_US: [u32; 17] = [
    60, 75, 90, 105, 120, 135, 150, 175, 200, 225, 250, 275, 300, 350, 400, 450, 500,
];

/// Default number of nodes used both for site validity and for window extraction.
pub const DEFAULT_WINDOW: usize = 11;

/// Key used for a pulse width in threshold files: the width in milliseconds,
/// written as the shortest decimal (`60` -> `"0.06"`, `200` -> `"0.2"`).
pub fn pulse_width_key(pulse_width_us: u32) -> String {
    format!("{}", f64::from(pulse_width_us) / 1000.0)
}

/// One fiber's ordered 3-D points, as read from a tract file.
pub type Tract = Vec<Point3<f64>>;

/// How to pick the site of action-potential initiation along a fiber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CenteringStrategy {
    /// Maximum interior second spatial derivative (sharpest curvature).
    Ssd,
    /// Minimum raw EC potential.
    Ec,
}

impl CenteringStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            CenteringStrategy::Ssd => "ssd",
            CenteringStrategy::Ec => "ec",
        }
    }
}

impl FromStr for CenteringStrategy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssd" => Ok(CenteringStrategy::Ssd),
            "ec" => Ok(CenteringStrategy::Ec),
            _ => Err(AnalysisError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for CenteringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which sequence a window is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Raw EC potentials.
    Ec,
    /// First spatial derivative.
    Fsd,
    /// Second spatial derivative.
    Ssd,
    /// All-zero placeholder, used for fibers without a valid site.
    #[serde(rename = "err")]
    #[value(name = "err")]
    Zeros,
}

impl WindowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::Ec => "ec",
            WindowKind::Fsd => "fsd",
            WindowKind::Ssd => "ssd",
            WindowKind::Zeros => "err",
        }
    }
}

impl FromStr for WindowKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ec" => Ok(WindowKind::Ec),
            "fsd" => Ok(WindowKind::Fsd),
            "ssd" => Ok(WindowKind::Ssd),
            "err" => Ok(WindowKind::Zeros),
            _ => Err(AnalysisError::UnknownWindowKind(s.to_string())),
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Tissue conductivity model of the field simulation; selects the lead geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Conductivity {
    Anisotropic,
    Isotropic,
}

impl Conductivity {
    /// Bounds of the stimulating lead contact for this conductivity model.
    pub fn electrode_bounds(self) -> Bounds3 {
        match self {
            Conductivity::Anisotropic => Bounds3 {
                x: [167.0, 161.0],
                y: [223.0, 222.0],
                z: [143.0, 159.0],
            },
            Conductivity::Isotropic => Bounds3 {
                x: [0.0, 0.0],
                y: [0.0, 0.0],
                z: [0.0, 10.0],
            },
        }
    }
}

/// Projection plane for terminal renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// Axis indices (horizontal, vertical) of the plane.
    pub fn axes(self) -> (usize, usize) {
        match self {
            Plane::Xy => (0, 1),
            Plane::Xz => (0, 2),
            Plane::Yz => (1, 2),
        }
    }

    pub fn labels(self) -> (&'static str, &'static str) {
        match self {
            Plane::Xy => ("x", "y"),
            Plane::Xz => ("x", "z"),
            Plane::Yz => ("y", "z"),
        }
    }
}

/// Axis-aligned box, stored as `[min, max]` per axis.
///
/// Electrode boxes are kept exactly as configured, even when a pair is given
/// in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl Bounds3 {
    pub fn axis(&self, idx: usize) -> [f64; 2] {
        match idx {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Smallest box containing both `self` and `other`, with each pair sorted.
    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        let merge = |a: [f64; 2], b: [f64; 2]| {
            [
                a[0].min(a[1]).min(b[0]).min(b[1]),
                a[0].max(a[1]).max(b[0]).max(b[1]),
            ]
        };
        Bounds3 {
            x: merge(self.x, other.x),
            y: merge(self.y, other.y),
            z: merge(self.z, other.z),
        }
    }
}

/// Settings for per-fiber analysis (site selection + window extraction).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub strategy: CenteringStrategy,
    /// Window size used to judge whether a site is far enough from the fiber ends.
    pub site_window: usize,
    pub kind: WindowKind,
    /// Number of values requested around the site.
    pub num_values: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: CenteringStrategy::Ssd,
            site_window: DEFAULT_WINDOW,
            kind: WindowKind::Ssd,
            num_values: DEFAULT_WINDOW,
        }
    }
}

/// Settings for an activation run over a tract + threshold table.
#[derive(Debug, Clone)]
pub struct ActivationConfig {
    pub tract_path: PathBuf,
    pub thresholds_path: PathBuf,
    pub voltage_limit: f64,
    pub conductivity: Conductivity,
    pub out_folder: PathBuf,
    /// Restrict the run to one pulse width (index into `PULSE_WIDTHS_US`).
    pub pulse_width_index: Option<usize>,
    pub plot: bool,
    pub plane: Plane,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Settings for synthetic fiber generation.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub fibers: usize,
    pub nodes: usize,
    pub seed: u64,
    /// Internodal spacing (mm).
    pub spacing: f64,
    /// Perpendicular electrode-to-fiber distance (mm) of the closest fiber.
    pub distance: f64,
    /// Source strength (mV * mm).
    pub amplitude: f64,
    /// Standard deviation of additive noise (mV).
    pub noise: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            fibers: 8,
            nodes: 41,
            seed: 42,
            spacing: 0.5,
            distance: 1.0,
            amplitude: 100.0,
            noise: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_width_keys_use_shortest_decimal() {
        assert_eq!(pulse_width_key(60), "0.06");
        assert_eq!(pulse_width_key(75), "0.075");
        assert_eq!(pulse_width_key(200), "0.2");
        assert_eq!(pulse_width_key(500), "0.5");
    }

    #[test]
    fn strategy_and_kind_parse_case_insensitively() {
        assert_eq!("SSD".parse::<CenteringStrategy>().unwrap(), CenteringStrategy::Ssd);
        assert_eq!(" ec ".parse::<CenteringStrategy>().unwrap(), CenteringStrategy::Ec);
        assert_eq!("Fsd".parse::<WindowKind>().unwrap(), WindowKind::Fsd);
        assert_eq!("err".parse::<WindowKind>().unwrap(), WindowKind::Zeros);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "max".parse::<CenteringStrategy>(),
            Err(AnalysisError::UnknownStrategy("max".to_string()))
        );
        assert_eq!(
            "tsd".parse::<WindowKind>(),
            Err(AnalysisError::UnknownWindowKind("tsd".to_string()))
        );
    }

    #[test]
    fn union_sorts_reversed_pairs() {
        let lead = Conductivity::Anisotropic.electrode_bounds();
        let data = Bounds3 { x: [0.0, 1.0], y: [0.0, 1.0], z: [0.0, 1.0] };
        let all = data.union(&lead);
        assert_eq!(all.x, [0.0, 167.0]);
        assert_eq!(all.y, [0.0, 223.0]);
        assert_eq!(all.z, [0.0, 159.0]);
    }
}
