//! Domain types used throughout the toolkit.
//!
//! This module defines:
//!
//! - selector enums (`CenteringStrategy`, `WindowKind`, `Conductivity`, `Plane`)
//! - geometry (`Tract`, `Bounds3`)
//! - run configuration (`AnalysisConfig`, `ActivationConfig`, `SynthConfig`)

pub mod types;

pub use types::*;
