//! Input/output helpers.
//!
//! - tract geometry reader (`tract`)
//! - per-pulse-width threshold JSON reader (`thresholds`)
//! - per-fiber EC potential reader (`potentials`)
//! - summary/window exports (`export`)

pub mod export;
pub mod potentials;
pub mod thresholds;
pub mod tract;

pub use export::*;
pub use potentials::*;
pub use thresholds::*;
pub use tract::{parse_tracts, read_tract_file};
