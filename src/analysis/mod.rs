//! Fiber analysis core.
//!
//! Responsibilities:
//!
//! - first/second spatial derivatives of EC potentials (`derivative`)
//! - site-of-initiation search and centered windows (`fiber`)
//! - parallel analysis over many fibers (`batch`)
//!
//! Nothing in here touches files, the terminal, or rendering.

pub mod batch;
pub mod derivative;
pub mod fiber;

pub use batch::*;
pub use derivative::{SpatialDerivative, compute_first_derivative, compute_second_derivative};
pub use fiber::*;
