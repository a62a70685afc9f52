//! Visualization of activation results.
//!
//! Renderers consume a [`Scene`] built from plain data (fiber points,
//! activation flags, boxes), so the analysis core never depends on any
//! display backend.

pub mod ascii;

pub use ascii::*;

use crate::domain::{Bounds3, Tract};
use crate::error::AppError;

/// Everything needed to draw one pulse width's activation state.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub title: &'a str,
    pub fibers: &'a [Tract],
    /// One flag per entry of `fibers`.
    pub activated: &'a [bool],
    pub electrode: Bounds3,
    /// Bounds of the fiber data.
    pub bounds: Bounds3,
}

pub trait Renderer {
    type Output;

    fn render(&mut self, scene: &Scene<'_>) -> Result<Self::Output, AppError>;
}
