//! `fiber-dti` library crate.
//!
//! Analysis of extracellular potentials along DTI-derived nerve fibers:
//! spatial derivatives, site of action-potential initiation, centered
//! windows, and per-pulse-width activation.
//!
//! The binary (`fdti`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the analysis core stays free of I/O and display concerns
//! - modules are reusable from other front-ends

pub mod activation;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod synth;
