//! Command-line parsing for the fiber analysis toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code. Most analysis defaults can also come from
//! `FDTI_*` environment variables (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CenteringStrategy, Conductivity, Plane, WindowKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fdti",
    version,
    about = "Site-of-initiation and activation analysis for DTI-derived nerve fibers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find the site of initiation of every fiber in a potentials file and cut windows around it.
    Analyze(AnalyzeArgs),
    /// Classify fibers as activated per pulse width and write `activation_summary.json`.
    Activation(ActivationArgs),
    /// Run the analysis on seeded synthetic fibers next to a point source.
    Demo(DemoArgs),
}

/// Site selection and window options shared by `analyze` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct AnalysisArgs {
    /// How to pick the site of initiation.
    #[arg(long, value_enum, env = "FDTI_STRATEGY", default_value_t = CenteringStrategy::Ssd)]
    pub strategy: CenteringStrategy,

    /// Window size used to decide whether a site is far enough from both fiber ends.
    #[arg(long, env = "FDTI_SITE_WINDOW", default_value_t = 11)]
    pub site_window: usize,

    /// Which values to extract around the site.
    #[arg(long, value_enum, env = "FDTI_KIND", default_value_t = WindowKind::Ssd)]
    pub kind: WindowKind,

    /// Number of values to extract around the site.
    #[arg(long = "values", env = "FDTI_VALUES", default_value_t = 11)]
    pub num_values: usize,

    /// Maximum number of fibers listed in the terminal table.
    #[arg(long, default_value_t = 25)]
    pub top: usize,

    /// Export per-fiber sites and windows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Plot the window of the first valid fiber.
    #[arg(long)]
    pub plot: bool,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// File with one fiber per line of whitespace-separated EC potentials.
    #[arg(value_name = "POTENTIALS")]
    pub potentials: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct ActivationArgs {
    /// Tract file: one fiber per line, `x y z` repeated.
    #[arg(value_name = "TRACT")]
    pub tract_file: PathBuf,

    /// Threshold JSON keyed by pulse width (ms) and fiber index.
    #[arg(value_name = "THRESHOLDS_JSON")]
    pub thresholds_json: PathBuf,

    /// Stimulation voltage limit; fibers with a lower threshold are activated.
    #[arg(value_name = "VOLTAGE_LIMIT")]
    pub voltage_limit: f64,

    /// Conductivity model (selects the lead position).
    #[arg(value_name = "CONDUCTIVITY", value_enum)]
    pub conductivity: Conductivity,

    /// Folder receiving `activation_summary.json`.
    #[arg(value_name = "OUT_FOLDER")]
    pub out_folder: PathBuf,

    /// Only process one pulse width (index into the pulse-width list).
    #[arg(long)]
    pub pulse_width_index: Option<usize>,

    /// Print a terminal projection per processed pulse width.
    #[arg(long)]
    pub plot: bool,

    /// Projection plane for `--plot`.
    #[arg(long, value_enum, default_value_t = Plane::Xy)]
    pub plane: Plane,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 30)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Number of synthetic fibers.
    #[arg(long, default_value_t = 8)]
    pub fibers: usize,

    /// Nodes of Ranvier per fiber.
    #[arg(long, default_value_t = 41)]
    pub nodes: usize,

    /// Random seed for fiber placement and noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Internodal spacing (mm).
    #[arg(long, default_value_t = 0.5)]
    pub spacing: f64,

    /// Electrode distance of the closest fiber (mm).
    #[arg(long, default_value_t = 1.0)]
    pub distance: f64,

    /// Source strength (mV * mm).
    #[arg(long, default_value_t = 100.0)]
    pub amplitude: f64,

    /// Standard deviation of additive noise (mV).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn activation_positionals_parse() {
        let cli = Cli::try_parse_from([
            "fdti",
            "activation",
            "tract.txt",
            "thr.json",
            "3.5",
            "isotropic",
            "out",
            "--pulse-width-index",
            "2",
        ])
        .unwrap();
        let Command::Activation(args) = cli.command else {
            panic!("expected activation");
        };
        assert_eq!(args.voltage_limit, 3.5);
        assert_eq!(args.conductivity, Conductivity::Isotropic);
        assert_eq!(args.pulse_width_index, Some(2));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let res = Cli::try_parse_from(["fdti", "analyze", "p.txt", "--strategy", "max"]);
        assert!(res.is_err());
    }
}
