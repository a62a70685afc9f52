//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - reads fibers (or generates synthetic ones)
//! - runs site-of-initiation / activation analysis
//! - prints reports/plots
//! - writes optional exports

use std::fs::create_dir_all;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{ActivationArgs, AnalysisArgs, AnalyzeArgs, Command, DemoArgs};
use crate::domain::{ActivationConfig, AnalysisConfig, SynthConfig};
use crate::error::AppError;
use crate::plot::{AsciiProjection, Renderer, Scene};

pub mod pipeline;

/// Entry point for the `fdti` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry RUST_LOG and FDTI_* defaults; a missing file is fine.
    dotenvy::dotenv().ok();
    init_logging();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Activation(args) => handle_activation(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.analysis);
    let fibers = crate::io::read_potentials_file(&args.potentials)?;
    let run = pipeline::run_analysis(&fibers, &config)?;
    present_analysis(&run, &config, &args.analysis)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.analysis);
    let synth = crate::synth::generate_fibers(&synth_config_from_args(&args))?;
    let run = pipeline::run_analysis(&synth.potentials, &config)?;
    present_analysis(&run, &config, &args.analysis)?;

    let matched = run
        .reports
        .iter()
        .zip(&synth.nearest_node)
        .filter(|(r, nearest)| r.site.is_some_and(|s| s.index == **nearest))
        .count();
    println!(
        "Sites at the node nearest the source: {matched}/{}",
        run.reports.len()
    );
    Ok(())
}

fn present_analysis(
    run: &pipeline::AnalysisRun,
    config: &AnalysisConfig,
    args: &AnalysisArgs,
) -> Result<(), AppError> {
    println!("{}", crate::report::format_analysis_summary(&run.summary, config));
    println!("{}", crate::report::format_site_table(&run.reports, args.top));

    if args.plot {
        match run.reports.iter().find(|r| r.is_valid() && r.error.is_none()) {
            Some(r) => {
                let node = r.site.map_or(0, |s| s.index);
                println!("Fiber {} ({} around node {node}):", r.fiber, r.kind);
                println!("{}", crate::plot::render_window(&r.window, args.height));
            }
            None => println!("No fiber has a valid site to plot."),
        }
    }

    if let Some(path) = &args.export {
        crate::io::write_windows_csv(path, &run.reports)?;
        tracing::info!(path = %path.display(), "wrote window export");
    }
    Ok(())
}

fn handle_activation(args: ActivationArgs) -> Result<(), AppError> {
    let config = activation_config_from_args(&args);
    create_dir_all(&config.out_folder).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output folder '{}': {e}", config.out_folder.display()),
        )
    })?;

    let run = pipeline::run_activation(&config)?;
    println!(
        "{}",
        crate::report::format_activation_table(
            &run.results,
            run.tracts.len(),
            config.voltage_limit,
            config.conductivity
        )
    );

    if config.plot {
        let mut renderer =
            AsciiProjection::new(config.plane, config.plot_width, config.plot_height);
        for result in &run.results {
            let title = format!(
                "Pulse width: {} us (index {})",
                result.pulse_width_us, result.index
            );
            let scene = Scene {
                title: &title,
                fibers: &run.tracts,
                activated: &result.activated,
                electrode: run.electrode,
                bounds: run.bounds,
            };
            println!("{}", renderer.render(&scene)?);
        }
    }

    let path = config.out_folder.join(crate::io::SUMMARY_FILE);
    crate::io::write_activation_summary(&path, &run.summary)?;
    println!("Wrote activation summary to {}", path.display());
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalysisArgs) -> AnalysisConfig {
    AnalysisConfig {
        strategy: args.strategy,
        site_window: args.site_window,
        kind: args.kind,
        num_values: args.num_values,
    }
}

pub fn activation_config_from_args(args: &ActivationArgs) -> ActivationConfig {
    ActivationConfig {
        tract_path: args.tract_file.clone(),
        thresholds_path: args.thresholds_json.clone(),
        voltage_limit: args.voltage_limit,
        conductivity: args.conductivity,
        out_folder: args.out_folder.clone(),
        pulse_width_index: args.pulse_width_index,
        plot: args.plot,
        plane: args.plane,
        plot_width: args.width,
        plot_height: args.height,
    }
}

pub fn synth_config_from_args(args: &DemoArgs) -> SynthConfig {
    SynthConfig {
        fibers: args.fibers,
        nodes: args.nodes,
        seed: args.seed,
        spacing: args.spacing,
        distance: args.distance,
        amplitude: args.amplitude,
        noise: args.noise,
    }
}
