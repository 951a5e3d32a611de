//! CLI command handlers.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use super::args::{Args, Command, ModelKind, ModelOptions};
use super::output::{param_rows, print_help, print_version, write_json_line, JsonLinesRenderer};
use crate::config::LabConfig;
use crate::engine::{ManualScheduler, ModelRunner, SimTime};
use crate::error::SimResult;
use crate::scenarios::{
    ChemistryModel, Model, PendulumModel, PopulationModel, QuadraticModel, Simulation,
};

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let result = match args.command {
        Command::Run {
            model,
            options,
            seconds,
            every,
        } => run_model(model, &options, seconds, every, &mut std::io::stdout().lock()).map(|n| {
            tracing::info!(model = model.name(), frames = n, "run complete");
        }),
        Command::Snapshot { model, options } => {
            snapshot(model, &options, &mut std::io::stdout().lock())
        }
        Command::Params { model } => params(model, &mut std::io::stdout().lock()),
        Command::Check { config_path } => check_config(&config_path),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolve the configuration for a model command.
///
/// # Errors
///
/// Returns error if the configuration file cannot be loaded.
pub fn load_config(options: &ModelOptions) -> SimResult<LabConfig> {
    let mut config = match &options.config_path {
        Some(path) => LabConfig::load(path)?,
        None => LabConfig::default(),
    };
    if let Some(seed) = options.seed_override {
        config.seed = seed;
    }
    Ok(config)
}

fn apply_assignments<M: Model>(model: &mut M, options: &ModelOptions) -> SimResult<()> {
    for (name, value) in &options.assignments {
        let stored = model.set_parameter(name, *value)?;
        tracing::debug!(name = name.as_str(), requested = value, stored, "parameter");
    }
    Ok(())
}

/// Drive a model for `seconds` of host time, streaming frames as JSON lines.
/// Returns the number of frames written.
///
/// # Errors
///
/// Returns error for a bad configuration, a rejected parameter, or a host
/// without the scheduling capability the model needs.
pub fn run_model<W: Write>(
    kind: ModelKind,
    options: &ModelOptions,
    seconds: f64,
    every: u64,
    out: &mut W,
) -> SimResult<u64> {
    let config = load_config(options)?;
    let until = SimTime::from_secs(seconds);
    let frame_interval = config.display.frame_interval();

    match kind {
        ModelKind::Pendulum => {
            let mut model = PendulumModel::new(config.pendulum.clone());
            apply_assignments(&mut model, options)?;
            drive(model, frame_interval, None, until, every, out)
        }
        ModelKind::Population => {
            let mut model = PopulationModel::new(config.population.clone());
            apply_assignments(&mut model, options)?;
            drive(model, frame_interval, None, until, every, out)
        }
        ModelKind::Chemistry => {
            let chemistry = config.chemistry_config();
            let delay = chemistry.restart_delay();
            let mut model = ChemistryModel::new(chemistry);
            apply_assignments(&mut model, options)?;
            drive(model, frame_interval, delay, until, every, out)
        }
        ModelKind::Quadratic => {
            let mut model = QuadraticModel::new(config.quadratic.clone());
            apply_assignments(&mut model, options)?;
            write_json_line(out, &model.frame())?;
            Ok(1)
        }
    }
}

fn drive<M, W>(
    model: M,
    frame_interval: SimTime,
    restart_delay: Option<SimTime>,
    until: SimTime,
    every: u64,
    out: &mut W,
) -> SimResult<u64>
where
    M: Simulation,
    W: Write,
{
    let mut runner = ModelRunner::new(
        model,
        ManualScheduler::new(frame_interval),
        JsonLinesRenderer::new(&mut *out, every),
    )
    .with_restart_delay(restart_delay);
    runner.mount()?;
    runner.run_until(until)?;
    if let Some(anomaly) = runner.anomaly() {
        tracing::warn!(error = %anomaly, "run stopped early");
    }
    runner.unmount();
    Ok(runner.renderer().written())
}

/// Print the model's initial frame.
///
/// # Errors
///
/// Returns error for a bad configuration, a rejected parameter, or a failed
/// write.
pub fn snapshot<W: Write>(kind: ModelKind, options: &ModelOptions, out: &mut W) -> SimResult<()> {
    let config = load_config(options)?;
    match kind {
        ModelKind::Pendulum => emit(PendulumModel::new(config.pendulum), options, out),
        ModelKind::Population => emit(PopulationModel::new(config.population), options, out),
        ModelKind::Chemistry => {
            emit(ChemistryModel::new(config.chemistry_config()), options, out)
        }
        ModelKind::Quadratic => emit(QuadraticModel::new(config.quadratic), options, out),
    }
}

fn emit<M, W>(mut model: M, options: &ModelOptions, out: &mut W) -> SimResult<()>
where
    M: Model,
    M::Frame: Serialize,
    W: Write,
{
    apply_assignments(&mut model, options)?;
    write_json_line(out, &model.frame())
}

/// Print a model's parameter table.
///
/// # Errors
///
/// Returns error if the write fails.
pub fn params<W: Write>(kind: ModelKind, out: &mut W) -> SimResult<()> {
    let rows = match kind {
        ModelKind::Pendulum => param_rows(PendulumModel::default().parameters()),
        ModelKind::Population => param_rows(PopulationModel::default().parameters()),
        ModelKind::Chemistry => param_rows(ChemistryModel::default().parameters()),
        ModelKind::Quadratic => param_rows(QuadraticModel::default().parameters()),
    };
    write_json_line(out, &rows)
}

/// Validate a configuration file.
///
/// # Errors
///
/// Returns the load or validation error.
pub fn check_config(path: &Path) -> SimResult<()> {
    let config = LabConfig::load(path)?;
    println!(
        "{}: ok (schema {}, seed {})",
        path.display(),
        config.schema_version,
        config.seed
    );
    Ok(())
}
