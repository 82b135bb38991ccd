//! CLI command handlers.
//!
//! Every data command renders its result to a string; [`run_cli`] owns
//! the process-facing side (stdout, stderr, exit code).

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::ExitCode;

use crate::config::EngineConfig;
use crate::engine::rng::{RandomSource, SimRng, ThreadRandom};
use crate::error::ClimResult;
use crate::report::{export, export_comparison_csv, AnalysisReport, ExportFormat};
use crate::scenarios::comparison::ScenarioComparator;
use crate::scenarios::generator::ScenarioSelection;
use crate::series::{HistoricalInput, TimeSeriesPoint};

use super::output::{print_error, print_help, print_version};
use super::{Args, Command, Options};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
        command => match execute(&command, &args.options) {
            Ok(output) => {
                println!("{output}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                print_error(&e);
                ExitCode::from(1)
            }
        },
    }
}

/// Execute a data command and render its output.
///
/// `Help` and `Version` render their text as well, so every command can
/// be driven from tests.
///
/// # Errors
///
/// Returns any configuration, input or engine error.
pub fn execute(command: &Command, options: &Options) -> ClimResult<String> {
    let config = load_config(options)?;
    let mut rng = random_source(config.seed);
    tracing::debug!(?command, seed = ?config.seed, "executing command");

    match command {
        Command::Project => {
            let input: HistoricalInput = read_input(options.input.as_deref())?;
            let result = config
                .pipeline()
                .project_with(&input.to_historical(), rng.as_mut())?;
            export(&result, ExportFormat::Json)
        }
        Command::Scenarios { scenario } => {
            let input: HistoricalInput = read_input(options.input.as_deref())?;
            let set = config
                .scenario_generator()
                .generate_named(&input.temperature, scenario)?;
            export(&set, ExportFormat::Json)
        }
        Command::Sensitivity { value } => {
            let analyzer = config.sensitivity_analyzer();
            let outcome = match &options.input {
                Some(path) => {
                    let input: HistoricalInput = read_json(path)?;
                    analyzer.analyze(&input.economic, *value)
                }
                None => analyzer.analyze_points(&config.defaults.economic, *value),
            };
            export(outcome.result(), ExportFormat::Json)
        }
        Command::Compare { csv } => {
            let scenarios = match &options.input {
                Some(path) => read_json::<IndexMap<String, Vec<TimeSeriesPoint>>>(path)?,
                None => config
                    .scenario_generator()
                    .generate(&config.defaults.temperature, ScenarioSelection::All)
                    .into_named(),
            };
            let rows = ScenarioComparator.compare(&scenarios)?;
            if *csv {
                export_comparison_csv(&rows)
            } else {
                export(&rows, ExportFormat::Json)
            }
        }
        Command::Report { format } => {
            let input: HistoricalInput = read_input(options.input.as_deref())?;
            let report = AnalysisReport::build_from_input(&config, &input, rng.as_mut())?;
            export(&report, *format)
        }
        Command::Help => Ok(super::output::help_text()),
        Command::Version => Ok(super::output::version_text()),
    }
}

fn load_config(options: &Options) -> ClimResult<EngineConfig> {
    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Seeded PCG when a seed is configured, the thread-local generator
/// otherwise.
fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SimRng::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

/// Read JSON input, or the type's default when no file was given.
fn read_input<T>(path: Option<&Path>) -> ClimResult<T>
where
    T: DeserializeOwned + Default,
{
    path.map_or_else(|| Ok(T::default()), read_json)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ClimResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
