//! CLI argument parsing.
//!
//! Hand-rolled so that parsing stays a pure function of an argument list
//! and can be tested without a process.

use std::path::PathBuf;

use crate::report::ExportFormat;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Flags shared by every command.
    pub options: Options,
}

/// Flags accepted by every data command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// JSON input file.
    pub input: Option<PathBuf>,
    /// YAML engine configuration.
    pub config: Option<PathBuf>,
    /// Seed override.
    pub seed: Option<u64>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Extend the temperature trend and compute risk metrics
    Project,
    /// Generate scenario trajectories
    Scenarios {
        /// `all` or a single scenario name.
        scenario: String,
    },
    /// Compute sensitivity coefficients
    Sensitivity {
        /// Slider value in `[0, 100]`.
        value: f64,
    },
    /// Compare scenarios year by year
    Compare {
        /// Emit CSV instead of JSON.
        csv: bool,
    },
    /// Produce the full analysis bundle
    Report {
        /// Output format.
        format: ExportFormat,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let help = Self {
            command: Command::Help,
            options: Options::default(),
        };

        if args.len() < 2 {
            return help;
        }

        let Some(flags) = Flags::parse(&args[2..]) else {
            return help;
        };

        let command = match args[1].as_str() {
            "project" => Command::Project,
            "scenarios" => Command::Scenarios {
                scenario: flags.scenario.unwrap_or_else(|| "all".to_string()),
            },
            "sensitivity" => match flags.value {
                Some(value) => Command::Sensitivity { value },
                None => {
                    eprintln!("Error: 'sensitivity' command requires --value <N>");
                    Command::Help
                }
            },
            "compare" => Command::Compare { csv: flags.csv },
            "report" => Command::Report {
                format: flags.format.unwrap_or_default(),
            },
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self {
            command,
            options: flags.options,
        }
    }
}

/// Everything after the command word.
#[derive(Debug, Default)]
struct Flags {
    options: Options,
    scenario: Option<String>,
    value: Option<f64>,
    format: Option<ExportFormat>,
    csv: bool,
}

impl Flags {
    /// Returns `None` (after reporting) on a malformed flag.
    fn parse(args: &[String]) -> Option<Self> {
        let mut flags = Self::default();

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            if flag == "--csv" {
                flags.csv = true;
                i += 1;
                continue;
            }

            let Some(value) = args.get(i + 1) else {
                eprintln!("Error: '{flag}' requires a value");
                return None;
            };

            match flag {
                "-i" | "--input" => flags.options.input = Some(PathBuf::from(value)),
                "-c" | "--config" => flags.options.config = Some(PathBuf::from(value)),
                "--seed" => flags.options.seed = Some(parse_value(flag, value)?),
                "--scenario" => flags.scenario = Some(value.clone()),
                "--value" => flags.value = Some(parse_value(flag, value)?),
                "--format" => flags.format = Some(parse_value(flag, value)?),
                unknown => {
                    eprintln!("Error: unknown option '{unknown}'");
                    return None;
                }
            }
            i += 2;
        }

        Some(flags)
    }
}

fn parse_value<T>(flag: &str, raw: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            eprintln!("Error: invalid value '{raw}' for '{flag}': {e}");
            None
        }
    }
}
