//! CLI argument parsing.
//!
//! Hand-rolled so it can be driven from any iterator of strings in tests.

use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Enable debug logging.
    pub verbose: bool,
}

/// Which classroom model a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Simple pendulum.
    Pendulum,
    /// Predator-prey.
    Population,
    /// Reacting particles.
    Chemistry,
    /// Quadratic explorer.
    Quadratic,
}

impl ModelKind {
    /// Every model, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Pendulum,
        Self::Population,
        Self::Chemistry,
        Self::Quadratic,
    ];

    /// Command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pendulum => "pendulum",
            Self::Population => "population",
            Self::Chemistry => "chemistry",
            Self::Quadratic => "quadratic",
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendulum" | "physics" => Ok(Self::Pendulum),
            "population" | "biology" | "predator-prey" => Ok(Self::Population),
            "chemistry" | "reaction" => Ok(Self::Chemistry),
            "quadratic" | "math" => Ok(Self::Quadratic),
            other => Err(format!("Unknown model: {other}")),
        }
    }
}

/// Options shared by model commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelOptions {
    /// Optional lab configuration file.
    pub config_path: Option<PathBuf>,
    /// Seed override.
    pub seed_override: Option<u64>,
    /// Parameter assignments applied before running, in order.
    pub assignments: Vec<(String, f64)>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Drive a model headless and stream frames as JSON lines.
    Run {
        /// Target model.
        model: ModelKind,
        /// Shared options.
        options: ModelOptions,
        /// Simulated seconds to run.
        seconds: f64,
        /// Emit every n-th drawn frame.
        every: u64,
    },
    /// Print one frame as JSON.
    Snapshot {
        /// Target model.
        model: ModelKind,
        /// Shared options.
        options: ModelOptions,
    },
    /// Print the parameter table as JSON.
    Params {
        /// Target model.
        model: ModelKind,
    },
    /// Validate a lab configuration file.
    Check {
        /// Path to the YAML file.
        config_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
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
        let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
        if args.len() < 2 {
            return Self {
                command: Command::Help,
                verbose,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "snapshot" => Self::with_model(args, "snapshot", |model, rest| Command::Snapshot {
                model,
                options: Self::parse_options(rest),
            }),
            "params" => Self::with_model(args, "params", |model, _| Command::Params { model }),
            "check" => match args.get(2) {
                Some(path) => Command::Check {
                    config_path: PathBuf::from(path),
                },
                None => {
                    eprintln!("Error: 'check' command requires a config path");
                    Command::Help
                }
            },
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command, verbose }
    }

    fn with_model(
        args: &[String],
        name: &str,
        build: impl FnOnce(ModelKind, &[String]) -> Command,
    ) -> Command {
        let Some(raw) = args.get(2) else {
            eprintln!("Error: '{name}' command requires a model name");
            return Command::Help;
        };
        match raw.parse() {
            Ok(model) => build(model, &args[3..]),
            Err(e) => {
                eprintln!("Error: {e}");
                Command::Help
            }
        }
    }

    fn parse_run_command(args: &[String]) -> Command {
        Self::with_model(args, "run", |model, rest| {
            let mut seconds = 10.0;
            let mut every = 1;
            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--seconds" => {
                        if let Some(s) = rest.get(i + 1).and_then(|v| v.parse::<f64>().ok()) {
                            if s.is_finite() && s >= 0.0 {
                                seconds = s;
                            }
                        }
                        i += 2;
                    }
                    "--every" => {
                        if let Some(n) = rest.get(i + 1).and_then(|v| v.parse::<u64>().ok()) {
                            every = n.max(1);
                        }
                        i += 2;
                    }
                    _ => i += 1,
                }
            }
            Command::Run {
                model,
                options: Self::parse_options(rest),
                seconds,
                every,
            }
        })
    }

    /// Parse `--config`, `--seed` and `--set name=value` from the tail.
    fn parse_options(rest: &[String]) -> ModelOptions {
        let mut options = ModelOptions::default();
        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--config" => {
                    if let Some(path) = rest.get(i + 1) {
                        options.config_path = Some(PathBuf::from(path));
                    }
                    i += 2;
                }
                "--seed" => {
                    if let Some(seed) = rest.get(i + 1).and_then(|v| v.parse().ok()) {
                        options.seed_override = Some(seed);
                    }
                    i += 2;
                }
                "--set" => {
                    match rest.get(i + 1).and_then(|v| parse_assignment(v)) {
                        Some(assignment) => options.assignments.push(assignment),
                        None => eprintln!("Warning: ignoring malformed --set"),
                    }
                    i += 2;
                }
                _ => i += 1,
            }
        }
        options
    }
}

/// Parse `name=value`.
fn parse_assignment(s: &str) -> Option<(String, f64)> {
    let (name, value) = s.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().parse().ok()?))
}
