//! CLI module for edusim.
//!
//! All CLI logic lives here rather than in `main.rs` so it can be tested. The
//! binary parses arguments, installs logging and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, ModelKind, ModelOptions};
pub use commands::{check_config, load_config, params, run_cli, run_model, snapshot};
pub use output::{param_rows, print_help, print_version, JsonLinesRenderer, ParamRow};
