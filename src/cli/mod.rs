//! CLI module for climecon.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, Options};
pub use commands::{execute, run_cli};
pub use output::{help_text, print_error, print_help, print_version, version_text};
