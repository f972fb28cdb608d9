//! Command-line interface for profile-diversity.
//!
//! Provides commands for scoring profile requests and running synthetic
//! alternative-team searches.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
