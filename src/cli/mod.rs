//! CLI module for the Oraclust provisioning tool.
//!
//! This module provides the command-line interface for managing
//! Oracle RAC cluster registrations.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
