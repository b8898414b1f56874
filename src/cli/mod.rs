//! CLI module for the box test generator
//!
//! ## Commands
//!
//! - `generate` - Compile box fixtures and write the generated test class
//! - `list` - Show which fixtures would be generated, without compiling
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::errors::GenerateError;
use crate::version::BOXGEN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl From<GenerateError> for CliError {
    fn from(err: GenerateError) -> Self {
        // Render through miette so codes, help text and the source chain are shown.
        let report = miette::Report::new(err);
        CliError::failure(format!("{:?}", report))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generates Android box tests from compiler codegen fixtures
#[derive(Parser, Debug)]
#[command(name = "boxgen")]
#[command(version = BOXGEN_VERSION)]
#[command(about = "Generates Android box tests from compiler codegen fixtures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile box fixtures and write the generated test class
    Generate {
        /// Generator config (TOML); defaults apply when omitted
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the fixtures a run would generate tests for
    List {
        /// Generator config (TOML); defaults apply when omitted
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Generate { config }) => commands::generate(config.as_deref()),
        Some(Command::List { config }) => commands::list(config.as_deref()),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            let _ = cmd.print_help();
            Err(CliError::new("", ExitCode::FAILURE))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
