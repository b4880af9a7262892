//! CLI argument definitions.
//!
//! All Clap derive structs for `farthest` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::game::Locale;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Timed distance-race minigame session driver.
#[derive(Parser, Debug)]
#[command(name = "farthest", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "FARTHEST_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "FARTHEST_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive a session against a host adapter speaking NDJSON over stdio.
    Run(RunArgs),

    /// Play one round against simulated players and print the transcript.
    Simulate(SimulateArgs),

    /// Validate configuration files.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "FARTHEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dimension for commands and respawn points (overrides config).
    #[arg(long)]
    pub dimension: Option<String>,

    /// Message catalog (overrides config).
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Length of one game second, e.g. `1s` or `250ms` (overrides config).
    #[arg(long)]
    pub tick: Option<String>,

    /// Write JSONL session events to this file.
    #[arg(long, env = "FARTHEST_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Expose Prometheus metrics on this port.
    #[arg(long, env = "FARTHEST_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "FARTHEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of simulated players.
    #[arg(short, long, default_value_t = 4)]
    pub players: usize,

    /// Length of one game second.
    #[arg(long, default_value = "10ms")]
    pub tick: String,

    /// Seed for reproducible movement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Farthest distance a player walks per second.
    #[arg(long, default_value_t = 4.0)]
    pub max_step: f64,

    /// Message catalog (overrides config).
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Transcript format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Write JSONL session events to this file.
    #[arg(long)]
    pub events_file: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
