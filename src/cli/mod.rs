//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Datastore Forge - Author and encode typed firmware datastore schemas.
///
/// Robot Mode: Use --robot or --json for machine-parseable output optimized for AI agents.
#[derive(Parser, Debug)]
#[command(name = "dsf", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "DSF_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json (optimized for AI agents)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (repeat for more detail: -v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Schema Authoring ===
    /// Validate a datastore document (parse + run every object constructor)
    Validate(ValidateArgs),

    /// Encode a datastore document as a CBOR wire image
    Encode(EncodeArgs),

    /// Decode a CBOR wire image and list the objects it contains
    Decode(DecodeArgs),

    /// Show the objects in a datastore document
    Show(ShowArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the datastore YAML document
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// Path to the datastore YAML document
    pub file: PathBuf,

    /// Output path for the CBOR image (defaults to the input with .cbor extension)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Path to a CBOR wire image
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Path to the datastore YAML document
    pub file: PathBuf,

    /// Show per-object detail instead of counts
    #[arg(long, short = 'l')]
    pub long: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
