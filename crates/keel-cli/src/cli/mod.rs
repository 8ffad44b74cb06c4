//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use keel_core::domain::Version;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "keel",
    bin_name = "keel",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Lint Xcode project dependency graphs",
    long_about = "Keel checks a resolved project graph for invalid target links, \
                  missing files, inconsistent bundle identifiers and toolchain \
                  mismatches before a project is generated.",
    after_help = "EXAMPLES:\n\
        \x20 keel lint graph.json\n\
        \x20 keel lint graph.json --manifests --fail-on-warnings\n\
        \x20 keel lint graph.json --xcode-version 16.2 --format json\n\
        \x20 keel completions bash > /usr/share/bash-completion/completions/keel",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lint a graph snapshot.
    #[command(
        visible_alias = "l",
        about = "Lint a dependency graph",
        after_help = "EXAMPLES:\n\
            \x20 keel lint graph.json\n\
            \x20 keel lint graph.json --xcode-version 15.4\n\
            \x20 keel lint graph.json --manifests --format json"
    )]
    Lint(LintArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 keel completions bash > ~/.local/share/bash-completion/completions/keel\n\
            \x20 keel completions zsh  > ~/.zfunc/_keel\n\
            \x20 keel completions fish > ~/.config/fish/completions/keel.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Keel configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 keel config path\n\
            \x20 keel config show"
    )]
    Config(ConfigCommands),
}

// ── lint ──────────────────────────────────────────────────────────────────────

/// Arguments for `keel lint`.
#[derive(Debug, Args)]
pub struct LintArgs {
    /// JSON graph snapshot produced by graph resolution.
    #[arg(value_name = "GRAPH", help = "Path to the graph JSON file")]
    pub graph: PathBuf,

    /// Skip `xcodebuild` and assume this toolchain version.
    #[arg(
        long = "xcode-version",
        value_name = "VERSION",
        value_parser = parse_version,
        help = "Assume this Xcode version instead of querying xcodebuild"
    )]
    pub xcode_version: Option<Version>,

    /// Also lint the manifests of the workspace and every project.
    #[arg(long = "manifests", help = "Also lint workspace and project manifests")]
    pub manifests: bool,

    /// Treat warnings like errors for the exit status.
    #[arg(long = "fail-on-warnings", help = "Exit non-zero when warnings are found")]
    pub fail_on_warnings: bool,
}

fn parse_version(raw: &str) -> Result<Version, String> {
    raw.parse().map_err(|e| format!("{e}"))
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `keel completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `keel config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the path to the default configuration file.
    Path,
    /// Print the resolved configuration as TOML.
    Show,
}

// ── tests ─────────────────────────────────────────────────────────────────────
