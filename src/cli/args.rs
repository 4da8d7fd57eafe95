//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fixtura - randomized, structurally valid test fixtures
#[derive(Parser, Debug)]
#[command(name = "fixtura")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate values of a catalog type as JSON
    #[command(
        name = "generate",
        long_about = "Generate random values of a catalog type and print them as JSON.\n\n\
            With --count 1 (the default) a single object is printed; otherwise a \
            JSON array. Settings are loaded from the global settings file and \
            ./fixtura.toml, then from --config if given.",
        after_help = "\
WORKFLOW EXAMPLES:
    # One order
    fixtura generate --catalog shop.toml --type Order

    # Ten reproducible orders, pretty-printed
    fixtura generate --catalog shop.toml --type Order --count 10 --seed 42 --pretty"
    )]
    Generate {
        /// Catalog file describing the types
        #[arg(long)]
        catalog: PathBuf,

        /// Root type to generate
        #[arg(long = "type", value_name = "TYPE")]
        root: String,

        /// Number of values
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Extra settings file layered on top of the defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the node tree of a catalog type
    #[command(
        name = "inspect",
        long_about = "Print the node tree built for a catalog type, one line per \
            node, indented by depth. Cyclic references are marked [cyclic].",
        after_help = "\
WORKFLOW EXAMPLES:
    # Full tree
    fixtura inspect --catalog shop.toml --type Order

    # Two levels only
    fixtura inspect --catalog shop.toml --type Order --max-depth 2"
    )]
    Inspect {
        /// Catalog file describing the types
        #[arg(long)]
        catalog: PathBuf,

        /// Root type to inspect
        #[arg(long = "type", value_name = "TYPE")]
        root: String,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for fixtura.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    fixtura completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    fixtura completion zsh >> ~/.zshrc

    # Fish
    fixtura completion fish > ~/.config/fish/completions/fixtura.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
