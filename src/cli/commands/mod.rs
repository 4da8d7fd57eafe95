//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the catalog and settings it needs
//! 2. Calls the engine
//! 3. Formats and displays output

mod completion;
mod generate;
mod inspect;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use generate::generate;
pub use inspect::inspect;

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::core::catalog::TypeCatalog;
use crate::core::config::Settings;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            catalog,
            root,
            count,
            seed,
            config,
            pretty,
        } => generate::generate(&catalog, &root, count, seed, config.as_deref(), pretty),
        Command::Inspect {
            catalog,
            root,
            max_depth,
        } => inspect::inspect(&catalog, &root, max_depth),
        Command::Completion { shell } => completion::completion(shell),
    }
}

fn load_catalog(path: &Path) -> Result<TypeCatalog> {
    TypeCatalog::load(path).with_context(|| format!("Failed to load catalog '{}'", path.display()))
}

/// Global settings, then `./fixtura.toml`, then `extra` if given.
fn load_settings(extra: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let settings = Settings::load(Some(&cwd)).context("Failed to load settings")?;
    match extra {
        Some(path) => settings
            .with_file(path)
            .with_context(|| format!("Failed to load settings '{}'", path.display())),
        None => Ok(settings),
    }
}
