//! inspect command - Print the node tree of a type

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{load_catalog, load_settings};
use crate::engine::Fixture;

/// Print the node tree built for `root`.
pub fn inspect(catalog: &Path, root: &str, max_depth: Option<usize>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let settings = load_settings(None)?;

    let mut fixture = Fixture::of(Arc::new(catalog), root).with_settings(settings);
    if let Some(depth) = max_depth {
        fixture = fixture.with_max_depth(depth);
    }
    let model = fixture
        .to_model()
        .with_context(|| format!("Failed to inspect '{root}'"))?;

    print!("{}", model.tree().render());
    Ok(())
}
