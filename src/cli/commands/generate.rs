//! generate command - Print generated values as JSON

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::{load_catalog, load_settings};
use crate::engine::Fixture;

/// Generate `count` values of `root` and print them.
pub fn generate(
    catalog: &Path,
    root: &str,
    count: usize,
    seed: Option<u64>,
    config: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let settings = load_settings(config)?;

    let mut fixture = Fixture::of(Arc::new(catalog), root).with_settings(settings);
    if let Some(seed) = seed {
        fixture = fixture.with_seed(seed);
    }
    let values = fixture
        .stream(count)
        .with_context(|| format!("Failed to generate '{root}'"))?;

    let output = match values.as_slice() {
        [single] => to_json(single, pretty)?,
        _ => to_json(&values, pretty)?,
    };
    println!("{output}");
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
