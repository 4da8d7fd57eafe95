//! core::config
//!
//! Settings schema and loading.
//!
//! # Overview
//!
//! Settings control value ranges, null probability, recursion depth,
//! assignment strategy and strictness. They are assembled from layers.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global settings file
//! 3. Project settings file
//! 4. Programmatic overrides ([`Settings::with_layer`], `Fixture::with_seed`, CLI flags)
//!
//! # Global Settings Locations
//!
//! Searched in order, first match wins:
//! 1. `$FIXTURA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/fixtura/config.toml`
//! 3. `~/.fixtura/config.toml`
//!
//! # Project Settings Location
//!
//! `fixtura.toml` in the project directory.
//!
//! # Example
//!
//! ```no_run
//! use fixtura::core::config::Settings;
//! use std::path::Path;
//!
//! let settings = Settings::load(Some(Path::new("."))).unwrap();
//! println!("max depth: {}", settings.max_depth());
//! println!("strings: {:?}", settings.string_length());
//! ```

pub mod schema;

pub use schema::{
    AssignmentType, CollectionSettings, FloatSettings, IntegerSettings, Mode,
    OnSetMethodNotFound, SettingsFile, StringSettings,
};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generator::hints::AfterGenerate;

/// Errors from settings operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

pub const DEFAULT_MAX_DEPTH: usize = 8;
pub const DEFAULT_NULL_PROBABILITY: f64 = 1.0 / 6.0;
pub const DEFAULT_INT_RANGE: (i64, i64) = (1, 10_000);
pub const DEFAULT_FLOAT_RANGE: (f64, f64) = (1.0, 10_000.0);
pub const DEFAULT_STRING_LENGTH: (usize, usize) = (3, 10);
pub const DEFAULT_COLLECTION_SIZE: (usize, usize) = (2, 6);

/// Merged settings from all layers.
///
/// Accessors apply precedence automatically: the last layer that sets a
/// value wins, and defaults fill the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    layers: Vec<SettingsFile>,
    sources: Vec<PathBuf>,
}

impl Settings {
    /// Settings with every value at its default.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Load settings from the default locations.
    ///
    /// If `project_dir` is provided, `fixtura.toml` in that directory is
    /// layered on top of the global file.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read, parsed
    /// or validated. Missing files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = Self::defaults();

        if let Some(path) = Self::find_global() {
            settings = settings.with_file(&path)?;
        }

        if let Some(dir) = project_dir {
            let path = Self::project_path(dir);
            if path.exists() {
                settings = settings.with_file(&path)?;
            }
        }

        Ok(settings)
    }

    /// Layer the contents of a settings file on top of these settings.
    pub fn with_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let layer = Self::read_file(path)?;
        self = self.with_layer(layer)?;
        self.sources.push(path.to_path_buf());
        Ok(self)
    }

    /// Layer programmatic overrides on top of these settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the layer is invalid on its own
    /// or produces inverted ranges once merged.
    pub fn with_layer(mut self, layer: SettingsFile) -> Result<Self, ConfigError> {
        layer.validate()?;
        self.layers.push(layer);
        self.validate_merged()?;
        Ok(self)
    }

    /// Files that contributed to these settings, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FIXTURA_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("fixtura/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".fixtura/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Path of the project settings file inside `dir`.
    pub fn project_path(dir: &Path) -> PathBuf {
        dir.join("fixtura.toml")
    }

    fn read_file(path: &Path) -> Result<SettingsFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn validate_merged(&self) -> Result<(), ConfigError> {
        let (min, max) = self.int_range();
        schema::check_order("integers", Some(min), Some(max))?;
        let (min, max) = self.float_range();
        schema::check_order("floats", Some(min), Some(max))?;
        let (min, max) = self.string_length();
        schema::check_order("strings", Some(min), Some(max))?;
        let (min, max) = self.collection_size();
        schema::check_order("collections", Some(min), Some(max))?;
        Ok(())
    }

    /// Last value set by any layer.
    fn pick<T>(&self, get: impl Fn(&SettingsFile) -> Option<T>) -> Option<T> {
        self.layers.iter().rev().find_map(get)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Defaults to [`Mode::Strict`].
    pub fn mode(&self) -> Mode {
        self.pick(|l| l.mode).unwrap_or_default()
    }

    /// Fixed seed, if any. Without one every session draws a fresh seed.
    pub fn seed(&self) -> Option<u64> {
        self.pick(|l| l.seed)
    }

    /// Defaults to [`DEFAULT_MAX_DEPTH`].
    pub fn max_depth(&self) -> usize {
        self.pick(|l| l.max_depth).unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Defaults to [`DEFAULT_NULL_PROBABILITY`].
    pub fn null_probability(&self) -> f64 {
        self.pick(|l| l.null_probability)
            .unwrap_or(DEFAULT_NULL_PROBABILITY)
    }

    /// Defaults to [`AfterGenerate::PopulateNulls`].
    pub fn after_generate(&self) -> AfterGenerate {
        self.pick(|l| l.after_generate)
            .unwrap_or(AfterGenerate::PopulateNulls)
    }

    /// Defaults to [`AssignmentType::Field`].
    pub fn assignment(&self) -> AssignmentType {
        self.pick(|l| l.assignment).unwrap_or_default()
    }

    /// Defaults to [`OnSetMethodNotFound::AssignField`].
    pub fn on_set_method_not_found(&self) -> OnSetMethodNotFound {
        self.pick(|l| l.on_set_method_not_found).unwrap_or_default()
    }

    /// Inclusive integer bounds.
    pub fn int_range(&self) -> (i64, i64) {
        (
            self.pick(|l| l.integers.as_ref()?.min)
                .unwrap_or(DEFAULT_INT_RANGE.0),
            self.pick(|l| l.integers.as_ref()?.max)
                .unwrap_or(DEFAULT_INT_RANGE.1),
        )
    }

    /// Inclusive float bounds.
    pub fn float_range(&self) -> (f64, f64) {
        (
            self.pick(|l| l.floats.as_ref()?.min)
                .unwrap_or(DEFAULT_FLOAT_RANGE.0),
            self.pick(|l| l.floats.as_ref()?.max)
                .unwrap_or(DEFAULT_FLOAT_RANGE.1),
        )
    }

    /// Inclusive string length bounds.
    pub fn string_length(&self) -> (usize, usize) {
        (
            self.pick(|l| l.strings.as_ref()?.min_length)
                .unwrap_or(DEFAULT_STRING_LENGTH.0),
            self.pick(|l| l.strings.as_ref()?.max_length)
                .unwrap_or(DEFAULT_STRING_LENGTH.1),
        )
    }

    /// Inclusive list size bounds.
    pub fn collection_size(&self) -> (usize, usize) {
        (
            self.pick(|l| l.collections.as_ref()?.min_size)
                .unwrap_or(DEFAULT_COLLECTION_SIZE.0),
            self.pick(|l| l.collections.as_ref()?.max_size)
                .unwrap_or(DEFAULT_COLLECTION_SIZE.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    mod defaults {
        use super::*;

        #[test]
        fn all_defaults() {
            let s = Settings::defaults();
            assert_eq!(s.mode(), Mode::Strict);
            assert_eq!(s.seed(), None);
            assert_eq!(s.max_depth(), DEFAULT_MAX_DEPTH);
            assert_eq!(s.assignment(), AssignmentType::Field);
            assert_eq!(s.after_generate(), AfterGenerate::PopulateNulls);
            assert_eq!(s.string_length(), DEFAULT_STRING_LENGTH);
            assert_eq!(s.collection_size(), DEFAULT_COLLECTION_SIZE);
            assert!(s.sources().is_empty());
        }
    }

    mod layering {
        use super::*;

        #[test]
        fn later_layer_wins() {
            let s = Settings::defaults()
                .with_layer(SettingsFile {
                    seed: Some(1),
                    max_depth: Some(3),
                    ..Default::default()
                })
                .unwrap()
                .with_layer(SettingsFile {
                    seed: Some(2),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(s.seed(), Some(2));
            assert_eq!(s.max_depth(), 3);
        }

        #[test]
        fn partial_sections_merge() {
            let s = Settings::defaults()
                .with_layer(SettingsFile {
                    strings: Some(StringSettings {
                        min_length: Some(5),
                        max_length: Some(20),
                    }),
                    ..Default::default()
                })
                .unwrap()
                .with_layer(SettingsFile {
                    strings: Some(StringSettings {
                        min_length: None,
                        max_length: Some(8),
                    }),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(s.string_length(), (5, 8));
        }

        #[test]
        fn merged_inversion_rejected() {
            // max below the default min
            let result = Settings::defaults().with_layer(SettingsFile {
                collections: Some(CollectionSettings {
                    min_size: None,
                    max_size: Some(1),
                }),
                ..Default::default()
            });
            assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
        }
    }

    mod files {
        use super::*;

        #[test]
        fn with_file_records_source() {
            let dir = TempDir::new().unwrap();
            let path = write(&dir, "fixtura.toml", "seed = 7\nmode = \"lenient\"\n");
            let s = Settings::defaults().with_file(&path).unwrap();
            assert_eq!(s.seed(), Some(7));
            assert_eq!(s.mode(), Mode::Lenient);
            assert_eq!(s.sources(), &[path]);
        }

        #[test]
        fn parse_error_reports_path() {
            let dir = TempDir::new().unwrap();
            let path = write(&dir, "bad.toml", "seed = \"x\"");
            let err = Settings::defaults().with_file(&path).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { .. }));
            assert!(err.to_string().contains("bad.toml"));
        }

        #[test]
        fn missing_file_is_read_error() {
            let dir = TempDir::new().unwrap();
            let err = Settings::defaults()
                .with_file(&dir.path().join("nope.toml"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::ReadError { .. }));
        }

        #[test]
        fn project_path_location() {
            let p = Settings::project_path(Path::new("/work"));
            assert_eq!(p, PathBuf::from("/work/fixtura.toml"));
        }
    }
}
