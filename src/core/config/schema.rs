//! core::config::schema
//!
//! Settings file schema.
//!
//! Every value is optional; a file only needs the keys it overrides.
//! Values are validated after parsing (ranges must be ordered, the null
//! probability must lie in `[0, 1]`).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::generator::hints::AfterGenerate;

/// How unmatched selectors are treated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Selectors that match no node are an error
    #[default]
    Strict,
    /// Selectors that match no node are ignored
    Lenient,
}

/// How generated values are written into records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    /// Write fields directly
    #[default]
    Field,
    /// Write through setter methods
    Method,
}

/// What to do in `method` assignment mode when a field has no setter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OnSetMethodNotFound {
    /// Fall back to writing the field
    #[default]
    AssignField,
    /// Leave the field unset
    Ignore,
    /// Abort generation
    Fail,
}

/// Integer bounds for `i32`/`i64` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IntegerSettings {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Float bounds for `f32`/`f64` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FloatSettings {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// String length bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StringSettings {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// List size bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionSettings {
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
}

/// One layer of settings.
///
/// # Example
///
/// ```toml
/// mode = "lenient"
/// seed = 1234
/// max_depth = 6
/// null_probability = 0.2
/// assignment = "method"
/// on_set_method_not_found = "fail"
///
/// [strings]
/// min_length = 3
/// max_length = 12
///
/// [collections]
/// min_size = 1
/// max_size = 4
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub mode: Option<Mode>,
    pub seed: Option<u64>,
    pub max_depth: Option<usize>,
    pub null_probability: Option<f64>,
    pub after_generate: Option<AfterGenerate>,
    pub assignment: Option<AssignmentType>,
    pub on_set_method_not_found: Option<OnSetMethodNotFound>,
    pub integers: Option<IntegerSettings>,
    pub floats: Option<FloatSettings>,
    pub strings: Option<StringSettings>,
    pub collections: Option<CollectionSettings>,
}

impl SettingsFile {
    /// Validate the values present in this layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(p) = self.null_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidValue(format!(
                    "null_probability must be between 0 and 1, got {p}"
                )));
            }
        }

        if let Some(ints) = &self.integers {
            check_order("integers", ints.min, ints.max)?;
        }

        if let Some(floats) = &self.floats {
            for v in [floats.min, floats.max].into_iter().flatten() {
                if !v.is_finite() {
                    return Err(ConfigError::InvalidValue(format!(
                        "floats bounds must be finite, got {v}"
                    )));
                }
            }
            check_order("floats", floats.min, floats.max)?;
            if let (Some(min), Some(max)) = (floats.min, floats.max) {
                if !(max - min).is_finite() {
                    return Err(ConfigError::InvalidValue(format!(
                        "floats range [{min}, {max}] is wider than f64 can represent"
                    )));
                }
            }
        }

        if let Some(strings) = &self.strings {
            check_order("strings", strings.min_length, strings.max_length)?;
        }

        if let Some(collections) = &self.collections {
            check_order("collections", collections.min_size, collections.max_size)?;
        }

        Ok(())
    }
}

/// Check that `min <= max` when both are present.
pub(crate) fn check_order<T: PartialOrd + std::fmt::Display>(
    section: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ConfigError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ConfigError::InvalidValue(format!(
                "{section}: min ({min}) must not exceed max ({max})"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_valid() {
        let file: SettingsFile = toml::from_str("").unwrap();
        assert_eq!(file, SettingsFile::default());
        assert!(file.validate().is_ok());
    }

    #[test]
    fn parses_all_sections() {
        let file: SettingsFile = toml::from_str(
            r#"
mode = "lenient"
seed = 99
max_depth = 3
null_probability = 0.5
after_generate = "populate_all"
assignment = "method"
on_set_method_not_found = "ignore"

[integers]
min = -5
max = 5

[floats]
min = 0.5
max = 1.5

[strings]
min_length = 1
max_length = 2

[collections]
min_size = 0
max_size = 1
"#,
        )
        .unwrap();

        assert_eq!(file.mode, Some(Mode::Lenient));
        assert_eq!(file.seed, Some(99));
        assert_eq!(file.after_generate, Some(AfterGenerate::PopulateAll));
        assert_eq!(file.assignment, Some(AssignmentType::Method));
        assert_eq!(
            file.on_set_method_not_found,
            Some(OnSetMethodNotFound::Ignore)
        );
        assert_eq!(file.integers.as_ref().unwrap().min, Some(-5));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SettingsFile, _> = toml::from_str("colour = \"red\"");
        assert!(result.is_err());
    }

    #[test]
    fn probability_out_of_range() {
        let file = SettingsFile {
            null_probability: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(file.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn inverted_range_rejected() {
        let file = SettingsFile {
            strings: Some(StringSettings {
                min_length: Some(10),
                max_length: Some(2),
            }),
            ..Default::default()
        };
        let err = file.validate().unwrap_err();
        assert!(err.to_string().contains("strings"));
    }

    #[test]
    fn non_finite_float_rejected() {
        let file = SettingsFile {
            floats: Some(FloatSettings {
                min: Some(f64::NEG_INFINITY),
                max: None,
            }),
            ..Default::default()
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn float_range_wider_than_f64_rejected() {
        let file = SettingsFile {
            floats: Some(FloatSettings {
                min: Some(f64::MIN),
                max: Some(f64::MAX),
            }),
            ..Default::default()
        };
        let err = file.validate().unwrap_err();
        assert!(err.to_string().contains("wider than f64"));
    }
}
