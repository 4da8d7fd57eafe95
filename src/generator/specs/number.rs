//! Integer and floating point generators.

use std::sync::OnceLock;

use super::value_hints;
use crate::core::config::{DEFAULT_FLOAT_RANGE, DEFAULT_INT_RANGE};
use crate::core::types::{TypeKey, Value};
use crate::generator::{GenerateError, Generator, GeneratorContext, Hints, Random};

/// Integers in an inclusive range.
///
/// Unset bounds come from the `integers` settings. When only one bound is
/// set and it falls outside the default range, the other bound follows it
/// so the range stays ordered.
#[derive(Debug, Clone)]
pub struct IntSpec {
    ty: TypeKey,
    min: Option<i64>,
    max: Option<i64>,
    nullable: bool,
    bounds: OnceLock<(i64, i64)>,
}

impl IntSpec {
    pub(super) fn new(ty: TypeKey) -> Self {
        Self {
            ty,
            min: None,
            max: None,
            nullable: false,
            bounds: OnceLock::new(),
        }
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: i64, max: i64) -> Self {
        self.min(min).max(max)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn resolve(&self, defaults: (i64, i64)) -> (i64, i64) {
        let span = defaults.1.saturating_sub(defaults.0);
        let (min, max) = match (self.min, self.max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) if min > defaults.1 => (min, min.saturating_add(span)),
            (Some(min), None) => (min, defaults.1),
            (None, Some(max)) if max < defaults.0 => (max.saturating_sub(span), max),
            (None, Some(max)) => (defaults.0, max),
            (None, None) => defaults,
        };
        if self.ty == TypeKey::i32() {
            let lo = i64::from(i32::MIN);
            let hi = i64::from(i32::MAX);
            (min.clamp(lo, hi), max.clamp(lo, hi))
        } else {
            (min, max)
        }
    }
}

impl Generator for IntSpec {
    fn init(&self, context: &GeneratorContext) {
        self.bounds
            .get_or_init(|| self.resolve(context.settings().int_range()));
    }

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let (min, max) = self
            .bounds
            .get()
            .copied()
            .unwrap_or_else(|| self.resolve(DEFAULT_INT_RANGE));
        if min > max {
            return Err(GenerateError::InvalidRange {
                what: "integers",
                detail: format!("min {min} exceeds max {max}"),
            });
        }
        Ok(Value::Int(random.int_range(min, max)))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(self.ty.clone())
    }

    fn name(&self) -> &str {
        if self.ty == TypeKey::i32() {
            "ints()"
        } else {
            "longs()"
        }
    }
}

/// Floats in an inclusive range. Unset bounds come from the `floats` settings.
#[derive(Debug, Clone)]
pub struct FloatSpec {
    ty: TypeKey,
    min: Option<f64>,
    max: Option<f64>,
    nullable: bool,
    bounds: OnceLock<(f64, f64)>,
}

impl FloatSpec {
    pub(super) fn new(ty: TypeKey) -> Self {
        Self {
            ty,
            min: None,
            max: None,
            nullable: false,
            bounds: OnceLock::new(),
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn resolve(&self, defaults: (f64, f64)) -> (f64, f64) {
        let span = defaults.1 - defaults.0;
        match (self.min, self.max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) if min > defaults.1 => (min, min + span),
            (Some(min), None) => (min, defaults.1),
            (None, Some(max)) if max < defaults.0 => (max - span, max),
            (None, Some(max)) => (defaults.0, max),
            (None, None) => defaults,
        }
    }
}

impl Generator for FloatSpec {
    fn init(&self, context: &GeneratorContext) {
        self.bounds
            .get_or_init(|| self.resolve(context.settings().float_range()));
    }

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let (min, max) = self
            .bounds
            .get()
            .copied()
            .unwrap_or_else(|| self.resolve(DEFAULT_FLOAT_RANGE));
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(GenerateError::InvalidRange {
                what: "floats",
                detail: format!("[{min}, {max}] is not an ordered finite range"),
            });
        }
        if !(max - min).is_finite() {
            return Err(GenerateError::InvalidRange {
                what: "floats",
                detail: format!("width of [{min}, {max}] overflows f64"),
            });
        }
        let value = random.float_range(min, max);
        if self.ty == TypeKey::f32() {
            Ok(Value::Float(f64::from(value as f32)))
        } else {
            Ok(Value::Float(value))
        }
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(self.ty.clone())
    }

    fn name(&self) -> &str {
        if self.ty == TypeKey::f32() {
            "floats()"
        } else {
            "doubles()"
        }
    }
}
