//! generator::decorator
//!
//! Composes a value-producing delegate with a hint-supplying override.

use super::{GenerateError, Generator, GeneratorContext, GeneratorHandle, Hints, Random};
use crate::core::types::{TypeKey, Value};

/// Values from `delegate`, hints from `overriding`.
///
/// Used when a bound generator delegates value production: the delegate is
/// the generator for the target type and the override is the bound
/// generator.
#[derive(Debug, Clone)]
pub struct GeneratorDecorator {
    delegate: GeneratorHandle,
    overriding: GeneratorHandle,
}

impl GeneratorDecorator {
    pub fn new(delegate: GeneratorHandle, overriding: GeneratorHandle) -> Self {
        Self {
            delegate,
            overriding,
        }
    }

    pub fn delegate(&self) -> &GeneratorHandle {
        &self.delegate
    }

    pub fn overriding(&self) -> &GeneratorHandle {
        &self.overriding
    }
}

impl Generator for GeneratorDecorator {
    fn init(&self, context: &GeneratorContext) {
        self.delegate.init(context);
        self.overriding.init(context);
    }

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        self.delegate.generate(random)
    }

    fn hints(&self) -> Hints {
        self.overriding.hints()
    }

    fn target_type(&self) -> Option<TypeKey> {
        self.delegate.target_type()
    }

    fn name(&self) -> &str {
        self.delegate.name()
    }
}
