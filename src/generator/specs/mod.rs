//! generator::specs
//!
//! Built-in generators with fluent builders.
//!
//! # Overview
//!
//! Every spec is a plain builder value. Once configured it is converted into
//! a [`GeneratorHandle`] (any [`Generator`] converts through `Into`), after
//! which it is immutable. Defaults that depend on settings (integer bounds,
//! string lengths) are resolved in [`Generator::init`].
//!
//! [`Gen`] is the entry point:
//!
//! ```
//! use fixtura::generator::{Gen, GeneratorHandle};
//!
//! let ids: GeneratorHandle = Gen::strings().prefix("ID-").length(6).digits().into();
//! let age: GeneratorHandle = Gen::ints().range(18, 65).into();
//! let code: GeneratorHandle = Gen::mod11().end_index(8).into();
//! ```

mod checksum;
mod choice;
mod number;
mod temporal;
mod text;

pub use checksum::{Mod11Spec, PeselSpec, Sex};
pub use choice::{
    BoolSpec, ConstantGenerator, DelegatingSpec, EnumGenerator, OneOfSpec, SupplierGenerator,
    UuidSpec,
};
pub use number::{FloatSpec, IntSpec};
pub use temporal::{DateTimeSpec, TimeUnit};
pub use text::{CharClass, CharSpec, StringSpec};

use super::hints::{GeneratorHint, Hints};
use super::{Generator, GeneratorHandle};
use crate::core::types::{TypeKey, Value};

impl<G: Generator + 'static> From<G> for GeneratorHandle {
    fn from(generator: G) -> Self {
        GeneratorHandle::new(generator)
    }
}

/// Entry point for the built-in generators.
pub struct Gen;

impl Gen {
    pub fn bools() -> BoolSpec {
        BoolSpec::new()
    }

    pub fn chars() -> CharSpec {
        CharSpec::new()
    }

    /// `i32` values.
    pub fn ints() -> IntSpec {
        IntSpec::new(TypeKey::i32())
    }

    /// `i64` values.
    pub fn longs() -> IntSpec {
        IntSpec::new(TypeKey::i64())
    }

    /// `f32` values.
    pub fn floats() -> FloatSpec {
        FloatSpec::new(TypeKey::f32())
    }

    /// `f64` values.
    pub fn doubles() -> FloatSpec {
        FloatSpec::new(TypeKey::f64())
    }

    pub fn strings() -> StringSpec {
        StringSpec::new()
    }

    pub fn uuids() -> UuidSpec {
        UuidSpec::new()
    }

    pub fn datetimes() -> DateTimeSpec {
        DateTimeSpec::new()
    }

    /// One of the given values, uniformly.
    pub fn one_of<I>(choices: I) -> OneOfSpec
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        OneOfSpec::new(choices.into_iter().map(Into::into).collect())
    }

    /// Variants of an enum type.
    pub fn enum_of<I, S>(ty: TypeKey, variants: I) -> EnumGenerator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumGenerator::new(ty, variants.into_iter().map(Into::into).collect())
    }

    /// Always the same value. Records are left as given.
    pub fn constant(value: impl Into<Value>) -> ConstantGenerator {
        ConstantGenerator::new(value.into())
    }

    /// Values from a closure. Records are left as given.
    pub fn supplier<F>(supply: F) -> SupplierGenerator
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        SupplierGenerator::new(supply)
    }

    /// Hints only; the value comes from the generator for the target type.
    pub fn delegating() -> DelegatingSpec {
        DelegatingSpec::new()
    }

    /// Digit strings with a MOD-11 check digit.
    pub fn mod11() -> Mod11Spec {
        Mod11Spec::new()
    }

    /// Polish national identification numbers.
    pub fn pesel() -> PeselSpec {
        PeselSpec::new()
    }
}

/// Hints of a plain value generator.
fn value_hints(nullable: bool) -> Hints {
    Hints::new().with_generator(GeneratorHint {
        nullable,
        ..Default::default()
    })
}
