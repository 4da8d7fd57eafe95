//! Booleans, UUIDs, enum variants, fixed values and hint-only generators.

use std::fmt;
use std::sync::Arc;

use super::value_hints;
use crate::core::types::{TypeKey, Value};
use crate::generator::{
    AfterGenerate, GenerateError, Generator, GeneratorHint, Hints, Random,
};

/// Booleans, `true` with the given probability.
#[derive(Debug, Clone)]
pub struct BoolSpec {
    probability: f64,
    nullable: bool,
}

impl BoolSpec {
    pub(super) fn new() -> Self {
        Self {
            probability: 0.5,
            nullable: false,
        }
    }

    /// Probability of `true`, clamped to `[0, 1]`.
    pub fn probability(mut self, p: f64) -> Self {
        self.probability = p;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Generator for BoolSpec {
    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        Ok(Value::Bool(random.chance(self.probability)))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::bool())
    }

    fn name(&self) -> &str {
        "bools()"
    }
}

/// Random version 4 UUIDs.
#[derive(Debug, Clone, Default)]
pub struct UuidSpec {
    nullable: bool,
}

impl UuidSpec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Generator for UuidSpec {
    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        Ok(Value::Uuid(random.uuid()))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::uuid())
    }

    fn name(&self) -> &str {
        "uuids()"
    }
}

/// Variants of one enum type.
#[derive(Debug, Clone)]
pub struct EnumGenerator {
    ty: TypeKey,
    variants: Vec<String>,
    nullable: bool,
}

impl EnumGenerator {
    pub fn new(ty: TypeKey, variants: Vec<String>) -> Self {
        Self {
            ty,
            variants,
            nullable: false,
        }
    }

    /// Never produce the named variants.
    pub fn excluding<I, S>(mut self, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded: Vec<S> = excluded.into_iter().collect();
        self.variants
            .retain(|v| !excluded.iter().any(|e| e.as_ref() == v));
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Generator for EnumGenerator {
    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let variant = random
            .pick(&self.variants)
            .ok_or(GenerateError::EmptyChoices("enum_of()"))?;
        Ok(Value::Enum {
            ty: self.ty.clone(),
            variant: variant.clone(),
        })
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(self.ty.clone())
    }

    fn name(&self) -> &str {
        "enum_of()"
    }
}

/// One of a fixed list of values.
#[derive(Debug, Clone)]
pub struct OneOfSpec {
    choices: Vec<Value>,
    nullable: bool,
}

impl OneOfSpec {
    pub(super) fn new(choices: Vec<Value>) -> Self {
        Self {
            choices,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Generator for OneOfSpec {
    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        random
            .pick(&self.choices)
            .cloned()
            .ok_or(GenerateError::EmptyChoices("one_of()"))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn name(&self) -> &str {
        "one_of()"
    }
}

/// The same value every time.
///
/// Records produced this way are not populated further.
#[derive(Debug, Clone)]
pub struct ConstantGenerator {
    value: Value,
}

impl ConstantGenerator {
    pub(super) fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Generator for ConstantGenerator {
    fn generate(&self, _random: &mut Random) -> Result<Value, GenerateError> {
        Ok(self.value.clone())
    }

    fn hints(&self) -> Hints {
        Hints::new().with_after_generate(AfterGenerate::DoNotModify)
    }

    fn name(&self) -> &str {
        "set()"
    }
}

/// Values from a closure.
///
/// Records produced this way are not populated further.
#[derive(Clone)]
pub struct SupplierGenerator {
    supply: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl SupplierGenerator {
    pub(super) fn new<F>(supply: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            supply: Arc::new(supply),
        }
    }
}

impl fmt::Debug for SupplierGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplierGenerator").finish_non_exhaustive()
    }
}

impl Generator for SupplierGenerator {
    fn generate(&self, _random: &mut Random) -> Result<Value, GenerateError> {
        Ok((self.supply)())
    }

    fn hints(&self) -> Hints {
        Hints::new().with_after_generate(AfterGenerate::DoNotModify)
    }

    fn name(&self) -> &str {
        "supply()"
    }
}

/// A generator that only supplies hints.
///
/// The engine produces the value with the generator registered for the
/// target type (or the node's own type when no target is set) and reports
/// the hints given here.
#[derive(Debug, Clone, Default)]
pub struct DelegatingSpec {
    target: Option<TypeKey>,
    nullable: bool,
    after_generate: Option<AfterGenerate>,
}

impl DelegatingSpec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, ty: TypeKey) -> Self {
        self.target = Some(ty);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn after_generate(mut self, after: AfterGenerate) -> Self {
        self.after_generate = Some(after);
        self
    }
}

impl Generator for DelegatingSpec {
    fn generate(&self, _random: &mut Random) -> Result<Value, GenerateError> {
        Err(GenerateError::DelegationOnly(self.name().to_string()))
    }

    fn hints(&self) -> Hints {
        let mut hint = GeneratorHint::delegating().with_nullable(self.nullable);
        hint.target = self.target.clone();
        let hints = Hints::new().with_generator(hint);
        match self.after_generate {
            Some(after) => hints.with_after_generate(after),
            None => hints,
        }
    }

    fn name(&self) -> &str {
        "delegating()"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Gen;

    #[test]
    fn bool_probability_extremes() {
        let mut random = Random::new(Some(1));
        for _ in 0..20 {
            assert_eq!(
                Gen::bools().probability(1.0).generate(&mut random).unwrap(),
                Value::Bool(true)
            );
            assert_eq!(
                Gen::bools().probability(0.0).generate(&mut random).unwrap(),
                Value::Bool(false)
            );
        }
    }

    #[test]
    fn uuid_values() {
        let mut random = Random::new(Some(2));
        let a = Gen::uuids().generate(&mut random).unwrap();
        let b = Gen::uuids().generate(&mut random).unwrap();
        assert!(a.as_uuid().is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn enum_excluding() {
        let ty = TypeKey::new("Status").unwrap();
        let spec = Gen::enum_of(ty.clone(), ["OPEN", "CLOSED", "HELD"]).excluding(["OPEN", "HELD"]);
        let mut random = Random::new(Some(3));
        for _ in 0..20 {
            assert_eq!(
                spec.generate(&mut random).unwrap(),
                Value::Enum {
                    ty: ty.clone(),
                    variant: "CLOSED".into()
                }
            );
        }
    }

    #[test]
    fn empty_choices_fail() {
        let mut random = Random::new(Some(4));
        let empty: Vec<Value> = Vec::new();
        assert!(matches!(
            Gen::one_of(empty).generate(&mut random),
            Err(GenerateError::EmptyChoices(_))
        ));
        let ty = TypeKey::new("Status").unwrap();
        assert!(Gen::enum_of(ty, ["A"])
            .excluding(["A"])
            .generate(&mut random)
            .is_err());
    }

    #[test]
    fn one_of_picks_a_choice() {
        let spec = Gen::one_of(["red", "green"]);
        let mut random = Random::new(Some(5));
        for _ in 0..20 {
            let v = spec.generate(&mut random).unwrap();
            assert!(matches!(v.as_str(), Some("red") | Some("green")));
        }
    }

    #[test]
    fn constant_and_supplier_do_not_modify() {
        let mut random = Random::new(Some(6));
        let constant = Gen::constant("fixed");
        assert_eq!(constant.generate(&mut random).unwrap(), Value::from("fixed"));
        assert_eq!(
            constant.hints().after_generate(),
            Some(AfterGenerate::DoNotModify)
        );

        let supplier = Gen::supplier(|| Value::Int(7));
        assert_eq!(supplier.generate(&mut random).unwrap(), Value::Int(7));
        assert_eq!(
            supplier.hints().after_generate(),
            Some(AfterGenerate::DoNotModify)
        );
    }

    #[test]
    fn delegating_only_supplies_hints() {
        let spec = Gen::delegating().target(TypeKey::uuid()).nullable(false);
        let hints = spec.hints();
        assert!(hints.is_delegating());
        assert!(!hints.is_nullable());
        assert_eq!(hints.generator().unwrap().target, Some(TypeKey::uuid()));

        let mut random = Random::new(Some(7));
        assert!(matches!(
            spec.generate(&mut random),
            Err(GenerateError::DelegationOnly(_))
        ));
    }
}
