//! generator::instantiate
//!
//! Blank instances of catalog types.
//!
//! The instantiator is the structural fallback: when nothing else produces a
//! value for a type, a blank instance is created and the engine fills it in.
//! Blank means records with every field null, empty lists, zero or empty
//! scalars and the first variant of an enum. Interfaces cannot be
//! instantiated.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::hints::{AfterGenerate, Hints};
use super::{GenerateError, Generator, GeneratorHandle, Random};
use crate::core::catalog::{Reflector, TypeCatalog, TypeKind};
use crate::core::types::{Record, TypeKey, Value};
use crate::error::AccessError;

/// Creates blank instances.
pub trait Instantiator: Send + Sync + fmt::Debug {
    fn instantiate(&self, ty: &TypeKey) -> Result<Value, AccessError>;
}

/// Instantiator backed by a type catalog.
#[derive(Debug, Clone)]
pub struct CatalogInstantiator {
    catalog: Arc<TypeCatalog>,
}

impl CatalogInstantiator {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }

    fn blank_scalar(ty: &TypeKey) -> Value {
        match ty.as_str() {
            "bool" => Value::Bool(false),
            "char" => Value::Char('\0'),
            "i32" | "i64" => Value::Int(0),
            "f32" | "f64" => Value::Float(0.0),
            "string" => Value::Str(String::new()),
            "uuid" => Value::Uuid(Uuid::nil()),
            "datetime" => Value::DateTime(NaiveDateTime::default()),
            _ => Value::Null,
        }
    }
}

impl Instantiator for CatalogInstantiator {
    fn instantiate(&self, ty: &TypeKey) -> Result<Value, AccessError> {
        let desc = self
            .catalog
            .describe(ty)
            .ok_or_else(|| AccessError::UnknownType(ty.clone()))?;

        Ok(match &desc.kind {
            TypeKind::Scalar => Self::blank_scalar(ty),
            TypeKind::List { .. } => Value::List(Vec::new()),
            TypeKind::Enum { variants } => match variants.first() {
                Some(variant) => Value::Enum {
                    ty: ty.clone(),
                    variant: variant.clone(),
                },
                None => Value::Null,
            },
            TypeKind::Record => {
                let mut record = Record::new(ty.clone());
                for field in &desc.fields {
                    record.set(field.name.clone(), Value::Null);
                }
                Value::Record(record)
            }
            TypeKind::Interface => return Err(AccessError::NotInstantiable(ty.clone())),
        })
    }
}

/// Generator producing blank instances of one type.
#[derive(Debug, Clone)]
pub struct InstantiatingGenerator {
    instantiator: Arc<dyn Instantiator>,
    ty: TypeKey,
}

impl InstantiatingGenerator {
    pub fn new(instantiator: Arc<dyn Instantiator>, ty: TypeKey) -> Self {
        Self { instantiator, ty }
    }
}

impl Generator for InstantiatingGenerator {
    fn generate(&self, _random: &mut Random) -> Result<Value, GenerateError> {
        Ok(self.instantiator.instantiate(&self.ty)?)
    }

    fn hints(&self) -> Hints {
        Hints::new().with_after_generate(AfterGenerate::PopulateAll)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(self.ty.clone())
    }

    fn name(&self) -> &str {
        "instantiate()"
    }
}

/// One instantiating generator per catalog type, created up front so each
/// keeps a stable identity.
#[derive(Debug, Clone, Default)]
pub struct FallbackGenerators {
    by_type: HashMap<TypeKey, GeneratorHandle>,
}

impl FallbackGenerators {
    pub fn for_catalog(catalog: &TypeCatalog, instantiator: Arc<dyn Instantiator>) -> Self {
        let by_type = catalog
            .types()
            .map(|desc| {
                let generator = InstantiatingGenerator::new(instantiator.clone(), desc.key.clone());
                (desc.key.clone(), GeneratorHandle::new(generator))
            })
            .collect();
        Self { by_type }
    }

    pub fn get(&self, ty: &TypeKey) -> Option<&GeneratorHandle> {
        self.by_type.get(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<TypeCatalog> {
        Arc::new(
            TypeCatalog::builder()
                .record("Order", |r| r.field("id", "uuid").field("lines", "Lines"))
                .list("Lines", "string")
                .enumeration("Status", ["NEW", "DONE"])
                .interface("Payable", Vec::<String>::new())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn blank_record_has_null_fields_in_order() {
        let inst = CatalogInstantiator::new(catalog());
        let value = inst.instantiate(&TypeKey::new("Order").unwrap()).unwrap();
        let record = value.as_record().unwrap();
        let names: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["id", "lines"]);
        assert!(record.fields().all(|(_, v)| v.is_null()));
    }

    #[test]
    fn blank_list_enum_and_scalars() {
        let inst = CatalogInstantiator::new(catalog());
        assert_eq!(
            inst.instantiate(&TypeKey::new("Lines").unwrap()).unwrap(),
            Value::List(Vec::new())
        );
        assert_eq!(
            inst.instantiate(&TypeKey::new("Status").unwrap()).unwrap(),
            Value::Enum {
                ty: TypeKey::new("Status").unwrap(),
                variant: "NEW".into()
            }
        );
        assert_eq!(inst.instantiate(&TypeKey::i32()).unwrap(), Value::Int(0));
        assert_eq!(
            inst.instantiate(&TypeKey::uuid()).unwrap(),
            Value::Uuid(Uuid::nil())
        );
    }

    #[test]
    fn interfaces_and_unknown_types_fail() {
        let inst = CatalogInstantiator::new(catalog());
        let payable = TypeKey::new("Payable").unwrap();
        assert_eq!(
            inst.instantiate(&payable),
            Err(AccessError::NotInstantiable(payable))
        );
        let ghost = TypeKey::new("Ghost").unwrap();
        assert_eq!(
            inst.instantiate(&ghost),
            Err(AccessError::UnknownType(ghost))
        );
    }

    #[test]
    fn instantiating_generator_hints_populate_all() {
        let catalog = catalog();
        let inst: Arc<dyn Instantiator> = Arc::new(CatalogInstantiator::new(catalog.clone()));
        let generator = InstantiatingGenerator::new(inst.clone(), TypeKey::new("Order").unwrap());
        assert_eq!(
            generator.hints().after_generate(),
            Some(AfterGenerate::PopulateAll)
        );
        assert!(generator
            .generate(&mut Random::new(Some(1)))
            .unwrap()
            .as_record()
            .is_some());

        let fallbacks = FallbackGenerators::for_catalog(&catalog, inst);
        let a = fallbacks.get(&TypeKey::new("Order").unwrap()).unwrap();
        let b = fallbacks.get(&TypeKey::new("Order").unwrap()).unwrap();
        assert_eq!(a.id(), b.id());
        assert!(fallbacks.get(&TypeKey::string()).is_some());
    }
}
