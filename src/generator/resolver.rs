//! generator::resolver
//!
//! Built-in generator lookup by type.
//!
//! # Overview
//!
//! The resolver maps a type to a shared generator instance. Every scalar type
//! has a registration, every catalog enum gets an enum generator, and callers
//! may add or replace registrations through the builder.
//!
//! Lookup tries the exact type first, then its catalog supertypes nearest
//! first. The registry is immutable after [`GeneratorResolverBuilder::build`]
//! and lookups return clones of the same handle, so identity (and therefore
//! one-time initialization) is stable across resolutions.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fixtura::core::catalog::TypeCatalog;
//! use fixtura::core::types::TypeKey;
//! use fixtura::generator::{Gen, GeneratorResolver};
//!
//! let catalog = Arc::new(TypeCatalog::builder().build().unwrap());
//! let resolver = GeneratorResolver::builder()
//!     .register(TypeKey::string(), Gen::strings().length(4))
//!     .build(catalog);
//!
//! let first = resolver.resolve(&TypeKey::string()).unwrap();
//! let again = resolver.resolve(&TypeKey::string()).unwrap();
//! assert_eq!(first.id(), again.id());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::specs::EnumGenerator;
use super::{Gen, GeneratorHandle};
use crate::core::catalog::{Reflector, TypeCatalog};
use crate::core::types::TypeKey;

/// Shared registry of built-in generators.
#[derive(Debug, Clone)]
pub struct GeneratorResolver {
    registry: HashMap<TypeKey, GeneratorHandle>,
    catalog: Arc<TypeCatalog>,
}

impl GeneratorResolver {
    pub fn builder() -> GeneratorResolverBuilder {
        GeneratorResolverBuilder::default()
    }

    /// Resolver with only the built-in registrations.
    pub fn standard(catalog: Arc<TypeCatalog>) -> Self {
        Self::builder().build(catalog)
    }

    /// Generator registered for `ty` or its nearest registered supertype.
    pub fn resolve(&self, ty: &TypeKey) -> Option<GeneratorHandle> {
        if let Some(handle) = self.registry.get(ty) {
            return Some(handle.clone());
        }
        let found = self
            .catalog
            .ancestors_of(ty)
            .into_iter()
            .find_map(|ancestor| self.registry.get(&ancestor).cloned());
        if let Some(handle) = &found {
            trace!(ty = %ty, generator = %handle, "resolved through supertype");
        }
        found
    }

    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.registry.contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

/// Collects registrations before the registry is frozen.
#[derive(Debug, Clone, Default)]
pub struct GeneratorResolverBuilder {
    custom: Vec<(TypeKey, GeneratorHandle)>,
}

impl GeneratorResolverBuilder {
    /// Register (or replace) the generator for a type.
    pub fn register(mut self, ty: TypeKey, generator: impl Into<GeneratorHandle>) -> Self {
        self.custom.push((ty, generator.into()));
        self
    }

    /// Freeze the registry for `catalog`.
    ///
    /// Custom registrations are applied after the built-ins, so they win.
    pub fn build(self, catalog: Arc<TypeCatalog>) -> GeneratorResolver {
        let mut registry: HashMap<TypeKey, GeneratorHandle> = HashMap::new();

        for ty in TypeKey::scalars() {
            if let Some(handle) = builtin_for(&ty) {
                registry.insert(ty, handle);
            }
        }
        for (ty, variants) in catalog.enums() {
            let generator = EnumGenerator::new(ty.clone(), variants.to_vec());
            registry.insert(ty.clone(), generator.into());
        }
        for (ty, handle) in self.custom {
            registry.insert(ty, handle);
        }

        GeneratorResolver { registry, catalog }
    }
}

fn builtin_for(ty: &TypeKey) -> Option<GeneratorHandle> {
    let handle: GeneratorHandle = match ty.as_str() {
        "bool" => Gen::bools().into(),
        "char" => Gen::chars().into(),
        "i32" => Gen::ints().into(),
        "i64" => Gen::longs().into(),
        "f32" => Gen::floats().into(),
        "f64" => Gen::doubles().into(),
        "string" => Gen::strings().into(),
        "uuid" => Gen::uuids().into(),
        "datetime" => Gen::datetimes().into(),
        _ => return None,
    };
    Some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::generator::{GeneratorContext, Random};

    fn catalog() -> Arc<TypeCatalog> {
        Arc::new(
            TypeCatalog::builder()
                .enumeration("Status", ["OPEN", "CLOSED"])
                .interface("Shape", Vec::<String>::new())
                .record("Circle", |r| r.field("radius", "f64").implements("Shape"))
                .record("Square", |r| r.field("side", "f64").implements("Shape"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn every_scalar_is_registered() {
        let resolver = GeneratorResolver::standard(catalog());
        for ty in TypeKey::scalars() {
            assert!(resolver.resolve(&ty).is_some(), "no generator for {ty}");
        }
    }

    #[test]
    fn enums_are_registered() {
        let resolver = GeneratorResolver::standard(catalog());
        let status = TypeKey::new("Status").unwrap();
        let handle = resolver.resolve(&status).unwrap();
        handle.init(&GeneratorContext::default());
        let value = handle.generate(&mut Random::new(Some(1))).unwrap();
        assert!(matches!(value, Value::Enum { ref ty, .. } if ty == &status));
    }

    #[test]
    fn records_are_not_registered() {
        let resolver = GeneratorResolver::standard(catalog());
        assert!(resolver
            .resolve(&TypeKey::new("Circle").unwrap())
            .is_none());
    }

    #[test]
    fn lookup_falls_back_to_supertype() {
        let shape = TypeKey::new("Shape").unwrap();
        let resolver = GeneratorResolver::builder()
            .register(shape.clone(), Gen::constant("a shape"))
            .build(catalog());
        let for_circle = resolver.resolve(&TypeKey::new("Circle").unwrap()).unwrap();
        let for_shape = resolver.resolve(&shape).unwrap();
        assert_eq!(for_circle.id(), for_shape.id());
    }

    #[test]
    fn custom_registration_replaces_builtin() {
        let custom: GeneratorHandle = Gen::strings().length(1).into();
        let resolver = GeneratorResolver::builder()
            .register(TypeKey::string(), custom.clone())
            .build(catalog());
        assert_eq!(
            resolver.resolve(&TypeKey::string()).unwrap().id(),
            custom.id()
        );
    }

    #[test]
    fn identity_is_stable() {
        let resolver = GeneratorResolver::standard(catalog());
        let a = resolver.resolve(&TypeKey::uuid()).unwrap();
        let b = resolver.resolve(&TypeKey::uuid()).unwrap();
        assert_eq!(a.id(), b.id());
    }
}
