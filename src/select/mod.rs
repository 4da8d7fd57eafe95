//! select
//!
//! Selectors: values describing which nodes a rule applies to.
//!
//! # Overview
//!
//! Selectors are built through [`Select`], which validates names against a
//! [`Reflector`] and fails fast with [`SelectorError`]. Once built they are
//! immutable and carry no reference to the reflector.
//!
//! # Precedence
//!
//! Exact selectors (type, field, getter, setter, root) outrank predicate
//! selectors regardless of declaration order; see [`Tier`]. Within a tier the
//! most recently declared binding wins.
//!
//! # Scopes
//!
//! [`Selector::within`] restricts a selector to a subtree. Scopes are given
//! outermost first and must match distinct nodes from the target node
//! towards the root, innermost first.
//!
//! # Example
//!
//! ```
//! use fixtura::core::catalog::TypeCatalog;
//! use fixtura::select::Select;
//!
//! let catalog = TypeCatalog::builder()
//!     .record("Person", |r| r.field("home", "Address").field("work", "Address"))
//!     .record("Address", |r| r.field("city", "string"))
//!     .build()
//!     .unwrap();
//!
//! let select = Select::new(&catalog);
//! let home_city = select
//!     .field("Address", "city")
//!     .unwrap()
//!     .within([select.scope_field("Person", "home").unwrap()]);
//! assert_eq!(
//!     home_city.to_string(),
//!     "field(Address.city).within(scope(field(Person.home)))"
//! );
//! ```

pub mod predicate;
pub mod selector;

pub use predicate::{FieldPredicate, TypePredicate};
pub use selector::{Scope, Selector, SelectorGroup, TargetSelector, Tier};

use thiserror::Error;

use crate::core::catalog::{MethodKind, Reflector};
use crate::core::types::{FieldRef, GetterRef, SetterRef, TypeError, TypeKey};
use selector::{Predicate, Target};

/// Errors raised while constructing selectors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error(transparent)]
    InvalidType(#[from] TypeError),

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("type '{ty}' has no field '{field}'")]
    UnknownField { ty: String, field: String },

    #[error("type '{ty}' has no method '{method}'")]
    UnknownMethod { ty: String, method: String },

    #[error("method '{ty}::{method}' is not a getter")]
    NotAGetter { ty: String, method: String },

    #[error("type '{ty}' has no setter '{method}'{}", taking(.param))]
    UnknownSetter {
        ty: String,
        method: String,
        param: Option<String>,
    },

    #[error("selector group must have at least one member")]
    EmptyGroup,
}

fn taking(param: &Option<String>) -> String {
    param
        .as_deref()
        .map(|p| format!(" taking {p}"))
        .unwrap_or_default()
}

/// Entry point for building selectors against a reflector.
#[derive(Clone, Copy)]
pub struct Select<'r> {
    reflector: &'r dyn Reflector,
}

impl<'r> Select<'r> {
    pub fn new(reflector: &'r dyn Reflector) -> Self {
        Self { reflector }
    }

    fn type_key(&self, name: &str) -> Result<TypeKey, SelectorError> {
        if name.is_empty() {
            return Err(SelectorError::EmptyName("type"));
        }
        let key = TypeKey::new(name)?;
        if !self.reflector.contains(&key) {
            return Err(SelectorError::UnknownType(name.to_string()));
        }
        Ok(key)
    }

    fn non_empty(what: &'static str, name: &str) -> Result<(), SelectorError> {
        if name.is_empty() {
            Err(SelectorError::EmptyName(what))
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Exact selectors
    // =========================================================================

    /// Every node whose target type is `ty`.
    pub fn all(&self, ty: &str) -> Result<Selector, SelectorError> {
        Ok(Selector::exact(Target::Type(self.type_key(ty)?)))
    }

    /// Group of selectors matching if any member matches.
    pub fn all_of(
        &self,
        selectors: impl IntoIterator<Item = Selector>,
    ) -> Result<SelectorGroup, SelectorError> {
        let members: Vec<Selector> = selectors.into_iter().collect();
        if members.is_empty() {
            return Err(SelectorError::EmptyGroup);
        }
        Ok(SelectorGroup::new(members))
    }

    /// Field `path` of `ty`. A dotted path (`address.city`) targets the last
    /// field, scoped to the intermediate fields.
    pub fn field(&self, ty: &str, path: &str) -> Result<Selector, SelectorError> {
        let key = self.type_key(ty)?;
        if path.split('.').any(str::is_empty) {
            return Err(SelectorError::EmptyName("field"));
        }
        let mut steps = self
            .reflector
            .field_path(&key, path)
            .map_err(|field| SelectorError::UnknownField {
                ty: ty.to_string(),
                field,
            })?;
        let Some((declaring, last)) = steps.pop() else {
            return Err(SelectorError::EmptyName("field"));
        };
        let scopes = steps.into_iter().map(|(declaring, field)| {
            Selector::exact(Target::Field {
                declaring: Some(declaring),
                name: field.name,
            })
            .to_scope()
        });
        Ok(Selector::exact(Target::Field {
            declaring: Some(declaring),
            name: last.name,
        })
        .within(scopes))
    }

    /// Any field called `name`, whatever type declares it.
    pub fn field_named(&self, name: &str) -> Result<Selector, SelectorError> {
        Self::non_empty("field", name)?;
        Ok(Selector::exact(Target::Field {
            declaring: None,
            name: name.to_string(),
        }))
    }

    /// The field read by a getter method.
    pub fn field_ref(&self, getter: &GetterRef) -> Result<Selector, SelectorError> {
        Self::non_empty("method", &getter.method)?;
        let key = self.type_key(&getter.declaring)?;
        let method = self.reflector.method(&key, &getter.method).ok_or_else(|| {
            SelectorError::UnknownMethod {
                ty: getter.declaring.clone(),
                method: getter.method.clone(),
            }
        })?;
        let MethodKind::Getter { field } = &method.kind else {
            return Err(SelectorError::NotAGetter {
                ty: getter.declaring.clone(),
                method: getter.method.clone(),
            });
        };
        Ok(Selector::exact(Target::Field {
            declaring: Some(key),
            name: field.clone(),
        }))
    }

    /// Any setter called `method`, whatever type declares it.
    pub fn setter_named(&self, method: &str) -> Result<Selector, SelectorError> {
        Self::non_empty("method", method)?;
        Ok(Selector::exact(Target::Setter {
            declaring: None,
            method: method.to_string(),
            param: None,
        }))
    }

    pub fn setter(&self, ty: &str, method: &str) -> Result<Selector, SelectorError> {
        self.checked_setter(ty, method, None)
    }

    /// Setter `method` of `ty` taking a `param`.
    pub fn setter_with_param(
        &self,
        ty: &str,
        method: &str,
        param: &str,
    ) -> Result<Selector, SelectorError> {
        self.checked_setter(ty, method, Some(param))
    }

    pub fn setter_ref(&self, setter: &SetterRef) -> Result<Selector, SelectorError> {
        self.checked_setter(&setter.declaring, &setter.method, None)
    }

    fn checked_setter(
        &self,
        ty: &str,
        method: &str,
        param: Option<&str>,
    ) -> Result<Selector, SelectorError> {
        Self::non_empty("method", method)?;
        let key = self.type_key(ty)?;
        let param = param.map(|p| self.type_key(p)).transpose()?;
        let found = self.reflector.method(&key, method).is_some_and(|m| match &m.kind {
            MethodKind::Setter { param: declared, .. } => {
                param.as_ref().map_or(true, |p| p == declared)
            }
            MethodKind::Getter { .. } => false,
        });
        if !found {
            return Err(SelectorError::UnknownSetter {
                ty: ty.to_string(),
                method: method.to_string(),
                param: param.map(|p| p.to_string()),
            });
        }
        Ok(Selector::exact(Target::Setter {
            declaring: Some(key),
            method: method.to_string(),
            param,
        }))
    }

    /// The root node only.
    pub fn root(&self) -> Selector {
        Selector::exact(Target::Root)
    }

    pub fn all_strings(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::string()))
    }

    pub fn all_ints(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::i32()))
    }

    pub fn all_longs(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::i64()))
    }

    pub fn all_floats(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::f32()))
    }

    pub fn all_doubles(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::f64()))
    }

    pub fn all_bools(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::bool()))
    }

    pub fn all_chars(&self) -> Selector {
        Selector::exact(Target::Type(TypeKey::char()))
    }

    // =========================================================================
    // Predicate selectors
    // =========================================================================

    pub fn fields(&self) -> FieldPredicate {
        FieldPredicate::new()
    }

    /// Nodes filling a field for which `test` holds.
    pub fn fields_where<F>(&self, test: F) -> Selector
    where
        F: Fn(&FieldRef) -> bool + Send + Sync + 'static,
    {
        Selector::predicate(Predicate::new("fields(<fn>)", move |node, _| {
            node.field().is_some_and(&test)
        }))
    }

    pub fn types(&self) -> TypePredicate {
        TypePredicate::new()
    }

    /// Nodes whose target type satisfies `test`.
    pub fn types_where<F>(&self, test: F) -> Selector
    where
        F: Fn(&TypeKey) -> bool + Send + Sync + 'static,
    {
        Selector::predicate(Predicate::new("types(<fn>)", move |node, _| {
            test(node.target())
        }))
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    pub fn scope(&self, ty: &str) -> Result<Scope, SelectorError> {
        Ok(self.all(ty)?.to_scope())
    }

    pub fn scope_field(&self, ty: &str, field: &str) -> Result<Scope, SelectorError> {
        Ok(self.field(ty, field)?.to_scope())
    }

    pub fn scope_ref(&self, getter: &GetterRef) -> Result<Scope, SelectorError> {
        Ok(self.field_ref(getter)?.to_scope())
    }

    /// Scope from a predicate selector.
    pub fn scope_predicate(&self, predicate: impl Into<Selector>) -> Scope {
        predicate.into().to_scope()
    }
}
