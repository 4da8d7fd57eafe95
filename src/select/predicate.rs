//! select::predicate
//!
//! Predicate selector builders: `fields()` and `types()`.

use std::fmt::Write as _;

use super::selector::{Predicate, Selector, TargetSelector};
use crate::core::types::TypeKey;

/// Builder matching nodes that fill a record field.
///
/// Every condition left unset matches anything.
#[derive(Debug, Clone, Default)]
pub struct FieldPredicate {
    name: Option<String>,
    of_type: Option<String>,
    declared_in: Option<String>,
}

impl FieldPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Field's declared type equals `ty`.
    pub fn of_type(mut self, ty: impl Into<String>) -> Self {
        self.of_type = Some(ty.into());
        self
    }

    pub fn declared_in(mut self, ty: impl Into<String>) -> Self {
        self.declared_in = Some(ty.into());
        self
    }

    pub fn to_selector(self) -> Selector {
        self.into()
    }

    fn describe(&self) -> String {
        let mut out = String::from("fields()");
        if let Some(name) = &self.name {
            let _ = write!(out, ".named({name})");
        }
        if let Some(ty) = &self.of_type {
            let _ = write!(out, ".of_type({ty})");
        }
        if let Some(ty) = &self.declared_in {
            let _ = write!(out, ".declared_in({ty})");
        }
        out
    }
}

impl From<FieldPredicate> for Selector {
    fn from(p: FieldPredicate) -> Self {
        let description = p.describe();
        let FieldPredicate {
            name,
            of_type,
            declared_in,
        } = p;
        Selector::predicate(Predicate::new(description, move |node, _| {
            let Some(field) = node.field() else {
                return false;
            };
            name.as_ref().map_or(true, |n| &field.name == n)
                && of_type.as_ref().map_or(true, |t| field.ty.as_str() == t)
                && declared_in
                    .as_ref()
                    .map_or(true, |d| field.declaring.as_str() == d)
        }))
    }
}

impl From<FieldPredicate> for TargetSelector {
    fn from(p: FieldPredicate) -> Self {
        TargetSelector::Single(p.into())
    }
}

/// Builder matching nodes by target type.
///
/// `of` matches the type and every catalog type assignable to it.
#[derive(Debug, Clone, Default)]
pub struct TypePredicate {
    of: Option<String>,
    excluding: Vec<String>,
}

impl TypePredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(mut self, ty: impl Into<String>) -> Self {
        self.of = Some(ty.into());
        self
    }

    /// Exclude an exact type, even if `of` would match it.
    pub fn excluding(mut self, ty: impl Into<String>) -> Self {
        self.excluding.push(ty.into());
        self
    }

    pub fn to_selector(self) -> Selector {
        self.into()
    }

    fn describe(&self) -> String {
        let mut out = String::from("types()");
        if let Some(ty) = &self.of {
            let _ = write!(out, ".of({ty})");
        }
        for ty in &self.excluding {
            let _ = write!(out, ".excluding({ty})");
        }
        out
    }
}

impl From<TypePredicate> for Selector {
    fn from(p: TypePredicate) -> Self {
        let description = p.describe();
        // An unparseable name can never equal a catalog type.
        let of = p.of.map(|name| TypeKey::new(name).ok());
        let excluding = p.excluding;
        Selector::predicate(Predicate::new(description, move |node, reflector| {
            let target = node.target();
            if excluding.iter().any(|e| target.as_str() == e) {
                return false;
            }
            match &of {
                None => true,
                Some(None) => false,
                Some(Some(of)) => reflector.is_assignable(target, of),
            }
        }))
    }
}

impl From<TypePredicate> for TargetSelector {
    fn from(p: TypePredicate) -> Self {
        TargetSelector::Single(p.into())
    }
}
