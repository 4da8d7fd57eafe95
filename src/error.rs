//! error
//!
//! Errors shared across the model, handler chain and engine.
//!
//! Module-local failures have their own enums ([`SelectorError`],
//! [`GenerateError`], [`ConfigError`], [`CatalogError`]). [`FixtureError`]
//! is what `create()` returns; it wraps every other error and attaches the
//! node path where one is known.

use thiserror::Error;

use crate::core::catalog::CatalogError;
use crate::core::config::ConfigError;
use crate::core::types::TypeKey;
use crate::generator::GenerateError;
use crate::select::SelectorError;

/// Failures constructing or writing instances.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("type '{0}' is not in the catalog")]
    UnknownType(TypeKey),

    #[error("type '{0}' is an interface and cannot be instantiated")]
    NotInstantiable(TypeKey),

    #[error("type '{ty}' has no setter for field '{field}'")]
    MissingSetter { ty: TypeKey, field: String },
}

/// Invalid use of the API, detected while building or running a model.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("root type '{0}' is not in the catalog")]
    UnknownRoot(String),

    #[error(
        "generator {generator} bound by {selector} produces '{produces}' \
         and cannot be used for '{path}' of type '{target}'"
    )]
    IncompatibleGenerator {
        path: String,
        target: TypeKey,
        produces: TypeKey,
        generator: String,
        selector: String,
    },

    #[error(
        "setter selectors require method assignment (assignment = \"method\"): {}",
        .0.join(", ")
    )]
    SetterSelectorInFieldMode(Vec<String>),

    #[error("selectors matched no node: {}", .0.join(", "))]
    UnusedSelectors(Vec<String>),

    #[error("no handler produced a value for '{path}' of type '{target}'")]
    Unresolvable { path: String, target: TypeKey },
}

/// Top-level error returned by model building and value creation.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot access '{path}': {source}")]
    Access { path: String, source: AccessError },

    #[error("failed to generate '{path}': {source}")]
    Generate { path: String, source: GenerateError },
}

impl FixtureError {
    pub fn access(path: impl Into<String>, source: AccessError) -> Self {
        FixtureError::Access {
            path: path.into(),
            source,
        }
    }

    pub fn generate(path: impl Into<String>, source: GenerateError) -> Self {
        FixtureError::Generate {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_messages_list_selectors() {
        let err = UsageError::UnusedSelectors(vec!["all(Foo)".into(), "field(Bar.x)".into()]);
        assert_eq!(
            err.to_string(),
            "selectors matched no node: all(Foo), field(Bar.x)"
        );
    }

    #[test]
    fn access_error_carries_path() {
        let err = FixtureError::access(
            "Order.id",
            AccessError::MissingSetter {
                ty: TypeKey::new("Order").unwrap(),
                field: "id".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "cannot access 'Order.id': type 'Order' has no setter for field 'id'"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn conversions() {
        let err: FixtureError = UsageError::UnknownRoot("Nope".into()).into();
        assert!(matches!(err, FixtureError::Usage(_)));
    }
}
